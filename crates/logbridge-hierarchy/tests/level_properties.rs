//! 级别翻译的性质验证。
//!
//! # 教案级导览
//! - **Why**：正向映射必须全函数且单调，反向映射要接住引擎刻度上的任意数值，并且永不低报；
//! - **How**：用 proptest 随机生成抽象级别与原生数值，逐条检查往返、单调与“最近锚点”三个性质；
//! - **What**：
//!   1. `from_native(to_native(s)) == s`；
//!   2. `a <= b` 蕴含 `to_native(a) <= to_native(b)`，且 `from_native` 对数值单调不减；
//!   3. 反向映射结果与原生数值的距离不大于与任何其它锚点的距离。

use logbridge_core::LogSeverity;
use logbridge_hierarchy::{NativeLevel, from_native, to_native};
use proptest::prelude::*;

fn severity() -> impl Strategy<Value = LogSeverity> {
    prop::sample::select(LogSeverity::ALL.to_vec())
}

fn native_value() -> impl Strategy<Value = u32> {
    prop_oneof![
        0u32..=150_000,
        any::<u32>(),
        prop::sample::select(
            NativeLevel::DEFINED
                .iter()
                .map(NativeLevel::value)
                .collect::<Vec<_>>()
        ),
    ]
}

proptest! {
    #[test]
    fn prop_round_trip_is_identity(severity in severity()) {
        prop_assert_eq!(from_native(&to_native(severity)), severity);
    }

    #[test]
    fn prop_to_native_is_monotonic(a in severity(), b in severity()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(to_native(low) <= to_native(high));
    }

    #[test]
    fn prop_from_native_is_monotonic(a in native_value(), b in native_value()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low = from_native(&NativeLevel::custom(low, "low"));
        let high = from_native(&NativeLevel::custom(high, "high"));
        prop_assert!(low <= high);
    }

    #[test]
    fn prop_from_native_picks_a_nearest_anchor(value in native_value()) {
        let chosen = from_native(&NativeLevel::custom(value, "probe"));
        let chosen_distance = value.abs_diff(to_native(chosen).value());
        for other in LogSeverity::ALL {
            prop_assert!(chosen_distance <= value.abs_diff(to_native(other).value()));
        }
    }
}

#[test]
fn ties_resolve_to_the_more_severe_anchor() {
    let midpoint = (NativeLevel::INFO.value() + NativeLevel::WARN.value()) / 2;
    assert_eq!(
        from_native(&NativeLevel::custom(midpoint, "between")),
        LogSeverity::Warn
    );
}
