//! 级别翻译：抽象的五级严重程度与引擎原生级别之间的双向映射。
//!
//! # 教案式说明
//! - **意图（Why）**：引擎的级别刻度比抽象级别更细（还有 TRACE、NOTICE、CRITICAL 等），
//!   正向映射必须全函数且单调，反向映射要能接住任意数值；
//! - **逻辑（How）**：正向逐一对应同名锚点；反向取数值距离最近的锚点，距离相同时取更严重的一侧，
//!   保证不会低报；
//! - **契约（What）**：`from_native(to_native(s)) == s` 对全部五个级别成立。

use logbridge_core::LogSeverity;

use crate::engine::NativeLevel;

const ANCHORS: [(LogSeverity, NativeLevel); 5] = [
    (LogSeverity::Debug, NativeLevel::DEBUG),
    (LogSeverity::Info, NativeLevel::INFO),
    (LogSeverity::Warn, NativeLevel::WARN),
    (LogSeverity::Error, NativeLevel::ERROR),
    (LogSeverity::Fatal, NativeLevel::FATAL),
];

/// 抽象级别到引擎级别。
pub fn to_native(severity: LogSeverity) -> NativeLevel {
    match severity {
        LogSeverity::Debug => NativeLevel::DEBUG,
        LogSeverity::Info => NativeLevel::INFO,
        LogSeverity::Warn => NativeLevel::WARN,
        LogSeverity::Error => NativeLevel::ERROR,
        LogSeverity::Fatal => NativeLevel::FATAL,
    }
}

/// 引擎级别到抽象级别：最近锚点，平局取更严重者。
pub fn from_native(level: &NativeLevel) -> LogSeverity {
    let value = level.value();
    let mut best = LogSeverity::Debug;
    let mut best_distance = u32::MAX;
    for (severity, anchor) in &ANCHORS {
        let distance = value.abs_diff(anchor.value());
        // 锚点按严重程度升序遍历，`<=` 让平局落到更严重的一侧。
        if distance <= best_distance {
            best = *severity;
            best_distance = distance;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_levels_map_to_expected_severity() {
        assert_eq!(from_native(&NativeLevel::ALL), LogSeverity::Debug);
        assert_eq!(from_native(&NativeLevel::TRACE), LogSeverity::Debug);
        assert_eq!(from_native(&NativeLevel::NOTICE), LogSeverity::Warn);
        assert_eq!(from_native(&NativeLevel::CRITICAL), LogSeverity::Fatal);
        assert_eq!(from_native(&NativeLevel::OFF), LogSeverity::Fatal);
    }

    #[test]
    fn exact_anchors_round_trip() {
        for severity in [
            LogSeverity::Debug,
            LogSeverity::Info,
            LogSeverity::Warn,
            LogSeverity::Error,
            LogSeverity::Fatal,
        ] {
            assert_eq!(from_native(&to_native(severity)), severity);
        }
    }
}
