//! 日志参数与属性的取值模型。
//!
//! # 教案式说明
//! - **意图（Why）**：内建属性（链路、来源上下文、操作上下文）需要专门的渲染规则，
//!   用封闭的枚举表达“值的形态”，渲染层按变体匹配即可，无需运行时类型探测；
//! - **契约（What）**：[`ScalarValue`] 覆盖普通标量，`Display` 输出其默认字符串形式；
//!   [`PropertyValue`] 在标量之外追加三种结构化形态，非内建键的值原样交给底层引擎。

use core::fmt;

use crate::trace::TraceContext;

/// 普通标量值，也是模板参数的取值类型。
#[derive(Clone, Debug, PartialEq)]
pub enum ScalarValue {
    /// 空值；渲染为空字符串。
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => Ok(()),
            ScalarValue::Bool(value) => write!(f, "{value}"),
            ScalarValue::Int(value) => write!(f, "{value}"),
            ScalarValue::UInt(value) => write!(f, "{value}"),
            ScalarValue::Float(value) => write!(f, "{value}"),
            ScalarValue::Str(value) => f.write_str(value),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Str(value.to_owned())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Str(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int(i64::from(value))
    }
}

impl From<u64> for ScalarValue {
    fn from(value: u64) -> Self {
        ScalarValue::UInt(value)
    }
}

impl From<u32> for ScalarValue {
    fn from(value: u32) -> Self {
        ScalarValue::UInt(u64::from(value))
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

impl<T: Into<ScalarValue>> From<Option<T>> for ScalarValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ScalarValue::Null, Into::into)
    }
}

/// 来源上下文：按嵌套顺序排列的名称序列，渲染为 `[a => b => c]`。
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SourceContextValue(Vec<String>);

impl SourceContextValue {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn single(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SourceContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" => "))
    }
}

/// 操作上下文：由外层到内层排列的作用域名称，每层渲染为独立的 `[name]` 分组。
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OperationContextValue(Vec<String>);

impl OperationContextValue {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn single(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OperationContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// 属性值。
///
/// # 契约说明（What）
/// - 内建键只有在取值形态匹配时才会被特殊渲染，形态不符时按普通值透传；
/// - `Display` 给出透传时使用的通用字符串形式。
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Scalar(ScalarValue),
    SourceContext(SourceContextValue),
    OperationContext(OperationContextValue),
    Trace(TraceContext),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Scalar(value) => fmt::Display::fmt(value, f),
            PropertyValue::SourceContext(value) => fmt::Display::fmt(value, f),
            PropertyValue::OperationContext(value) => fmt::Display::fmt(value, f),
            PropertyValue::Trace(value) => fmt::Display::fmt(&value.trace_id, f),
        }
    }
}

macro_rules! scalar_property_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for PropertyValue {
                fn from(value: $ty) -> Self {
                    PropertyValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_property_from!(ScalarValue, &str, String, bool, i64, i32, u64, u32, f64);

impl From<SourceContextValue> for PropertyValue {
    fn from(value: SourceContextValue) -> Self {
        PropertyValue::SourceContext(value)
    }
}

impl From<OperationContextValue> for PropertyValue {
    fn from(value: OperationContextValue) -> Self {
        PropertyValue::OperationContext(value)
    }
}

impl From<TraceContext> for PropertyValue {
    fn from(value: TraceContext) -> Self {
        PropertyValue::Trace(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_render_their_default_form() {
        assert_eq!(ScalarValue::from("abc").to_string(), "abc");
        assert_eq!(ScalarValue::from(42_i64).to_string(), "42");
        assert_eq!(ScalarValue::from(1.5).to_string(), "1.5");
        assert_eq!(ScalarValue::from(None::<&str>).to_string(), "");
    }

    #[test]
    fn only_missing_values_are_null() {
        assert!(ScalarValue::from(None::<&str>).is_null());
        assert!(!ScalarValue::from("").is_null());
        assert!(!ScalarValue::from(false).is_null());
    }

    #[test]
    fn structured_values_render_for_passthrough() {
        let source = SourceContextValue::new(["a", "b"]);
        assert_eq!(PropertyValue::from(source).to_string(), "a => b");
        let operation = OperationContextValue::new(["op1", "op2"]);
        assert_eq!(PropertyValue::from(operation).to_string(), "op1 op2");
    }
}
