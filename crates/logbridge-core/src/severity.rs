use core::{fmt, str::FromStr};

use crate::error::ParseSeverityError;

/// 与具体日志引擎无关的日志级别。
///
/// # 设计背景（Why）
/// - 调用方只面对这五个级别，具体引擎拥有多少级别、如何命名都由适配层负责翻译。
///
/// # 契约说明（What）
/// - 变体按严重程度递增声明，派生的 [`Ord`] 即为严重程度的全序：`Debug < Info < Warn < Error < Fatal`。
/// - `Fatal` 代表不可恢复错误，适配层必须把它映射到目标引擎中最严重的事件级别。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogSeverity {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogSeverity {
    /// 全部级别，按严重程度升序排列。
    pub const ALL: [LogSeverity; 5] = [
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
        LogSeverity::Fatal,
    ];

    /// 返回大写的级别名称。
    pub const fn as_str(self) -> &'static str {
        match self {
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO",
            LogSeverity::Warn => "WARN",
            LogSeverity::Error => "ERROR",
            LogSeverity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogSeverity {
    type Err = ParseSeverityError;

    /// 大小写不敏感地解析级别名称，`warning` 视为 `Warn` 的别名。
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "debug" => Ok(LogSeverity::Debug),
            "info" => Ok(LogSeverity::Info),
            "warn" | "warning" => Ok(LogSeverity::Warn),
            "error" => Ok(LogSeverity::Error),
            "fatal" => Ok(LogSeverity::Fatal),
            _ => Err(ParseSeverityError::new(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_are_ordered_by_importance() {
        for pair in LogSeverity::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{} 应低于 {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn parse_accepts_any_case_and_alias() {
        assert_eq!("INFO".parse::<LogSeverity>().unwrap(), LogSeverity::Info);
        assert_eq!(" Warning ".parse::<LogSeverity>().unwrap(), LogSeverity::Warn);
        assert_eq!("fatal".parse::<LogSeverity>().unwrap(), LogSeverity::Fatal);
        assert!("verbose".parse::<LogSeverity>().is_err());
    }

    #[test]
    fn display_matches_as_str() {
        for severity in LogSeverity::ALL {
            assert_eq!(severity.to_string(), severity.as_str());
        }
    }
}
