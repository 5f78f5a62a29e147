//! 参考引擎的 TOML 配置。
//!
//! ```toml
//! threshold = "ALL"
//!
//! [root]
//! level = "INFO"
//!
//! [loggers."app.db"]
//! level = "WARN"
//! additivity = false
//! ```
//!
//! 配置只调整级别、阈值与叠加性，不涉及追加器；未出现在配置中的设置保持原值。

use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;

use crate::{engine::NativeLevel, error::ConfigError};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HierarchyConfig {
    /// 仓库级阈值，低于它的事件在所有日志器上都被拒绝。
    pub threshold: Option<String>,
    pub root: LoggerConfig,
    /// 以完整层级名称为键。
    pub loggers: BTreeMap<String, LoggerConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub level: Option<String>,
    pub additivity: Option<bool>,
}

impl HierarchyConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// 解析全部级别名称；任一名称无法识别时整体失败，保证配置要么全部生效要么不生效。
    pub(crate) fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let threshold = self
            .threshold
            .as_deref()
            .map(|name| parse_level(name, "threshold"))
            .transpose()?;
        let root = self.root.resolve("root")?;
        let loggers = self
            .loggers
            .iter()
            .map(|(name, logger)| logger.resolve(name).map(|resolved| (name.clone(), resolved)))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(ResolvedConfig {
            threshold,
            root,
            loggers,
        })
    }
}

impl LoggerConfig {
    fn resolve(&self, scope: &str) -> Result<ResolvedLogger, ConfigError> {
        let level = self
            .level
            .as_deref()
            .map(|name| parse_level(name, scope))
            .transpose()?;
        Ok(ResolvedLogger {
            level,
            additivity: self.additivity,
        })
    }
}

fn parse_level(name: &str, scope: &str) -> Result<NativeLevel, ConfigError> {
    NativeLevel::parse(name).ok_or_else(|| ConfigError::UnknownLevel {
        name: name.to_owned(),
        scope: scope.to_owned(),
    })
}

#[derive(Debug)]
pub(crate) struct ResolvedConfig {
    pub(crate) threshold: Option<NativeLevel>,
    pub(crate) root: ResolvedLogger,
    pub(crate) loggers: Vec<(String, ResolvedLogger)>,
}

#[derive(Debug)]
pub(crate) struct ResolvedLogger {
    pub(crate) level: Option<NativeLevel>,
    pub(crate) additivity: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_document() {
        let config = HierarchyConfig::from_toml_str(
            r#"
threshold = "info"

[root]
level = "WARN"

[loggers."app.db"]
level = "Debug"
additivity = false
"#,
        )
        .unwrap();

        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.threshold, Some(NativeLevel::INFO));
        assert_eq!(resolved.root.level, Some(NativeLevel::WARN));
        assert_eq!(resolved.loggers[0].0, "app.db");
        assert_eq!(resolved.loggers[0].1.level, Some(NativeLevel::DEBUG));
        assert_eq!(resolved.loggers[0].1.additivity, Some(false));
    }

    #[test]
    fn empty_document_is_valid() {
        let config = HierarchyConfig::from_toml_str("").unwrap();
        assert_eq!(config, HierarchyConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = HierarchyConfig::from_toml_str("[root]\nlevle = \"INFO\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_level_names_the_scope() {
        let config = HierarchyConfig::from_toml_str("[loggers.app]\nlevel = \"LOUD\"\n").unwrap();
        match config.resolve().unwrap_err() {
            ConfigError::UnknownLevel { name, scope } => {
                assert_eq!(name, "LOUD");
                assert_eq!(scope, "app");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_reports_path() {
        let err = HierarchyConfig::from_file("/nonexistent/logbridge.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/logbridge.toml"));
    }
}
