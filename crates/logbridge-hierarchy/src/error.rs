//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 适配层本身不引入新的失败路径，这里集中定义的是引擎侧（追加器、配置、安装）会产生的错误；
//! - 追加器错误经由 [`logbridge_core::EmitError`] 原样交还给写日志的调用方，不做重试也不吞掉。
//!
//! ## 设计要求（What）
//! - 所有错误类型派生 `thiserror::Error`，满足 `Send + Sync + 'static`，可跨线程传播。

use std::{error::Error as StdError, io};

use thiserror::Error;

/// 追加器在输出事件时的失败。
#[derive(Debug, Error)]
pub enum AppendError {
    /// 写入底层 `io::Write` 失败。
    #[error("appender io failure: {0}")]
    Io(#[from] io::Error),
    /// 追加器已关闭，拒绝继续写入。
    #[error("appender `{name}` is closed")]
    Closed { name: String },
    /// 自定义追加器的其它失败。
    #[error("{0}")]
    Custom(Box<dyn StdError + Send + Sync + 'static>),
}

impl AppendError {
    pub fn custom(source: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        AppendError::Custom(source.into())
    }
}

/// 引擎配置解析或应用失败。
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败。
    #[error("failed to read configuration file `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    /// TOML 文本不合法或字段不符。
    #[error("invalid hierarchy configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// 级别名称无法识别。
    #[error("unknown level `{name}` in {scope}")]
    UnknownLevel { name: String, scope: String },
}

/// 全局 `tracing` 订阅器安装失败。
#[derive(Debug, Error)]
pub enum InstallError {
    /// `install` 被重复调用。
    #[error("logbridge tracing pipeline is already installed")]
    AlreadyInstalled,
    /// 外部提前设置了全局 `tracing` Subscriber，无法再次注册。
    #[error("a global tracing subscriber has already been set")]
    SubscriberAlreadySet,
    /// 设置全局 Subscriber 失败的底层错误。
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_errors_display_their_source() {
        let err = AppendError::custom("queue is full");
        assert_eq!(err.to_string(), "queue is full");
        assert!(matches!(err, AppendError::Custom(_)));
    }
}
