//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 日志抽象层本身几乎不产生错误：空事件、形态不符的内建属性都被定义为“静默降级”，而非失败；
//! - 唯一需要向调用方传播的是底层引擎在提交事件时抛出的错误，本模块为其提供透明载体。
//!
//! ## 设计要求（What）
//! - 解析类错误派生 `thiserror::Error`，可直接交给 `anyhow` 等上层框架处理；
//! - [`EmitError`] 不改写底层错误的 `Display`/`source`，调用方可通过 [`EmitError::downcast_ref`] 取回原始类型。

use std::{error::Error as StdError, fmt};

use thiserror::Error;

/// 底层引擎提交事件失败时的透明包装。
///
/// # 教案式说明
/// - **意图 (Why)**：`Log::log` 需要跨越不同引擎返回统一的错误类型，同时保证引擎错误“原样”传播。
/// - **契约 (What)**：`Display` 与 `source` 均直接委托给内部错误；包装过程不追加任何上下文。
#[derive(Debug)]
pub struct EmitError(Box<dyn StdError + Send + Sync + 'static>);

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for EmitError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl EmitError {
    /// 包装任意引擎错误。
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        Self(source.into())
    }

    /// 以具体类型查看内部错误。
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// 取回内部错误。
    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync + 'static> {
        self.0
    }
}

/// 无法识别的级别名称。
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown log severity `{name}`")]
pub struct ParseSeverityError {
    name: String,
}

impl ParseSeverityError {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }

    /// 解析失败的原始输入。
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Trace/Span 标识解析失败。
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParseIdError {
    /// 去掉连字符后的十六进制位数不符。
    #[error("expected {expected} hex digits, found {found}")]
    InvalidLength { expected: usize, found: usize },
    /// 出现非十六进制字符。
    #[error("invalid hex identifier: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
