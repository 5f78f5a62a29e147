#![deny(unsafe_code)]
#![doc = "logbridge-hierarchy: 将 `logbridge-core` 的日志契约翻译到层级命名日志引擎。"]
#![doc = ""]
#![doc = "调用方持有 [`BridgeLog`]，写入的事件经级别翻译与前缀渲染后交给引擎日志器输出。"]

//! # 模块概览（How）
//! - [`engine`]：适配层与引擎之间的窄契约（取日志器、判断启用、提交事件）；
//! - [`level`] / [`render`] / [`event`]：级别翻译、内建属性前缀渲染与事件翻译；
//! - [`log`]：对外的 [`BridgeLog`] 与 [`AdapterSettings`]；
//! - [`hierarchy`] / [`appender`] / [`config`]：参考引擎、追加器与 TOML 配置；
//! - [`install`]：一次性安装全局 `tracing` 管道。
//!
//! # 快速上手
//! ```
//! use std::sync::Arc;
//!
//! use logbridge_core::{Log, LogExt};
//! use logbridge_hierarchy::{BridgeLog, Hierarchy, MemoryAppender};
//!
//! let hierarchy = Hierarchy::new();
//! let output = Arc::new(MemoryAppender::new());
//! hierarchy.root_logger().add_appender(output.clone());
//!
//! let log = Arc::new(BridgeLog::for_logger(Arc::new(hierarchy), "root"));
//! let log = log.for_context(Some("orders")).for_context(Some("checkout"));
//! log.info("Hello!").unwrap();
//!
//! assert_eq!(output.take(), vec!["[orders => checkout] Hello!"]);
//! ```

pub mod appender;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod format;
pub mod hierarchy;
pub mod install;
pub mod level;
pub mod log;
pub mod render;

pub use appender::{
    Appender, CapturedEvent, MemoryAppender, PatternLayout, TracingAppender, WriterAppender,
};
pub use config::{HierarchyConfig, LoggerConfig};
pub use engine::{LoggerRepository, NativeEvent, NativeLevel, NativeLogger, NativeMessage};
pub use error::{AppendError, ConfigError, InstallError};
pub use event::translate_event;
pub use hierarchy::{Hierarchy, HierarchyLogger, ROOT_LOGGER_NAME};
pub use install::install;
pub use level::{from_native, to_native};
pub use log::{AdapterSettings, BridgeLog, LoggerNameFactory, dotted_logger_name};
pub use render::{RenderedPrefix, render_prefix};
