//! 进程级 `tracing` 管道的一次性安装。
//!
//! # 教案式说明
//! - **意图（Why）**：[`TracingAppender`](crate::TracingAppender) 与本 crate 的诊断输出都依赖全局 `tracing`
//!   Subscriber，宿主若没有自己的管道，调用一次 [`install`] 即可看到日志；
//! - **逻辑（How）**：
//!   1. 检查重复安装与外部已设置的 Subscriber；
//!   2. 组装 `registry + EnvFilter + fmt` 并设置为全局 Subscriber；
//!   3. 把安装状态写入 `INSTALL_STATE`；
//! - **契约（What）**：重复调用返回 [`InstallError::AlreadyInstalled`]；外部已配置 Subscriber 时返回
//!   [`InstallError::SubscriberAlreadySet`]。`RUST_LOG` 未设置或无法解析时使用默认过滤指令。

use std::sync::OnceLock;

use tracing::dispatcher;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

use crate::error::InstallError;

/// 未设置 `RUST_LOG` 时使用的过滤指令。
pub const DEFAULT_FILTER: &str = "info";

static INSTALL_STATE: OnceLock<InstallState> = OnceLock::new();

#[derive(Debug)]
struct InstallState {
    default_filter: String,
}

/// 以 [`DEFAULT_FILTER`] 为兜底过滤指令安装全局 Subscriber。
pub fn install() -> Result<(), InstallError> {
    install_with_default_filter(DEFAULT_FILTER)
}

/// 与 [`install`] 相同，但指定 `RUST_LOG` 缺失时的兜底过滤指令。
pub fn install_with_default_filter(default_filter: &str) -> Result<(), InstallError> {
    if INSTALL_STATE.get().is_some() {
        return Err(InstallError::AlreadyInstalled);
    }
    if dispatcher::has_been_set() {
        return Err(InstallError::SubscriberAlreadySet);
    }

    let subscriber = tracing_subscriber::registry()
        .with(build_env_filter(default_filter))
        .with(tracing_subscriber::fmt::layer());
    tracing::subscriber::set_global_default(subscriber)?;

    INSTALL_STATE
        .set(InstallState {
            default_filter: default_filter.to_owned(),
        })
        .map_err(|_| InstallError::AlreadyInstalled)
}

/// 本进程是否已经通过 [`install`] 完成安装。
pub fn is_installed() -> bool {
    INSTALL_STATE.get().is_some()
}

/// 安装时使用的兜底过滤指令。
pub fn installed_default_filter() -> Option<&'static str> {
    INSTALL_STATE
        .get()
        .map(|state| state.default_filter.as_str())
}

fn build_env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}
