use std::sync::Arc;

use crate::{
    error::EmitError,
    event::{LogEvent, SharedError},
    severity::LogSeverity,
    value::ScalarValue,
};

/// 与后端无关的日志接口。
///
/// # 设计背景（Why）
/// - 业务代码只依赖本 Trait，具体由哪个引擎渲染、落盘完全由注入的实现决定；
/// - `for_context` 让调用方为子组件派生带名称的日志实例，名称会沿调用链累积。
///
/// # 逻辑解析（How）
/// - `log` 是唯一的提交入口，[`LogExt`] 的便捷方法都会先构造 [`LogEvent`] 再调用它；
/// - `for_context` 以 `Arc<Self>` 为接收者，使实现可以在“上下文不变”时直接返回自身，而不必重新分配。
///
/// # 契约说明（What）
/// - `log(None)` 为静默空操作；级别未启用时同样不产生任何输出；
/// - 引擎提交失败时返回的 [`EmitError`] 原样携带引擎错误，实现不得吞掉；
/// - `is_enabled_for` 不得缓存结果，必须反映引擎当前的配置；
/// - 所有方法线程安全、同步完成，不得阻塞在 IO 上。
pub trait Log: Send + Sync {
    /// 提交一条日志事件。
    fn log(&self, event: Option<&LogEvent>) -> Result<(), EmitError>;

    /// 判断给定级别当前是否会被输出。
    fn is_enabled_for(&self, level: LogSeverity) -> bool;

    /// 派生带上下文名称的日志实例；`None` 表示回到顶层上下文。
    fn for_context(self: Arc<Self>, context: Option<&str>) -> Arc<dyn Log>;
}

/// [`Log`] 的便捷写法。
///
/// 每个方法只负责构造事件；是否输出、如何渲染全部由 [`Log::log`] 决定。
pub trait LogExt: Log {
    fn write(&self, level: LogSeverity, template: &str) -> Result<(), EmitError> {
        self.log(Some(&LogEvent::new(level, template)))
    }

    fn write_with(
        &self,
        level: LogSeverity,
        template: &str,
        parameters: &[ScalarValue],
    ) -> Result<(), EmitError> {
        let event = LogEvent::new(level, template).with_parameters(parameters.iter().cloned());
        self.log(Some(&event))
    }

    fn debug(&self, template: &str) -> Result<(), EmitError> {
        self.write(LogSeverity::Debug, template)
    }

    fn info(&self, template: &str) -> Result<(), EmitError> {
        self.write(LogSeverity::Info, template)
    }

    fn warn(&self, template: &str) -> Result<(), EmitError> {
        self.write(LogSeverity::Warn, template)
    }

    fn error(&self, template: &str) -> Result<(), EmitError> {
        self.write(LogSeverity::Error, template)
    }

    /// 输出带异常的 ERROR 日志。
    fn error_with(&self, template: &str, exception: SharedError) -> Result<(), EmitError> {
        let event = LogEvent::new(LogSeverity::Error, template).with_exception(exception);
        self.log(Some(&event))
    }

    fn fatal(&self, template: &str) -> Result<(), EmitError> {
        self.write(LogSeverity::Fatal, template)
    }

    /// 输出带异常的 FATAL 日志。
    fn fatal_with(&self, template: &str, exception: SharedError) -> Result<(), EmitError> {
        let event = LogEvent::new(LogSeverity::Fatal, template).with_exception(exception);
        self.log(Some(&event))
    }
}

impl<L: Log + ?Sized> LogExt for L {}
