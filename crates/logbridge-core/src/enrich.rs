//! 为事件追加属性的日志包装器。
//!
//! # 教案式说明
//! - **意图（Why）**：固定属性、操作作用域、链路上下文都属于“写日志时顺手带上的信息”，
//!   以包装器形式叠加在任意 [`Log`] 实现外层，底层实现无需感知这些来源；
//! - **逻辑（How）**：[`EnrichedLog`] 在每次 `log` 时从 [`PropertySource`] 拉取一次取值，
//!   仅当事件尚未携带同名属性时才写入，然后把新事件交给内层；`for_context` 会对派生出的内层重新包装，
//!   保证上下文链上的每一级都保留这些属性；
//! - **契约（What）**：取值为 `None`（例如当前不在任何操作作用域内）时事件原样下传。

use std::{fmt, sync::Arc};

use crate::{
    error::EmitError, event::LogEvent, keys, log::Log, operation::OperationContext,
    severity::LogSeverity, trace::TraceContextProvider, value::PropertyValue,
};

/// 属性值来源，每次写日志时解析一次。
pub enum PropertySource {
    /// 固定取值。
    Fixed(PropertyValue),
    /// 当前操作作用域，渲染为 `operationContext`。
    Operation(OperationContext),
    /// 当前链路上下文，渲染为 `traceContext`。
    Trace(Arc<dyn TraceContextProvider>),
}

impl PropertySource {
    pub fn resolve(&self) -> Option<PropertyValue> {
        match self {
            PropertySource::Fixed(value) => Some(value.clone()),
            PropertySource::Operation(context) => context.current_value().map(PropertyValue::from),
            PropertySource::Trace(provider) => provider.current().map(PropertyValue::from),
        }
    }
}

impl Clone for PropertySource {
    fn clone(&self) -> Self {
        match self {
            PropertySource::Fixed(value) => PropertySource::Fixed(value.clone()),
            // 派生出的包装器仍读取同一条执行流。
            PropertySource::Operation(context) => PropertySource::Operation(context.share()),
            PropertySource::Trace(provider) => PropertySource::Trace(Arc::clone(provider)),
        }
    }
}

impl fmt::Debug for PropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertySource::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            PropertySource::Operation(context) => {
                f.debug_tuple("Operation").field(&context.snapshot()).finish()
            }
            PropertySource::Trace(_) => f.write_str("Trace(..)"),
        }
    }
}

/// 在内层日志外追加单个属性的包装器。
pub struct EnrichedLog {
    inner: Arc<dyn Log>,
    key: String,
    source: PropertySource,
}

impl EnrichedLog {
    pub fn new(inner: Arc<dyn Log>, key: impl Into<String>, source: PropertySource) -> Self {
        Self {
            inner,
            key: key.into(),
            source,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for EnrichedLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichedLog")
            .field("key", &self.key)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl Log for EnrichedLog {
    fn log(&self, event: Option<&LogEvent>) -> Result<(), EmitError> {
        let Some(event) = event else {
            return Ok(());
        };
        if !self.inner.is_enabled_for(event.level()) {
            return Ok(());
        }
        match self.source.resolve() {
            Some(value) => {
                let enriched = event
                    .clone()
                    .with_property_if_absent(self.key.clone(), value);
                self.inner.log(Some(&enriched))
            }
            None => self.inner.log(Some(event)),
        }
    }

    fn is_enabled_for(&self, level: LogSeverity) -> bool {
        self.inner.is_enabled_for(level)
    }

    fn for_context(self: Arc<Self>, context: Option<&str>) -> Arc<dyn Log> {
        let inner = Arc::clone(&self.inner).for_context(context);
        if Arc::ptr_eq(&inner, &self.inner) {
            return self;
        }
        Arc::new(EnrichedLog {
            inner,
            key: self.key.clone(),
            source: self.source.clone(),
        })
    }
}

/// 在 `Arc<dyn Log>` 上叠加属性的便捷方法。
pub trait EnrichLogExt {
    /// 为每条事件追加固定属性（不覆盖事件自带的同名属性）。
    fn with_property(&self, key: &str, value: impl Into<PropertyValue>) -> Arc<dyn Log>;

    /// 追加当前操作作用域，写日志时读取。
    fn with_operation_context(&self, context: &OperationContext) -> Arc<dyn Log>;

    /// 追加当前链路上下文，写日志时向 `provider` 查询。
    fn with_trace_context(&self, provider: Arc<dyn TraceContextProvider>) -> Arc<dyn Log>;
}

impl EnrichLogExt for Arc<dyn Log> {
    fn with_property(&self, key: &str, value: impl Into<PropertyValue>) -> Arc<dyn Log> {
        Arc::new(EnrichedLog::new(
            Arc::clone(self),
            key,
            PropertySource::Fixed(value.into()),
        ))
    }

    fn with_operation_context(&self, context: &OperationContext) -> Arc<dyn Log> {
        Arc::new(EnrichedLog::new(
            Arc::clone(self),
            keys::OPERATION_CONTEXT,
            PropertySource::Operation(context.share()),
        ))
    }

    fn with_trace_context(&self, provider: Arc<dyn TraceContextProvider>) -> Arc<dyn Log> {
        Arc::new(EnrichedLog::new(
            Arc::clone(self),
            keys::TRACE_CONTEXT,
            PropertySource::Trace(provider),
        ))
    }
}
