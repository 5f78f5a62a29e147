#![deny(unsafe_code)]
#![doc = "logbridge-core: 与后端无关的日志契约。"]
#![doc = ""]
#![doc = "业务代码通过 [`Log`] 写入 [`LogEvent`]，由适配层翻译到具体日志引擎；"]
#![doc = "本 crate 不包含任何渲染或输出逻辑。"]

//! # 模块概览（How）
//! - [`severity`]：五级日志级别；
//! - [`event`] / [`value`]：事件、参数与属性取值模型；
//! - [`keys`]：会被适配层专门渲染的内建属性键；
//! - [`trace`] / [`operation`]：链路上下文与操作作用域，写日志时按需拉取；
//! - [`log`] / [`enrich`]：日志接口、便捷方法与属性包装器；
//! - [`test_stubs`]：测试用的空实现与记录型实现。

pub mod enrich;
pub mod error;
pub mod event;
pub mod keys;
pub mod log;
pub mod operation;
pub mod severity;
pub mod test_stubs;
pub mod trace;
pub mod value;

pub use enrich::{EnrichLogExt, EnrichedLog, PropertySource};
pub use error::{EmitError, ParseIdError, ParseSeverityError};
pub use event::{LogEvent, SharedError};
pub use log::{Log, LogExt};
pub use operation::{OperationContext, OperationScope};
pub use severity::LogSeverity;
pub use trace::{FixedTraceContext, SpanId, TraceContext, TraceContextProvider, TraceId};
pub use value::{OperationContextValue, PropertyValue, ScalarValue, SourceContextValue};
