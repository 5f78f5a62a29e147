//! 日志契约的测试桩集合。
//!
//! # 设计定位（Why）
//! - 包装器、业务组件的测试只需要一个满足 [`Log`] 契约的对象，不必拉起真实引擎；
//! - 统一出口避免各测试文件重复定义 `struct NoopLog;`，接口调整时只需改这一处。
//!
//! # 契约说明（What）
//! - [`SilentLog`]：所有级别均未启用，任何事件都被丢弃；
//! - [`RecordingLog`]：记录通过级别检查的事件及其上下文链，克隆体共享同一份记录。

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{error::EmitError, event::LogEvent, log::Log, severity::LogSeverity};

/// 丢弃一切的日志实现。
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentLog;

impl Log for SilentLog {
    fn log(&self, _event: Option<&LogEvent>) -> Result<(), EmitError> {
        Ok(())
    }

    fn is_enabled_for(&self, _level: LogSeverity) -> bool {
        false
    }

    fn for_context(self: Arc<Self>, _context: Option<&str>) -> Arc<dyn Log> {
        self
    }
}

/// 被记录下来的一条事件。
#[derive(Clone, Debug)]
pub struct RecordedEvent {
    /// 写入时所在的上下文链，外层在前。
    pub context: Vec<String>,
    pub event: LogEvent,
}

/// 记录型日志实现。
#[derive(Clone, Debug)]
pub struct RecordingLog {
    min_level: LogSeverity,
    context: Vec<String>,
    records: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl RecordingLog {
    pub fn new(min_level: LogSeverity) -> Self {
        Self {
            min_level,
            context: Vec::new(),
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 当前实例的上下文链。
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// 取出并清空已记录的事件。
    pub fn take(&self) -> Vec<RecordedEvent> {
        std::mem::take(&mut *self.records.lock())
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RecordingLog {
    fn default() -> Self {
        Self::new(LogSeverity::Debug)
    }
}

impl Log for RecordingLog {
    fn log(&self, event: Option<&LogEvent>) -> Result<(), EmitError> {
        if let Some(event) = event
            && self.is_enabled_for(event.level())
        {
            self.records.lock().push(RecordedEvent {
                context: self.context.clone(),
                event: event.clone(),
            });
        }
        Ok(())
    }

    fn is_enabled_for(&self, level: LogSeverity) -> bool {
        level >= self.min_level
    }

    fn for_context(self: Arc<Self>, context: Option<&str>) -> Arc<dyn Log> {
        let mut derived = (*self).clone();
        match context {
            Some(name) => derived.context.push(name.to_owned()),
            None if self.context.is_empty() => return self,
            None => derived.context.clear(),
        }
        Arc::new(derived)
    }
}
