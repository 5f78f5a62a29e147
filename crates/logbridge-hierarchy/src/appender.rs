//! 引擎侧的输出端：追加器与模式布局。
//!
//! # 教案式说明
//! - **意图（Why）**：适配层只负责把事件翻译成 [`NativeEvent`]，文本最终长什么样由引擎的布局决定；
//!   这里提供三种常用追加器，覆盖测试断言、写入任意 `io::Write` 以及桥接到 `tracing` 生态三类场景；
//! - **逻辑（How）**：追加器共享 [`PatternLayout`] 把事件渲染为字符串，再交给各自的落点；
//! - **契约（What）**：
//!   - 追加器在调用线程上同步执行，失败以 [`AppendError`] 返回；
//!   - 进入追加器的事件已由引擎补齐时间戳。

use std::{
    fmt,
    io::Write,
    sync::atomic::{AtomicBool, Ordering},
    time::UNIX_EPOCH,
};

use parking_lot::Mutex;

use crate::{
    engine::{NativeEvent, NativeLevel},
    error::AppendError,
};

/// 引擎日志器挂载的输出端。
pub trait Appender: Send + Sync {
    fn append(&self, event: &NativeEvent) -> Result<(), AppendError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Message,
    Level,
    Logger,
    Timestamp,
    Exception,
}

/// 模式布局。
///
/// 支持的转换符：`%m` 消息、`%p` 级别、`%c` 日志器名称、`%d` Unix 毫秒时间戳、`%e` 异常文本、
/// `%n` 换行、`%%` 百分号。无法识别的转换符按原文输出。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternLayout {
    pattern: String,
    segments: Vec<Segment>,
}

impl PatternLayout {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let segments = parse_pattern(&pattern);
        Self { pattern, segments }
    }

    /// 只输出消息本身的布局。
    pub fn message_only() -> Self {
        Self::new("%m")
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self, event: &NativeEvent) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Message => output.push_str(&event.rendered_message()),
                Segment::Level => output.push_str(event.level.name()),
                Segment::Logger => output.push_str(&event.logger_name),
                Segment::Timestamp => {
                    let millis = event
                        .timestamp
                        .and_then(|at| at.duration_since(UNIX_EPOCH).ok())
                        .map_or(0, |elapsed| elapsed.as_millis());
                    output.push_str(&millis.to_string());
                }
                Segment::Exception => {
                    if let Some(exception) = &event.exception {
                        output.push_str(&exception.to_string());
                    }
                }
            }
        }
        output
    }
}

impl Default for PatternLayout {
    fn default() -> Self {
        Self::message_only()
    }
}

fn parse_pattern(pattern: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            literal.push(ch);
            continue;
        }
        let converter = match chars.next() {
            Some('m') => Segment::Message,
            Some('p') => Segment::Level,
            Some('c') => Segment::Logger,
            Some('d') => Segment::Timestamp,
            Some('e') => Segment::Exception,
            Some('n') => {
                literal.push('\n');
                continue;
            }
            Some('%') => {
                literal.push('%');
                continue;
            }
            Some(other) => {
                literal.push('%');
                literal.push(other);
                continue;
            }
            None => {
                literal.push('%');
                break;
            }
        };
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(converter);
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// 被捕获的一条事件及其布局输出。
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub event: NativeEvent,
    pub rendered: String,
}

/// 把事件保存在内存中的追加器，主要用于断言输出。
#[derive(Default)]
pub struct MemoryAppender {
    layout: PatternLayout,
    captured: Mutex<Vec<CapturedEvent>>,
}

impl MemoryAppender {
    /// 使用 `%m` 布局。
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: PatternLayout) -> Self {
        Self {
            layout,
            captured: Mutex::new(Vec::new()),
        }
    }

    /// 目前为止每条事件的布局输出。
    pub fn rendered(&self) -> Vec<String> {
        self.captured
            .lock()
            .iter()
            .map(|captured| captured.rendered.clone())
            .collect()
    }

    /// 所有布局输出首尾相连。
    pub fn text(&self) -> String {
        self.captured
            .lock()
            .iter()
            .map(|captured| captured.rendered.as_str())
            .collect()
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.captured.lock().clone()
    }

    /// 取出并清空已捕获的布局输出。
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.captured.lock())
            .into_iter()
            .map(|captured| captured.rendered)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.captured.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.captured.lock().is_empty()
    }
}

impl fmt::Debug for MemoryAppender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryAppender")
            .field("layout", &self.layout.pattern())
            .field("captured", &self.len())
            .finish()
    }
}

impl Appender for MemoryAppender {
    fn append(&self, event: &NativeEvent) -> Result<(), AppendError> {
        let rendered = self.layout.format(event);
        self.captured.lock().push(CapturedEvent {
            event: event.clone(),
            rendered,
        });
        Ok(())
    }
}

/// 写入任意 `io::Write` 的追加器。
///
/// # 契约说明（What）
/// - 每条事件写入一次并立即 `flush`，写入失败以 [`AppendError::Io`] 返回；
/// - [`WriterAppender::close`] 之后的写入返回 [`AppendError::Closed`]。
pub struct WriterAppender<W: Write + Send> {
    name: String,
    layout: PatternLayout,
    writer: Mutex<W>,
    closed: AtomicBool,
}

impl<W: Write + Send> WriterAppender<W> {
    /// 默认布局为 `%p %c - %m%n`。
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self::with_layout(name, writer, PatternLayout::new("%p %c - %m%n"))
    }

    pub fn with_layout(name: impl Into<String>, writer: W, layout: PatternLayout) -> Self {
        Self {
            name: name.into(),
            layout,
            writer: Mutex::new(writer),
            closed: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 刷新并关闭，之后的事件全部拒绝。
    pub fn close(&self) -> Result<(), AppendError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.writer.lock().flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> Appender for WriterAppender<W> {
    fn append(&self, event: &NativeEvent) -> Result<(), AppendError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(AppendError::Closed {
                name: self.name.clone(),
            });
        }
        let rendered = self.layout.format(event);
        let mut writer = self.writer.lock();
        writer.write_all(rendered.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> fmt::Debug for WriterAppender<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterAppender")
            .field("name", &self.name)
            .field("layout", &self.layout.pattern())
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

/// 把引擎输出转发为 `tracing` 事件的追加器。
///
/// 引擎级别按数值区间折算到 `tracing` 的五个级别；日志器名称与异常文本作为结构化字段附带。
#[derive(Debug, Default)]
pub struct TracingAppender {
    layout: PatternLayout,
}

impl TracingAppender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: PatternLayout) -> Self {
        Self { layout }
    }
}

macro_rules! forward {
    ($level:expr, $logger:expr, $exception:expr, $message:expr) => {
        tracing::event!(
            $level,
            logger = $logger,
            exception = $exception,
            "{}",
            $message
        )
    };
}

impl Appender for TracingAppender {
    fn append(&self, event: &NativeEvent) -> Result<(), AppendError> {
        let message = self.layout.format(event);
        let logger = event.logger_name.as_str();
        let exception = event.exception.as_ref().map(ToString::to_string);
        let exception = exception.as_deref();

        let level = &event.level;
        if *level >= NativeLevel::ERROR {
            forward!(tracing::Level::ERROR, logger, exception, message);
        } else if *level >= NativeLevel::WARN {
            forward!(tracing::Level::WARN, logger, exception, message);
        } else if *level >= NativeLevel::INFO {
            forward!(tracing::Level::INFO, logger, exception, message);
        } else if *level >= NativeLevel::DEBUG {
            forward!(tracing::Level::DEBUG, logger, exception, message);
        } else {
            forward!(tracing::Level::TRACE, logger, exception, message);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{io, sync::Arc, time::Duration};

    use logbridge_core::ScalarValue;
    use tracing_test::traced_test;

    use super::*;
    use crate::engine::NativeMessage;

    fn event(level: NativeLevel, template: &str) -> NativeEvent {
        let mut event = NativeEvent::new(
            "app.worker",
            level,
            NativeMessage {
                prefix: "[ctx] ".into(),
                template: template.into(),
                parameters: vec![ScalarValue::from(7_i64)],
            },
        );
        event.timestamp = Some(UNIX_EPOCH + Duration::from_millis(1_500));
        event
    }

    #[test]
    fn pattern_layout_expands_known_converters() {
        let layout = PatternLayout::new("%d %p %c: %m%n%%");
        assert_eq!(
            layout.format(&event(NativeLevel::WARN, "n={0}")),
            "1500 WARN app.worker: [ctx] n=7\n%"
        );
    }

    #[test]
    fn pattern_layout_keeps_unknown_converters() {
        let layout = PatternLayout::new("%x %m %");
        assert_eq!(layout.format(&event(NativeLevel::INFO, "hi")), "%x [ctx] hi %");
    }

    #[test]
    fn pattern_layout_renders_exception() {
        let mut event = event(NativeLevel::ERROR, "failed");
        event.exception = Some(Arc::new(io::Error::other("disk full")));
        assert_eq!(PatternLayout::new("%m | %e").format(&event), "[ctx] failed | disk full");
    }

    #[test]
    fn memory_appender_captures_and_drains() {
        let appender = MemoryAppender::new();
        appender.append(&event(NativeLevel::INFO, "a")).unwrap();
        appender.append(&event(NativeLevel::INFO, "b")).unwrap();

        assert_eq!(appender.text(), "[ctx] a[ctx] b");
        assert_eq!(appender.events()[1].event.message.template, "b");
        assert_eq!(appender.take(), vec!["[ctx] a", "[ctx] b"]);
        assert!(appender.is_empty());
    }

    #[test]
    fn writer_appender_writes_and_rejects_after_close() {
        let appender = WriterAppender::new("buffer", Vec::new());
        appender.append(&event(NativeLevel::INFO, "hello")).unwrap();
        appender.close().unwrap();

        let err = appender
            .append(&event(NativeLevel::INFO, "late"))
            .expect_err("closed appender must refuse events");
        assert!(matches!(err, AppendError::Closed { ref name } if name == "buffer"));
        assert_eq!(
            String::from_utf8(appender.into_inner()).unwrap(),
            "INFO app.worker - [ctx] hello\n"
        );
    }

    #[test]
    fn writer_appender_surfaces_io_errors() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("pipe closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let appender = WriterAppender::new("broken", Broken);
        let err = appender.append(&event(NativeLevel::INFO, "x")).unwrap_err();
        assert!(matches!(err, AppendError::Io(_)));
    }

    #[test]
    #[traced_test]
    fn tracing_appender_forwards_rendered_message() {
        let appender = TracingAppender::new();
        appender
            .append(&event(NativeLevel::CRITICAL, "bridge {0}"))
            .unwrap();

        assert!(logs_contain("[ctx] bridge 7"));
        assert!(logs_contain("ERROR"));
        assert!(logs_contain("app.worker"));
    }
}
