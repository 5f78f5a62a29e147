//! 面向调用方的日志实例：绑定一个引擎日志器，并携带累积的上下文链。
//!
//! # 教案式说明
//! - **意图（Why）**：调用方通过 `for_context` 为子组件派生日志实例，名称需要逐级累积且渲染稳定；
//!   上下文链由实例自身以有序片段保存，不依赖引擎如何拼接层级名称；
//! - **逻辑（How）**：
//!   1. `log` 先做空事件与级别短路，再交给 [`translate_event`] 生成原生事件并提交；
//!   2. `for_context(Some(name))` 追加片段，用 [`AdapterSettings::logger_name_factory`] 计算引擎日志器名称，
//!      再向仓库取得（必要时创建）对应日志器；
//!   3. `for_context(None)` 回到仓库的根日志器，清空上下文链；
//! - **契约（What）**：
//!   - 实例不可变，派生总是返回新实例或自身，可在线程间自由共享；
//!   - 渲染使用的是上下文片段本身（以 ` => ` 连接），与名称工厂的输出无关；
//!   - 引擎提交失败原样包装进 [`EmitError`] 返回。

use std::{fmt, sync::Arc};

use logbridge_core::{EmitError, Log, LogEvent, LogSeverity};

use crate::{
    engine::{LoggerRepository, NativeLogger},
    event::translate_event,
    level::to_native,
};

/// 由完整上下文链（基础名称在前）计算引擎日志器名称的函数。
pub type LoggerNameFactory = Arc<dyn Fn(&[String]) -> String + Send + Sync>;

/// 默认的名称工厂：以 `.` 连接，对应层级引擎的命名约定。
pub fn dotted_logger_name(chain: &[String]) -> String {
    chain.join(".")
}

/// 适配层的可调整项。
#[derive(Clone)]
pub struct AdapterSettings {
    /// 是否把内建属性与上下文链渲染为消息前缀，默认开启。
    pub render_well_known: bool,
    /// 派生上下文时计算引擎日志器名称，默认 [`dotted_logger_name`]。
    pub logger_name_factory: LoggerNameFactory,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            render_well_known: true,
            logger_name_factory: Arc::new(dotted_logger_name),
        }
    }
}

impl fmt::Debug for AdapterSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterSettings")
            .field("render_well_known", &self.render_well_known)
            .finish_non_exhaustive()
    }
}

/// 把 [`Log`] 契约翻译到层级日志引擎的日志实例。
///
/// 构造时必须提供引擎仓库与日志器，不存在“未绑定引擎”的实例。
pub struct BridgeLog {
    repository: Arc<dyn LoggerRepository>,
    logger: Arc<dyn NativeLogger>,
    /// 上下文链的起点，即最初绑定的日志器名称。
    base_name: Arc<str>,
    context: Arc<[String]>,
    settings: Arc<AdapterSettings>,
}

impl BridgeLog {
    pub fn new(repository: Arc<dyn LoggerRepository>, logger: Arc<dyn NativeLogger>) -> Self {
        let base_name = Arc::from(logger.name());
        Self {
            repository,
            logger,
            base_name,
            context: Arc::from(Vec::new()),
            settings: Arc::new(AdapterSettings::default()),
        }
    }

    /// 按名称从仓库取得日志器并绑定。
    pub fn for_logger(repository: Arc<dyn LoggerRepository>, name: &str) -> Self {
        let logger = repository.get_logger(name);
        Self::new(repository, logger)
    }

    pub fn with_settings(mut self, settings: AdapterSettings) -> Self {
        self.settings = Arc::new(settings);
        self
    }

    /// 当前绑定的引擎日志器名称。
    pub fn logger_name(&self) -> &str {
        self.logger.name()
    }

    /// 累积的上下文片段，外层在前。
    pub fn context_chain(&self) -> &[String] {
        &self.context
    }

    pub fn native_logger(&self) -> &Arc<dyn NativeLogger> {
        &self.logger
    }

    pub fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    fn derive(
        &self,
        logger: Arc<dyn NativeLogger>,
        base_name: Arc<str>,
        context: Arc<[String]>,
    ) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            logger,
            base_name,
            context,
            settings: Arc::clone(&self.settings),
        }
    }
}

impl Log for BridgeLog {
    fn log(&self, event: Option<&LogEvent>) -> Result<(), EmitError> {
        let Some(event) = event else {
            return Ok(());
        };
        if !self.is_enabled_for(event.level()) {
            return Ok(());
        }

        let native = translate_event(self.logger.as_ref(), &self.context, event, &self.settings);
        self.logger.emit(native).map_err(EmitError::new)
    }

    fn is_enabled_for(&self, level: LogSeverity) -> bool {
        self.logger.is_enabled_for(&to_native(level))
    }

    fn for_context(self: Arc<Self>, context: Option<&str>) -> Arc<dyn Log> {
        let Some(name) = context else {
            let Some(root) = self.repository.root() else {
                return self;
            };
            if self.context.is_empty() && root.name() == self.logger.name() {
                return self;
            }
            let base_name = Arc::from(root.name());
            return Arc::new(self.derive(root, base_name, Arc::from(Vec::new())));
        };

        if name.is_empty() {
            return self;
        }

        let mut segments = self.context.to_vec();
        segments.push(name.to_owned());
        let chain: Vec<String> = std::iter::once(self.base_name.to_string())
            .chain(segments.iter().cloned())
            .collect();
        let logger_name = (self.settings.logger_name_factory)(&chain);
        let logger = self.repository.get_logger(&logger_name);

        tracing::trace!(
            target: "logbridge::context",
            from = self.logger.name(),
            to = logger.name(),
            "derived context logger"
        );
        Arc::new(self.derive(logger, self.base_name.clone(), segments.into()))
    }
}

impl PartialEq for BridgeLog {
    fn eq(&self, other: &Self) -> bool {
        self.logger.name() == other.logger.name() && self.context == other.context
    }
}

impl fmt::Debug for BridgeLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeLog")
            .field("logger", &self.logger.name())
            .field("context", &self.context)
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hierarchy, MemoryAppender};

    fn setup() -> (Hierarchy, Arc<MemoryAppender>, Arc<BridgeLog>) {
        let hierarchy = Hierarchy::new();
        let appender = Arc::new(MemoryAppender::new());
        hierarchy.root_logger().add_appender(appender.clone());
        let log = Arc::new(BridgeLog::for_logger(Arc::new(hierarchy.clone()), "root"));
        (hierarchy, appender, log)
    }

    #[test]
    fn children_are_named_below_the_bound_logger() {
        let (hierarchy, _, log) = setup();
        let _child = log.for_context(Some("svc"));
        assert!(hierarchy.exists("root.svc"));
        assert!(!hierarchy.exists("svc"));
    }

    #[test]
    fn named_binding_prefixes_children_with_base_name() {
        let hierarchy = Hierarchy::new();
        let log = Arc::new(BridgeLog::for_logger(Arc::new(hierarchy.clone()), "app"));
        let _ = log.for_context(Some("db")).for_context(Some("pool"));
        assert!(hierarchy.exists("app.db.pool"));
    }

    #[test]
    fn accessors_expose_binding_and_chain() {
        let (hierarchy, _, log) = setup();
        assert_eq!(log.logger_name(), "root");
        assert!(log.context_chain().is_empty());

        let child = BridgeLog::for_logger(Arc::new(hierarchy.clone()), "root.svc");
        assert_eq!(child.native_logger().name(), "root.svc");
        assert!(child.settings().render_well_known);
    }

    #[test]
    fn empty_context_name_returns_same_instance() {
        let (_, _, log) = setup();
        let as_dyn: Arc<dyn Log> = log.clone();
        let derived = log.for_context(Some(""));
        assert!(Arc::ptr_eq(&as_dyn, &derived));
    }

    #[test]
    fn custom_factory_names_logger_but_not_prefix() {
        let (hierarchy, appender, _) = setup();
        let settings = AdapterSettings {
            logger_name_factory: Arc::new(|chain: &[String]| {
                chain.iter().rev().cloned().collect::<Vec<_>>().join("/")
            }),
            ..AdapterSettings::default()
        };
        let log = Arc::new(
            BridgeLog::for_logger(Arc::new(hierarchy.clone()), "root").with_settings(settings),
        );

        let derived = log.for_context(Some("a")).for_context(Some("b"));
        derived.log(Some(&LogEvent::new(LogSeverity::Info, "x"))).unwrap();

        assert!(hierarchy.exists("b/a/root"));
        assert_eq!(appender.take(), vec!["[a => b] x"]);
    }
}
