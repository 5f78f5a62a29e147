//! 参考层级引擎：以点分名称组织日志器的线程安全注册表。
//!
//! # 教案式说明
//! - **意图（Why）**：适配层需要一个真实可运行的引擎来验证命名、级别继承与输出链路，
//!   同时也作为接入其它引擎时的对照实现；
//! - **逻辑（How）**：
//!   1. 注册表用 `parking_lot::RwLock<HashMap>` 保存日志器，读多写少，创建时才取写锁；
//!   2. 每个日志器通过 `Weak` 反向引用注册表，查询有效级别与祖先追加器时按点分前缀逐级上溯；
//!   3. 所有配置（级别、阈值、追加器、叠加性）实时读取，不做任何缓存；
//! - **契约（What）**：
//!   - 根日志器名为 [`ROOT_LOGGER_NAME`]，默认级别 DEBUG，默认没有追加器；
//!   - 有效级别 = 自身级别 → 最近的已存在祖先的级别 → 根级别；
//!   - 启用条件：`level >= 阈值 && level >= 有效级别`，OFF 永不启用；
//!   - `emit` 依次调用自身与各祖先的追加器，遇到关闭叠加性的日志器即停止上溯；
//!     首个追加器错误原样返回，其后的追加器不再调用。

use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc, Weak,
        atomic::{AtomicBool, Ordering},
    },
    time::SystemTime,
};

use parking_lot::RwLock;

use crate::{
    appender::Appender,
    config::{HierarchyConfig, ResolvedLogger},
    engine::{LoggerRepository, NativeEvent, NativeLevel, NativeLogger},
    error::{AppendError, ConfigError},
};

/// 根日志器的名称。
pub const ROOT_LOGGER_NAME: &str = "root";

struct Shared {
    root: Arc<HierarchyLogger>,
    loggers: RwLock<HashMap<String, Arc<HierarchyLogger>>>,
    threshold: RwLock<NativeLevel>,
}

impl Shared {
    /// 已存在的祖先日志器，最近的在前，不含根。
    fn ancestors_of(&self, name: &str) -> Vec<Arc<HierarchyLogger>> {
        let loggers = self.loggers.read();
        name.char_indices()
            .rev()
            .filter(|(_, ch)| *ch == '.')
            .filter_map(|(index, _)| loggers.get(&name[..index]).cloned())
            .collect()
    }
}

/// 层级日志引擎。克隆得到的是同一个注册表的句柄。
#[derive(Clone)]
pub struct Hierarchy {
    shared: Arc<Shared>,
}

impl Hierarchy {
    pub fn new() -> Self {
        let shared = Arc::new_cyclic(|weak: &Weak<Shared>| Shared {
            root: Arc::new(HierarchyLogger::new(
                ROOT_LOGGER_NAME,
                Some(NativeLevel::DEBUG),
                true,
                weak.clone(),
            )),
            loggers: RwLock::new(HashMap::new()),
            threshold: RwLock::new(NativeLevel::ALL),
        });
        Self { shared }
    }

    /// 按名称取得日志器，不存在时创建；空名称与 [`ROOT_LOGGER_NAME`] 都指向根。
    pub fn logger(&self, name: &str) -> Arc<HierarchyLogger> {
        if name.is_empty() || name == ROOT_LOGGER_NAME {
            return Arc::clone(&self.shared.root);
        }
        if let Some(existing) = self.shared.loggers.read().get(name) {
            return Arc::clone(existing);
        }

        let mut loggers = self.shared.loggers.write();
        let logger = loggers.entry(name.to_owned()).or_insert_with(|| {
            tracing::debug!(target: "logbridge::hierarchy", logger = name, "created logger");
            Arc::new(HierarchyLogger::new(
                name,
                None,
                false,
                Arc::downgrade(&self.shared),
            ))
        });
        Arc::clone(logger)
    }

    pub fn root_logger(&self) -> Arc<HierarchyLogger> {
        Arc::clone(&self.shared.root)
    }

    /// 判断日志器是否已被创建，不会触发创建。
    pub fn exists(&self, name: &str) -> bool {
        name == ROOT_LOGGER_NAME || self.shared.loggers.read().contains_key(name)
    }

    /// 已创建的全部日志器名称（不含根），按字典序排列。
    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.shared.loggers.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn threshold(&self) -> NativeLevel {
        self.shared.threshold.read().clone()
    }

    pub fn set_threshold(&self, level: NativeLevel) {
        *self.shared.threshold.write() = level;
    }

    /// 实时应用配置；任一级别名称无效时不做任何修改。
    pub fn configure(&self, config: &HierarchyConfig) -> Result<(), ConfigError> {
        let resolved = config.resolve()?;

        if let Some(threshold) = resolved.threshold {
            self.set_threshold(threshold);
        }
        apply(&self.shared.root, resolved.root);
        for (name, logger) in resolved.loggers {
            apply(&self.logger(&name), logger);
        }
        tracing::debug!(
            target: "logbridge::hierarchy",
            threshold = %self.threshold(),
            "hierarchy configuration applied"
        );
        Ok(())
    }

    /// 恢复初始状态：阈值 ALL、根级别 DEBUG、其余日志器不设级别、叠加性开启，并移除全部追加器。
    pub fn reset(&self) {
        self.set_threshold(NativeLevel::ALL);
        let root = &self.shared.root;
        root.set_level(Some(NativeLevel::DEBUG));
        root.set_additivity(true);
        root.clear_appenders();
        for logger in self.shared.loggers.read().values() {
            logger.set_level(None);
            logger.set_additivity(true);
            logger.clear_appenders();
        }
    }
}

fn apply(logger: &HierarchyLogger, resolved: ResolvedLogger) {
    if let Some(level) = resolved.level {
        logger.set_level(Some(level));
    }
    if let Some(additivity) = resolved.additivity {
        logger.set_additivity(additivity);
    }
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hierarchy")
            .field("threshold", &self.threshold())
            .field("loggers", &self.shared.loggers.read().len())
            .finish()
    }
}

impl LoggerRepository for Hierarchy {
    fn get_logger(&self, name: &str) -> Arc<dyn NativeLogger> {
        self.logger(name)
    }

    fn root(&self) -> Option<Arc<dyn NativeLogger>> {
        Some(self.root_logger())
    }
}

/// 层级中的单个日志器。
pub struct HierarchyLogger {
    name: String,
    level: RwLock<Option<NativeLevel>>,
    appenders: RwLock<Vec<Arc<dyn Appender>>>,
    additive: AtomicBool,
    is_root: bool,
    repository: Weak<Shared>,
}

impl HierarchyLogger {
    fn new(
        name: &str,
        level: Option<NativeLevel>,
        is_root: bool,
        repository: Weak<Shared>,
    ) -> Self {
        Self {
            name: name.to_owned(),
            level: RwLock::new(level),
            appenders: RwLock::new(Vec::new()),
            additive: AtomicBool::new(true),
            is_root,
            repository,
        }
    }

    /// 自身配置的级别；`None` 表示继承。
    pub fn level(&self) -> Option<NativeLevel> {
        self.level.read().clone()
    }

    pub fn set_level(&self, level: Option<NativeLevel>) {
        *self.level.write() = level;
    }

    /// 沿层级解析出的实际生效级别。
    pub fn effective_level(&self) -> NativeLevel {
        if let Some(level) = self.level() {
            return level;
        }
        let Some(shared) = self.repository.upgrade() else {
            return NativeLevel::DEBUG;
        };
        shared
            .ancestors_of(&self.name)
            .iter()
            .find_map(|ancestor| ancestor.level())
            .or_else(|| shared.root.level())
            .unwrap_or(NativeLevel::DEBUG)
    }

    pub fn add_appender(&self, appender: Arc<dyn Appender>) {
        self.appenders.write().push(appender);
    }

    pub fn clear_appenders(&self) {
        self.appenders.write().clear();
    }

    pub fn appender_count(&self) -> usize {
        self.appenders.read().len()
    }

    pub fn additivity(&self) -> bool {
        self.additive.load(Ordering::Acquire)
    }

    /// 关闭后事件不再向祖先的追加器传递。
    pub fn set_additivity(&self, additive: bool) {
        self.additive.store(additive, Ordering::Release);
    }

    /// 本次发出需要调用的追加器，按“自身 → 祖先 → 根”的顺序。
    fn collect_appenders(&self) -> Vec<Arc<dyn Appender>> {
        let mut targets = self.appenders.read().clone();
        if self.is_root || !self.additivity() {
            return targets;
        }
        let Some(shared) = self.repository.upgrade() else {
            return targets;
        };
        for ancestor in shared
            .ancestors_of(&self.name)
            .iter()
            .chain(std::iter::once(&shared.root))
        {
            targets.extend(ancestor.appenders.read().iter().cloned());
            if !ancestor.additivity() {
                break;
            }
        }
        targets
    }
}

impl NativeLogger for HierarchyLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled_for(&self, level: &NativeLevel) -> bool {
        if *level == NativeLevel::OFF {
            return false;
        }
        let threshold = self
            .repository
            .upgrade()
            .map_or(NativeLevel::ALL, |shared| shared.threshold.read().clone());
        *level >= threshold && *level >= self.effective_level()
    }

    fn emit(&self, mut event: NativeEvent) -> Result<(), AppendError> {
        if event.timestamp.is_none() {
            event.timestamp = Some(SystemTime::now());
        }
        for appender in self.collect_appenders() {
            appender.append(&event)?;
        }
        Ok(())
    }
}

impl fmt::Debug for HierarchyLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HierarchyLogger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("additive", &self.additivity())
            .field("appenders", &self.appender_count())
            .finish()
    }
}
