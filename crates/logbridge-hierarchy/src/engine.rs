//! 目标日志引擎的窄契约。
//!
//! # 教案式说明
//! - **意图（Why）**：适配层只通过三件事与引擎交互：按层级名称取得（必要时创建）日志器、询问某级别是否启用、
//!   提交翻译后的事件。把这三件事定义为 Trait，引擎的存储模型、追加器与布局都留在契约之外；
//! - **逻辑（How）**：[`LoggerRepository`] 负责名称到日志器的幂等解析，[`NativeLogger`] 负责启用判断与提交，
//!   [`NativeEvent`] 是提交时使用的原生事件；
//! - **契约（What）**：
//!   - 同名的 `get_logger` 必须返回同一个底层日志器，且可被多个线程并发调用；
//!   - 不支持层级的引擎在 [`LoggerRepository::root`] 中返回 `None`；
//!   - `emit` 的失败以 [`AppendError`] 返回，适配层会原样向调用方传播。

use std::{
    borrow::Cow, cmp::Ordering, collections::BTreeMap, fmt, hash, sync::Arc, time::SystemTime,
};

use logbridge_core::{PropertyValue, ScalarValue, SharedError};

use crate::{error::AppendError, format::format_template};

/// 引擎的原生级别：数值决定严重程度，名称仅用于展示。
///
/// 比较、相等与哈希都只看数值，因此引擎可以为同一数值定义别名。
#[derive(Clone, Debug)]
pub struct NativeLevel {
    value: u32,
    name: Cow<'static, str>,
}

impl NativeLevel {
    pub const ALL: NativeLevel = NativeLevel::named(0, "ALL");
    pub const TRACE: NativeLevel = NativeLevel::named(20_000, "TRACE");
    pub const DEBUG: NativeLevel = NativeLevel::named(30_000, "DEBUG");
    pub const INFO: NativeLevel = NativeLevel::named(40_000, "INFO");
    pub const NOTICE: NativeLevel = NativeLevel::named(50_000, "NOTICE");
    pub const WARN: NativeLevel = NativeLevel::named(60_000, "WARN");
    pub const ERROR: NativeLevel = NativeLevel::named(70_000, "ERROR");
    pub const CRITICAL: NativeLevel = NativeLevel::named(90_000, "CRITICAL");
    pub const FATAL: NativeLevel = NativeLevel::named(110_000, "FATAL");
    pub const OFF: NativeLevel = NativeLevel::named(u32::MAX, "OFF");

    /// 引擎预定义的全部级别，按数值升序排列。
    pub const DEFINED: [NativeLevel; 10] = [
        NativeLevel::ALL,
        NativeLevel::TRACE,
        NativeLevel::DEBUG,
        NativeLevel::INFO,
        NativeLevel::NOTICE,
        NativeLevel::WARN,
        NativeLevel::ERROR,
        NativeLevel::CRITICAL,
        NativeLevel::FATAL,
        NativeLevel::OFF,
    ];

    const fn named(value: u32, name: &'static str) -> Self {
        Self {
            value,
            name: Cow::Borrowed(name),
        }
    }

    /// 自定义级别，例如引擎扩展的中间级别。
    pub fn custom(value: u32, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            value,
            name: name.into(),
        }
    }

    /// 大小写不敏感地查找预定义级别。
    pub fn parse(name: &str) -> Option<NativeLevel> {
        let name = name.trim();
        Self::DEFINED
            .into_iter()
            .find(|level| level.name.eq_ignore_ascii_case(name))
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for NativeLevel {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for NativeLevel {}

impl PartialOrd for NativeLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NativeLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl hash::Hash for NativeLevel {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for NativeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// 原生事件的消息部分：适配层渲染出的前缀，加上交给引擎格式化的模板与参数。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NativeMessage {
    pub prefix: String,
    pub template: String,
    pub parameters: Vec<ScalarValue>,
}

/// 提交给引擎的原生事件。
///
/// # 契约说明（What）
/// - `message.template` 与 `message.parameters` 保持调用方传入的原样，由 [`NativeEvent::rendered_message`]
///   在引擎侧完成格式化；
/// - `properties` 仅包含透传属性，已被渲染进前缀的内建属性不会重复出现；
/// - `timestamp` 为 `None` 时由引擎在发出时补齐。
#[derive(Clone, Debug)]
pub struct NativeEvent {
    pub logger_name: String,
    pub level: NativeLevel,
    pub message: NativeMessage,
    pub properties: BTreeMap<String, PropertyValue>,
    pub exception: Option<SharedError>,
    pub timestamp: Option<SystemTime>,
}

impl NativeEvent {
    pub fn new(logger_name: impl Into<String>, level: NativeLevel, message: NativeMessage) -> Self {
        Self {
            logger_name: logger_name.into(),
            level,
            message,
            properties: BTreeMap::new(),
            exception: None,
            timestamp: None,
        }
    }

    /// 最终消息文本：前缀加上格式化后的模板。
    pub fn rendered_message(&self) -> String {
        let body = format_template(
            &self.message.template,
            &self.message.parameters,
            &self.properties,
        );
        if self.message.prefix.is_empty() {
            body
        } else {
            let mut rendered = String::with_capacity(self.message.prefix.len() + body.len());
            rendered.push_str(&self.message.prefix);
            rendered.push_str(&body);
            rendered
        }
    }
}

/// 引擎中的单个具名日志器。
pub trait NativeLogger: Send + Sync {
    /// 完整的层级名称。
    fn name(&self) -> &str;

    /// 按引擎当前配置判断级别是否启用，不得缓存。
    fn is_enabled_for(&self, level: &NativeLevel) -> bool;

    /// 提交事件。
    fn emit(&self, event: NativeEvent) -> Result<(), AppendError>;
}

/// 引擎的日志器注册表。
pub trait LoggerRepository: Send + Sync {
    /// 按名称取得日志器，不存在时创建；同名调用必须返回同一个日志器。
    fn get_logger(&self, name: &str) -> Arc<dyn NativeLogger>;

    /// 层级顶端的根日志器；引擎不支持层级时返回 `None`。
    fn root(&self) -> Option<Arc<dyn NativeLogger>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_compare_by_value_only() {
        let alias = NativeLevel::custom(70_000, "SEVERE");
        assert_eq!(alias, NativeLevel::ERROR);
        assert!(NativeLevel::WARN < NativeLevel::ERROR);
        assert!(NativeLevel::FATAL < NativeLevel::OFF);
    }

    #[test]
    fn parse_finds_defined_levels_ignoring_case() {
        assert_eq!(NativeLevel::parse("warn"), Some(NativeLevel::WARN));
        assert_eq!(NativeLevel::parse(" Critical "), Some(NativeLevel::CRITICAL));
        assert_eq!(NativeLevel::parse("verbose"), None);
    }

    #[test]
    fn rendered_message_prepends_prefix() {
        let event = NativeEvent::new(
            "root",
            NativeLevel::INFO,
            NativeMessage {
                prefix: "[ctx] ".into(),
                template: "Hello, {0}!".into(),
                parameters: vec![ScalarValue::from("world")],
            },
        );
        assert_eq!(event.rendered_message(), "[ctx] Hello, world!");
    }
}
