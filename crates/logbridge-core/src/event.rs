use std::{collections::BTreeMap, error::Error as StdError, sync::Arc, time::SystemTime};

use crate::{
    severity::LogSeverity,
    value::{PropertyValue, ScalarValue},
};

/// 事件携带的异常对象。
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// 单条日志事件。
///
/// # 设计背景（Why）
/// - 模板与参数分离保存，格式化交给目标引擎完成，适配层不解释 `{0}` 之类的占位符；
/// - 属性集合承载结构化上下文，其中少数内建键会被渲染为消息前缀，见 [`crate::keys`]。
///
/// # 契约说明（What）
/// - **模板**：可包含位置占位符；为空字符串时引擎仍会输出前缀；
/// - **参数**：有序序列，允许出现 [`ScalarValue::Null`]；
/// - **属性**：键大小写敏感，插入顺序无意义，内部以 `BTreeMap` 保存以获得确定的遍历顺序；
/// - **时间戳**：`None` 表示使用引擎的发出时间；
/// - **后置条件**：事件交给 [`Log::log`](crate::Log::log) 后即视为不可变，`with_*` 方法都返回新值。
#[derive(Clone, Debug)]
pub struct LogEvent {
    level: LogSeverity,
    template: String,
    parameters: Vec<ScalarValue>,
    properties: BTreeMap<String, PropertyValue>,
    exception: Option<SharedError>,
    timestamp: Option<SystemTime>,
}

impl LogEvent {
    pub fn new(level: LogSeverity, template: impl Into<String>) -> Self {
        Self {
            level,
            template: template.into(),
            parameters: Vec::new(),
            properties: BTreeMap::new(),
            exception: None,
            timestamp: None,
        }
    }

    pub fn with_parameters<I, V>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ScalarValue>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// 设置属性；同名属性会被覆盖。
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// 仅当事件尚未携带同名属性时才设置。
    pub fn with_property_if_absent(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.entry(key.into()).or_insert_with(|| value.into());
        self
    }

    pub fn with_exception(mut self, exception: SharedError) -> Self {
        self.exception = Some(exception);
        self
    }

    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn level(&self) -> LogSeverity {
        self.level
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn parameters(&self) -> &[ScalarValue] {
        &self.parameters
    }

    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn exception(&self) -> Option<&SharedError> {
        self.exception.as_ref()
    }

    pub fn timestamp(&self) -> Option<SystemTime> {
        self.timestamp
    }
}
