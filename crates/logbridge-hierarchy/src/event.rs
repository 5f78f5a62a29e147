//! 事件翻译：把抽象的 [`LogEvent`] 转换为引擎的 [`NativeEvent`]。
//!
//! # 教案式说明
//! - **意图（Why）**：翻译必须无损，模板、参数、异常、时间戳原样交给引擎，只有内建属性被折叠进前缀；
//! - **逻辑（How）**：级别经 [`to_native`] 折算，前缀由 [`render_prefix`] 生成；
//!   关闭内建渲染时所有属性一律透传，上下文链只体现在日志器名称里；
//! - **契约（What）**：翻译是纯函数，不访问引擎状态，也不会失败。

use logbridge_core::LogEvent;

use crate::{
    engine::{NativeEvent, NativeLogger, NativeMessage},
    level::to_native,
    log::AdapterSettings,
    render::{RenderedPrefix, render_prefix},
};

/// 为给定的引擎日志器构造原生事件。
pub fn translate_event(
    logger: &dyn NativeLogger,
    context_chain: &[String],
    event: &LogEvent,
    settings: &AdapterSettings,
) -> NativeEvent {
    let RenderedPrefix {
        prefix,
        passthrough,
    } = if settings.render_well_known {
        render_prefix(context_chain, event.properties())
    } else {
        RenderedPrefix {
            prefix: String::new(),
            passthrough: event.properties().clone(),
        }
    };

    NativeEvent {
        logger_name: logger.name().to_owned(),
        level: to_native(event.level()),
        message: NativeMessage {
            prefix,
            template: event.template().to_owned(),
            parameters: event.parameters().to_vec(),
        },
        properties: passthrough,
        exception: event.exception().cloned(),
        timestamp: event.timestamp(),
    }
}
