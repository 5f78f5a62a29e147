//! 内建属性的前缀渲染。
//!
//! # 教案式说明
//! - **意图（Why）**：链路、来源上下文与操作上下文需要以固定格式出现在消息最前面，
//!   而引擎布局对这些键一无所知，所以前缀在翻译阶段就生成好；
//! - **逻辑（How）**：按“链路 → 来源上下文 → 操作上下文”的固定顺序生成片段，片段之间以单个空格连接，
//!   末尾再补一个空格与模板文本隔开；被消费的内建键不再透传；
//! - **契约（What）**：
//!   - `Trace(ctx)` → `[T-{32 位小写十六进制}]`；标量 → `{token}`；
//!   - 来源上下文 = 日志器累积的上下文链 ++ 事件自带的名称，合并为一个 `[a => b]` 分组；
//!   - 操作上下文每层一个 `[name]` 分组，外层在前；
//!   - 空序列不产生片段；形态不符的内建值按普通属性透传，只留下一条 `debug` 诊断。

use std::collections::BTreeMap;

use logbridge_core::{PropertyValue, keys};

/// 渲染结果：消息前缀与剩余的透传属性。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderedPrefix {
    pub prefix: String,
    pub passthrough: BTreeMap<String, PropertyValue>,
}

/// 根据上下文链与事件属性生成前缀。
pub fn render_prefix(
    context_chain: &[String],
    properties: &BTreeMap<String, PropertyValue>,
) -> RenderedPrefix {
    let mut passthrough = BTreeMap::new();
    let mut trace = None;
    let mut source: Vec<&str> = context_chain.iter().map(String::as_str).collect();
    let mut operations: Vec<&str> = Vec::new();

    for (key, value) in properties {
        match (key.as_str(), value) {
            (keys::TRACE_CONTEXT, PropertyValue::Trace(context)) => {
                trace = Some(format!("[T-{}]", context.trace_id.to_hex()));
            }
            (keys::TRACE_CONTEXT, PropertyValue::Scalar(token)) => {
                let token = token.to_string();
                if !token.is_empty() {
                    trace = Some(token);
                }
            }
            (keys::SOURCE_CONTEXT, PropertyValue::SourceContext(names)) => {
                source.extend(names.names().iter().map(String::as_str));
            }
            (keys::OPERATION_CONTEXT, PropertyValue::OperationContext(names)) => {
                operations.extend(names.names().iter().map(String::as_str));
            }
            (name, value) => {
                if keys::is_well_known(name) {
                    tracing::debug!(
                        target: "logbridge::render",
                        key = name,
                        value = %value,
                        "well-known property has an unexpected shape, passing it through"
                    );
                }
                passthrough.insert(key.clone(), value.clone());
            }
        }
    }

    let mut fragments: Vec<String> = Vec::with_capacity(3);
    fragments.extend(trace);
    if !source.is_empty() {
        fragments.push(format!("[{}]", source.join(" => ")));
    }
    if !operations.is_empty() {
        let groups: Vec<String> = operations.iter().map(|name| format!("[{name}]")).collect();
        fragments.push(groups.join(" "));
    }

    let mut prefix = fragments.join(" ");
    if !prefix.is_empty() {
        prefix.push(' ');
    }
    RenderedPrefix {
        prefix,
        passthrough,
    }
}

#[cfg(test)]
mod tests {
    use logbridge_core::{
        OperationContextValue, ScalarValue, SourceContextValue, SpanId, TraceContext, TraceId,
    };

    use super::*;

    fn props(entries: Vec<(&str, PropertyValue)>) -> BTreeMap<String, PropertyValue> {
        entries
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect()
    }

    #[test]
    fn no_context_means_no_prefix() {
        let rendered = render_prefix(&[], &props(vec![("user", "alice".into())]));
        assert_eq!(rendered.prefix, "");
        assert_eq!(rendered.passthrough.len(), 1);
    }

    #[test]
    fn fragments_follow_fixed_order() {
        let trace = TraceContext::new(TraceId::from_bytes([0xab; 16]), SpanId::from_bytes([1; 8]));
        let properties = props(vec![
            (keys::OPERATION_CONTEXT, OperationContextValue::new(["op1", "op2"]).into()),
            (keys::SOURCE_CONTEXT, SourceContextValue::single("event").into()),
            (keys::TRACE_CONTEXT, PropertyValue::Trace(trace)),
        ]);
        let rendered = render_prefix(&["logger".to_owned()], &properties);
        assert_eq!(
            rendered.prefix,
            format!("[T-{}] [logger => event] [op1] [op2] ", "ab".repeat(16))
        );
        assert!(rendered.passthrough.is_empty());
    }

    #[test]
    fn plain_trace_token_renders_without_brackets() {
        let rendered = render_prefix(&[], &props(vec![(keys::TRACE_CONTEXT, "guid".into())]));
        assert_eq!(rendered.prefix, "guid ");
    }

    #[test]
    fn empty_sequences_render_nothing() {
        let properties = props(vec![
            (keys::SOURCE_CONTEXT, SourceContextValue::default().into()),
            (keys::OPERATION_CONTEXT, OperationContextValue::default().into()),
            (keys::TRACE_CONTEXT, ScalarValue::Null.into()),
        ]);
        let rendered = render_prefix(&[], &properties);
        assert_eq!(rendered.prefix, "");
        assert!(rendered.passthrough.is_empty());
    }

    #[test]
    fn malformed_well_known_values_pass_through() {
        let properties = props(vec![
            (keys::SOURCE_CONTEXT, "not-a-sequence".into()),
            (keys::OPERATION_CONTEXT, 42_i64.into()),
        ]);
        let rendered = render_prefix(&["ctx".to_owned()], &properties);
        assert_eq!(rendered.prefix, "[ctx] ");
        assert_eq!(rendered.passthrough, properties);
    }
}
