//! 内建属性键名：适配层会对这些键做专门渲染，其余键一律透传。
//!
//! 键名大小写敏感。

/// 链路上下文；结构化取值渲染为 `[T-{trace_id}]`，普通标量渲染为 `{token} `。
pub const TRACE_CONTEXT: &str = "traceContext";

/// 来源上下文；渲染为 `[a => b]`。
pub const SOURCE_CONTEXT: &str = "sourceContext";

/// 操作上下文；每层作用域渲染为独立的 `[name]` 分组。
pub const OPERATION_CONTEXT: &str = "operationContext";

/// 判断键名是否属于内建属性。
pub fn is_well_known(key: &str) -> bool {
    matches!(key, TRACE_CONTEXT | SOURCE_CONTEXT | OPERATION_CONTEXT)
}
