//! 显式传递的操作作用域栈。
//!
//! # 教案式说明
//! - **意图（Why）**：嵌套的工作单元（请求、批处理步骤等）需要在日志中留下 `[op1] [op2]` 形式的标记；
//!   作用域由调用方显式持有并传递，不依赖线程局部或全局状态；
//! - **逻辑（How）**：[`OperationContext`] 代表一条执行流，内部是一把 `parking_lot::RwLock` 保护的栈，
//!   [`OperationContext::begin`] 压入一层并返回 [`OperationScope`] 守卫，守卫析构时弹出自身以及在它之后压入的所有层；
//! - **契约（What）**：
//!   - [`OperationContext::snapshot`] 按“外层在前”的顺序返回当前全部作用域名称；
//!   - [`OperationContext::fork`]（以及 `clone`）派生子执行流：继承派生时刻的作用域，此后两条流各自独立，
//!     兄弟流之间看不到、也弹不掉对方的作用域。交给其他线程或任务前应先派生。

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::RwLock;

use crate::value::OperationContextValue;

#[derive(Debug)]
struct ScopeEntry {
    id: u64,
    name: String,
}

#[derive(Debug, Default)]
struct Scopes {
    next_id: AtomicU64,
    stack: RwLock<Vec<ScopeEntry>>,
}

/// 一条执行流上的操作作用域栈。
#[derive(Debug, Default)]
pub struct OperationContext {
    scopes: Arc<Scopes>,
}

impl OperationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 派生子执行流，复制当前作用域作为起点。
    ///
    /// 父流随后开启或结束的作用域不会反映到子流，反之亦然。
    pub fn fork(&self) -> Self {
        let inherited: Vec<ScopeEntry> = self
            .scopes
            .stack
            .read()
            .iter()
            .map(|entry| ScopeEntry {
                id: entry.id,
                name: entry.name.clone(),
            })
            .collect();
        Self {
            scopes: Arc::new(Scopes {
                next_id: AtomicU64::new(self.scopes.next_id.load(Ordering::Relaxed)),
                stack: RwLock::new(inherited),
            }),
        }
    }

    /// 与当前句柄共用同一条执行流，供读取作用域的包装器使用。
    pub(crate) fn share(&self) -> Self {
        Self {
            scopes: Arc::clone(&self.scopes),
        }
    }

    /// 进入一层新的操作作用域。
    ///
    /// 返回的守卫必须被持有到作用域结束；立即丢弃等同于空作用域。
    #[must_use = "作用域在守卫析构时结束"]
    pub fn begin(&self, name: impl Into<String>) -> OperationScope {
        let id = self.scopes.next_id.fetch_add(1, Ordering::Relaxed);
        self.scopes.stack.write().push(ScopeEntry {
            id,
            name: name.into(),
        });
        OperationScope {
            scopes: Arc::clone(&self.scopes),
            id,
        }
    }

    /// 当前作用域名称，外层在前。
    pub fn snapshot(&self) -> Vec<String> {
        self.scopes
            .stack
            .read()
            .iter()
            .map(|entry| entry.name.clone())
            .collect()
    }

    /// 以属性值形式返回当前作用域；栈为空时返回 `None`。
    pub fn current_value(&self) -> Option<OperationContextValue> {
        let names = self.snapshot();
        if names.is_empty() {
            None
        } else {
            Some(OperationContextValue::new(names))
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.stack.read().len()
    }
}

impl Clone for OperationContext {
    /// 等同于 [`OperationContext::fork`]。
    fn clone(&self) -> Self {
        self.fork()
    }
}

/// 操作作用域守卫，析构时结束对应作用域。
#[derive(Debug)]
pub struct OperationScope {
    scopes: Arc<Scopes>,
    id: u64,
}

impl Drop for OperationScope {
    fn drop(&mut self) {
        let mut stack = self.scopes.stack.write();
        if let Some(position) = stack.iter().position(|entry| entry.id == self.id) {
            if position + 1 != stack.len() {
                tracing::trace!(
                    target: "logbridge::operation",
                    closed = stack.len() - position - 1,
                    "operation scope ended before its inner scopes"
                );
            }
            stack.truncate(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_scopes_are_listed_outermost_first() {
        let context = OperationContext::new();
        let _outer = context.begin("op1");
        let _inner = context.begin("op2");
        assert_eq!(context.snapshot(), vec!["op1", "op2"]);
    }

    #[test]
    fn dropping_a_scope_pops_it() {
        let context = OperationContext::new();
        let outer = context.begin("op1");
        {
            let _inner = context.begin("op2");
            assert_eq!(context.depth(), 2);
        }
        assert_eq!(context.snapshot(), vec!["op1"]);
        drop(outer);
        assert!(context.current_value().is_none());
    }

    #[test]
    fn dropping_outer_scope_first_closes_inner_ones() {
        let context = OperationContext::new();
        let outer = context.begin("op1");
        let inner = context.begin("op2");
        drop(outer);
        assert_eq!(context.depth(), 0);
        drop(inner);
        assert_eq!(context.depth(), 0);
    }

    #[test]
    fn forked_flow_inherits_current_scopes() {
        let context = OperationContext::new();
        let _request = context.begin("request");
        let child = context.fork();
        let _step = child.begin("step");

        assert_eq!(child.snapshot(), vec!["request", "step"]);
        assert_eq!(context.snapshot(), vec!["request"]);
    }

    #[test]
    fn parent_scopes_opened_after_fork_stay_private() {
        let context = OperationContext::new();
        let child = context.clone();
        let _late = context.begin("late");
        assert!(child.current_value().is_none());
    }

    #[test]
    fn shared_handle_sees_scopes_opened_later() {
        let context = OperationContext::new();
        let reader = context.share();
        let _scope = context.begin("request");
        assert_eq!(
            reader.current_value(),
            Some(OperationContextValue::single("request"))
        );
    }

    #[test]
    fn sibling_flows_cannot_pop_each_others_scopes() {
        let parent = OperationContext::new();
        let _request = parent.begin("request");
        let worker_a = parent.clone();
        let worker_b = parent.clone();

        let guard_a = worker_a.begin("worker-a");
        let _guard_b = worker_b.begin("worker-b");
        assert_eq!(worker_b.snapshot(), vec!["request", "worker-b"]);

        drop(guard_a);
        assert_eq!(worker_a.snapshot(), vec!["request"]);
        assert_eq!(worker_b.snapshot(), vec!["request", "worker-b"]);
    }
}
