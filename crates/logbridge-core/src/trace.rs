use core::{fmt, str::FromStr};

use crate::error::ParseIdError;

/// 128 bit 链路标识。
///
/// # 契约说明（What）
/// - `Display` 固定输出 32 位小写十六进制、不含连字符，例如 `11111111111111111111111111111111`；
/// - `FromStr` 同时接受 32 位十六进制与带连字符的 GUID 形式（`8-4-4-4-12`）。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TraceId([u8; 16]);

impl TraceId {
    /// Trace ID 的长度（字节）。
    pub const LENGTH: usize = 16;

    pub const fn from_bytes(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; Self::LENGTH] {
        self.0
    }

    /// 32 位小写十六进制表示。
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for TraceId {
    type Err = ParseIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        decode_id::<{ TraceId::LENGTH }>(value).map(Self)
    }
}

/// 64 bit Span 标识。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpanId([u8; 8]);

impl SpanId {
    /// Span ID 的长度（字节）。
    pub const LENGTH: usize = 8;

    pub const fn from_bytes(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; Self::LENGTH] {
        self.0
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for SpanId {
    type Err = ParseIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        decode_id::<{ SpanId::LENGTH }>(value).map(Self)
    }
}

fn decode_id<const N: usize>(value: &str) -> Result<[u8; N], ParseIdError> {
    let digits: String = value.chars().filter(|ch| *ch != '-').collect();
    if digits.len() != N * 2 {
        return Err(ParseIdError::InvalidLength {
            expected: N * 2,
            found: digits.len(),
        });
    }
    let mut bytes = [0u8; N];
    hex::decode_to_slice(&digits, &mut bytes)?;
    Ok(bytes)
}

/// 链路追踪上下文：一对 Trace/Span 标识。
///
/// # 设计背景（Why）
/// - 日志只关心“这条记录属于哪条链路”，因此仅保留 W3C Trace Context 中的两个标识，
///   采样位与 `tracestate` 由追踪系统自行维护。
///
/// # 契约说明（What）
/// - 作为内建属性 `traceContext` 的结构化取值时，渲染为 `[T-{trace_id}]`，Span 标识不参与渲染。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TraceContext {
    pub trace_id: TraceId,
    pub span_id: SpanId,
}

impl TraceContext {
    pub const fn new(trace_id: TraceId, span_id: SpanId) -> Self {
        Self { trace_id, span_id }
    }
}

/// 按需拉取当前链路上下文的只读接口。
///
/// # 教案式说明
/// - **意图 (Why)**：Trace 标识由外部追踪系统产生并管理作用域，日志层只在写日志的那一刻读取一次；
/// - **契约 (What)**：`current` 每次 `Log::log` 调用都会被查询，不得阻塞；返回 `None` 表示当前不在任何链路内。
pub trait TraceContextProvider: Send + Sync {
    fn current(&self) -> Option<TraceContext>;
}

impl<F> TraceContextProvider for F
where
    F: Fn() -> Option<TraceContext> + Send + Sync,
{
    fn current(&self) -> Option<TraceContext> {
        self()
    }
}

/// 始终返回同一上下文的提供者，适用于请求级别已确定链路的场景与测试。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedTraceContext(pub TraceContext);

impl TraceContextProvider for FixedTraceContext {
    fn current(&self) -> Option<TraceContext> {
        Some(self.0)
    }
}
