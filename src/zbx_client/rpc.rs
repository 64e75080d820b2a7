use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const BODY_PREVIEW_LIMIT: usize = 256;

/// Every request uses the same id; responses are matched by the HTTP exchange.
pub(super) const REQUEST_ID: u64 = 1;

/// A decoded JSON-RPC 2.0 response. At most one of `result` and `error` is
/// expected, but both are kept so the caller decides which one wins.
#[derive(Debug, Deserialize)]
pub struct RpcEnvelope<T> {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<RpcError>,
    #[serde(default)]
    pub id: Value,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl<T> RpcEnvelope<T> {
    pub const fn from_result(result: T) -> Self {
        Self {
            jsonrpc: None,
            result: Some(result),
            error: None,
            id: Value::Null,
        }
    }

    pub const fn from_error(error: RpcError) -> Self {
        Self {
            jsonrpc: None,
            result: None,
            error: Some(error),
            id: Value::Null,
        }
    }

    pub fn map_result<U>(self, f: impl FnOnce(T) -> U) -> RpcEnvelope<U> {
        RpcEnvelope {
            jsonrpc: self.jsonrpc,
            result: self.result.map(f),
            error: self.error,
            id: self.id,
        }
    }
}

impl RpcEnvelope<Value> {
    /// Decodes `result` into `T` when `accepts` recognises its JSON shape.
    /// Any other shape, `null` included, is treated as no result.
    pub(super) fn decode_result<T>(
        self,
        accepts: fn(&Value) -> bool,
    ) -> serde_json::Result<RpcEnvelope<T>>
    where
        T: DeserializeOwned,
    {
        let result = match self.result {
            Some(value) if accepts(&value) => Some(serde_json::from_value(value)?),
            _ => None,
        };
        Ok(RpcEnvelope {
            jsonrpc: self.jsonrpc,
            result,
            error: self.error,
            id: self.id,
        })
    }
}

impl RpcError {
    /// The most specific text the server gave: `data` when it is present and
    /// non-empty, otherwise `message`.
    pub fn detail(&self) -> String {
        match &self.data {
            Some(Value::String(data)) if !data.trim().is_empty() => data.clone(),
            Some(Value::Null | Value::String(_)) | None => self.message.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Serialize)]
pub(super) struct RpcRequest<'a> {
    pub(crate) jsonrpc: &'static str,
    pub(crate) method: &'a str,
    pub(crate) params: Value,
    pub(crate) auth: &'a str,
    pub(crate) id: u64,
}

pub(super) fn body_preview(body: &[u8]) -> String {
    if body.is_empty() {
        return "<empty>".to_string();
    }
    let end = body.len().min(BODY_PREVIEW_LIMIT);
    let mut preview = String::from_utf8_lossy(&body[..end]).to_string();
    if body.len() > BODY_PREVIEW_LIMIT {
        preview.push_str("...");
    }
    preview.replace('\n', "\\n")
}
