//! Three-way classification of a decoded JSON-RPC response.

use crate::zbx_client::{RpcEnvelope, RpcError};

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The server answered with an `error` member.
    ApiError(RpcError),
    /// A non-empty `result`.
    Data(Vec<T>),
    /// `result` was empty or missing.
    Empty,
}

impl<T> Outcome<T> {
    /// `error` wins over `result`; an empty `result` is not an error.
    pub fn classify(envelope: RpcEnvelope<Vec<T>>) -> Self {
        if let Some(err) = envelope.error {
            return Self::ApiError(err);
        }
        match envelope.result {
            Some(rows) if !rows.is_empty() => Self::Data(rows),
            _ => Self::Empty,
        }
    }
}
