pub(crate) mod client;
pub(crate) mod models;
pub(crate) mod ops;
pub(crate) mod rpc;

pub use client::ZbxClient;
pub use models::{CreatedUsers, HistorySample, Problem, Trend};
pub use ops::{HistoryQuery, NewUser, TrendQuery};
pub use rpc::{RpcEnvelope, RpcError};
