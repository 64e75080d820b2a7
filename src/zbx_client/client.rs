use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::Result;
use crate::error::{ConfigError, Error, ZbxError};

use super::rpc::{REQUEST_ID, RpcEnvelope, RpcRequest, body_preview};

const CORRELATION_HEADER: &str = "x-correlation-id";

/// Shared JSON-RPC client for one Zabbix endpoint and one API token.
#[derive(Clone)]
pub struct ZbxClient {
    http: reqwest::Client,
    endpoint: Url,
    token: SecretString,
}

impl ZbxClient {
    /// Build a `ZbxClient` for `endpoint` (the full `api_jsonrpc.php` URL).
    ///
    /// # Errors
    ///
    /// Returns an error if HTTPS is required but the URL uses another scheme,
    /// or if the underlying HTTP client fails to build.
    pub fn new(
        endpoint: Url,
        token: SecretString,
        timeout: Duration,
        connect_timeout: Duration,
        insecure_http: bool,
    ) -> Result<Self> {
        if endpoint.scheme() != "https" && !insecure_http {
            return Err(Error::Config(ConfigError::InvalidField {
                field: "zabbix.url",
                message: "only https URLs are accepted without --insecure".to_string(),
            }));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json-rpc"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .user_agent(concat!("zbxdash/", env!("CARGO_PKG_VERSION")));

        if !insecure_http {
            builder = builder.https_only(true);
        }

        let http = builder
            .build()
            .map_err(|err| ZbxError::Client { source: err })?;

        Ok(Self {
            http,
            endpoint,
            token,
        })
    }

    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `call` for methods whose `result` is an array of rows.
    pub async fn call_rows<T>(&self, method: &str, params: Value) -> Result<RpcEnvelope<Vec<T>>>
    where
        T: DeserializeOwned,
    {
        let envelope = self.call(method, params).await?;
        envelope
            .decode_result(Value::is_array)
            .map_err(|err| result_error(method, &err))
    }

    /// `call` for methods whose `result` is a single object.
    pub async fn call_object<T>(&self, method: &str, params: Value) -> Result<RpcEnvelope<T>>
    where
        T: DeserializeOwned,
    {
        let envelope = self.call(method, params).await?;
        envelope
            .decode_result(Value::is_object)
            .map_err(|err| result_error(method, &err))
    }

    /// Sends one JSON-RPC request and decodes the envelope, leaving `result`
    /// as raw JSON.
    ///
    /// An API-level `error` member is *not* an `Err` here: it comes back inside
    /// the envelope so the caller can classify it. `Err` means the exchange
    /// itself failed (transport, HTTP status, or a body that is not JSON).
    pub async fn call(&self, method: &str, params: Value) -> Result<RpcEnvelope<Value>> {
        let correlation_id = Uuid::now_v7().to_string();
        let started = Instant::now();
        let payload = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            auth: self.token.expose_secret(),
            id: REQUEST_ID,
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CORRELATION_HEADER, &correlation_id)
            .json(&payload)
            .send()
            .await
            .map_err(ZbxError::from)?;

        let status = response.status();
        if !status.is_success() {
            warn!(method, %correlation_id, %status, "zabbix answered with an error status");
            return Err(ZbxError::HttpStatus { status }.into());
        }

        let body = response.bytes().await.map_err(ZbxError::from)?;

        let envelope: RpcEnvelope<Value> =
            serde_json::from_slice(&body).map_err(|err| ZbxError::Json {
                message: format!(
                    "error decoding response body: {err}; body preview: {}",
                    body_preview(&body)
                ),
            })?;

        debug!(
            method,
            %correlation_id,
            latency_ms = started.elapsed().as_millis(),
            api_error = envelope.error.is_some(),
            "zabbix call completed"
        );
        Ok(envelope)
    }
}

fn result_error(method: &str, err: &serde_json::Error) -> Error {
    ZbxError::Json {
        message: format!("unexpected {method} result: {err}"),
    }
    .into()
}
