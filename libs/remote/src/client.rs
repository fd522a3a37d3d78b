use bytes::Bytes;
use http::Request;
use http::header::CONTENT_TYPE;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};
use url::Url;

use crate::{RemoteConfig, RemoteError};

type Connector = HttpsConnector<HttpConnector>;

/// Client for the action-envelope protocol of the remote shift service.
///
/// One logical request is in flight at a time per session; there is no
/// retry layer. A request that exceeds the configured timeout fails with
/// [`RemoteError::Timeout`] and the in-flight request is abandoned.
pub struct ApiClient {
    client: Client<Connector, Full<Bytes>>,
    base_url: Url,
    timeout: std::time::Duration,
}

impl ApiClient {
    /// Build a client for the configured endpoint.
    ///
    /// # Errors
    /// Returns an error if the TLS stack fails to initialize.
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::aws_lc_rs::default_provider())
            .map_err(|e| RemoteError::Tls(e.to_string()))?
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
        })
    }

    /// POST `{ "action": <action>, ...payload }` and unwrap the response
    /// envelope, returning the full response object on success.
    ///
    /// # Errors
    /// Transport failures map to `Timeout`/`Unreachable`/`Status`; an
    /// envelope with neither `success` nor `ok` set maps to `Rejected` with
    /// the service's error code.
    #[instrument(skip_all, fields(action))]
    pub async fn call(&self, action: &str, payload: Value) -> Result<Value, RemoteError> {
        let body = envelope_request(action, payload);
        let request = Request::post(self.base_url.as_str())
            // The web-app host only accepts simple (non-preflighted) content
            // types, so JSON travels as text/plain.
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(Full::new(Bytes::from(serde_json::to_vec(&body)?)))?;

        let response = tokio::time::timeout(self.timeout, self.client.request(request))
            .await
            .map_err(|_| RemoteError::Timeout)?
            .map_err(|e| RemoteError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| RemoteError::InvalidBody(e.to_string()))?
            .to_bytes();
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| RemoteError::InvalidBody(e.to_string()))?;
        debug!(action, "remote call completed");
        parse_envelope(value)
    }
}

fn envelope_request(action: &str, payload: Value) -> Value {
    let mut object = match payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_owned(), other);
            map
        }
    };
    object.insert("action".to_owned(), json!(action));
    Value::Object(object)
}

/// The service reports success as `success: true` or `ok: true` depending
/// on the handler; anything else is a rejection carrying `error`.
fn parse_envelope(value: Value) -> Result<Value, RemoteError> {
    let flag = |key: &str| value.get(key).and_then(Value::as_bool).unwrap_or(false);
    if flag("success") || flag("ok") {
        return Ok(value);
    }
    let code = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("UNKNOWN")
        .to_owned();
    Err(RemoteError::rejected(code))
}
