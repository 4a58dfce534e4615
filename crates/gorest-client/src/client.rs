//! Blocking HTTP client bound to one GoREST account

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};

use gorest_core::dump::{self, DumpError, DumpIndex, Exchange};
use gorest_core::Config;
use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ClientError;

/// Maximum response bytes kept in an error message.
const MAX_BODY_PREVIEW: usize = 512;

/// A decoded response. Empty bodies (e.g. 204) decode to `Value::Null`.
#[derive(Debug, Clone)]
pub(crate) struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

/// One blocking client, with auth and accept headers on every request.
pub struct GorestClient {
    http: reqwest::blocking::Client,
    base_url: String,
    /// Request headers as recorded in dumps
    sent_headers: BTreeMap<String, String>,
    /// `Some` when dumping is enabled
    recorded: Option<RefCell<Vec<Exchange>>>,
}

impl GorestClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns error if no token is configured, a configured header is not a
    /// valid HTTP header, or the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let token = config.bearer_token()?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ClientError::InvalidHeader(AUTHORIZATION.to_string(), e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        for (name, value) in &config.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::InvalidHeader(name.clone(), e.to_string()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::InvalidHeader(name.clone(), e.to_string()))?;
            headers.insert(header_name, header_value);
        }

        let sent_headers = headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        let mut builder = reqwest::blocking::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sent_headers,
            recorded: config.dump.then(|| RefCell::new(Vec::new())),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and decode the response as JSON.
    ///
    /// `operation` is the templated label ("GET /users/{id}") used in dumps.
    pub(crate) fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        operation: &str,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse, ClientError> {
        let url = format!("{}{path}", self.base_url);

        let request_body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ClientError::Decode(format!("request body for {operation}: {e}")))?;

        let mut req = self.http.request(method.clone(), &url);
        if let Some(ref json) = request_body {
            req = req.json(json);
        }

        let start = Instant::now();
        let resp = req.send()?;
        let status = resp.status().as_u16();
        let text = resp.text()?;
        let elapsed = start.elapsed().as_secs_f64();

        debug!(operation, status, body = %text, elapsed, "response received");

        if let Some(recorded) = &self.recorded {
            recorded.borrow_mut().push(Exchange {
                operation: operation.to_string(),
                method: method.as_str().to_string(),
                url,
                request_headers: self.sent_headers.clone(),
                request_body,
                status_code: status,
                response_body: (!text.is_empty()).then(|| text.clone()),
                elapsed,
            });
        }

        let body = decode_body(&text).map_err(|e| {
            ClientError::Decode(format!(
                "{operation} returned {status} with non-JSON body ({e}): {}",
                preview(&text)
            ))
        })?;

        Ok(ApiResponse { status, body })
    }

    /// Exchanges recorded so far; empty unless dumping is enabled.
    #[must_use]
    pub fn exchanges(&self) -> Vec<Exchange> {
        self.recorded
            .as_ref()
            .map(|r| r.borrow().clone())
            .unwrap_or_default()
    }

    /// Write recorded exchanges to `dir` with credentials masked.
    ///
    /// Returns `None` when dumping is disabled.
    ///
    /// # Errors
    ///
    /// Returns error if the dump files cannot be written.
    pub fn write_dump(&self, dir: &Path) -> Result<Option<DumpIndex>, DumpError> {
        match &self.recorded {
            Some(recorded) => dump::write_dump(&recorded.borrow(), dir, true).map(Some),
            None => Ok(None),
        }
    }
}

fn decode_body(text: &str) -> Result<Value, serde_json::Error> {
    if text.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str(text)
    }
}

fn preview(text: &str) -> &str {
    if text.len() <= MAX_BODY_PREVIEW {
        return text;
    }
    let mut end = MAX_BODY_PREVIEW;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
