//! JSON over `fetch()`, raced against a timeout.
//!
//! Every exchange resolves to one of:
//! - a decoded 2xx body;
//! - `Server { status, message }` when the backend answered with an error;
//! - `Network` when no response arrived;
//! - `Timeout` when the configured deadline passed first (the fetch is aborted).
//!
//! Bodies are JSON, except file uploads which go out as `multipart/form-data`.

use futures::future::{self, Either};
use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::future::TimeoutFuture;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use js_sys::{Array, Uint8Array};
use web_sys::{AbortController, Blob, FormData};

use chat_types::{ChatError, Result, config::ClientConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    fn builder(self, url: &str) -> RequestBuilder {
        match self {
            Method::Get => Request::get(url),
            Method::Post => Request::post(url),
            Method::Put => Request::put(url),
            Method::Delete => Request::delete(url),
        }
    }
}

enum Body {
    Empty,
    Json(Value),
    Form(FormData),
}

pub struct Transport {
    config: ClientConfig,
}

impl Transport {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let (status, body) = self.execute(Method::Get, path, Body::Empty).await?;
        decode(status, &body)
    }

    pub async fn send_json<B, T>(&self, method: Method, path: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_value(payload)?;
        let (status, body) = self.execute(method, path, Body::Json(payload)).await?;
        decode(status, &body)
    }

    /// POST one file as the `file` field of a multipart form.
    pub async fn upload<T: DeserializeOwned>(&self, path: &str, filename: &str, bytes: &[u8]) -> Result<T> {
        let form = file_form(filename, bytes)?;
        let (status, body) = self.execute(Method::Post, path, Body::Form(form)).await?;
        decode(status, &body)
    }

    /// For endpoints whose success body carries nothing we use.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let (status, body) = self.execute(Method::Delete, path, Body::Empty).await?;
        ensure_success(status, &body)
    }

    async fn execute(&self, method: Method, path: &str, payload: Body) -> Result<(u16, String)> {
        let url = self.config.url(path);
        log::debug!("{} {}", method.as_str(), url);

        let controller = AbortController::new()
            .map_err(|e| ChatError::Network(format!("Request error: {:?}", e)))?;
        let signal = controller.signal();
        let builder = method.builder(&url).abort_signal(Some(&signal));
        let request = match payload {
            Body::Empty => builder.header("Content-Type", "application/json").build(),
            Body::Json(body) => builder.json(&body),
            // fetch() fills in the multipart boundary itself
            Body::Form(form) => builder.body(form),
        }
        .map_err(|e| ChatError::Network(format!("Request error: {}", e)))?;

        let exchange = Box::pin(async move {
            let response = request
                .send()
                .await
                .map_err(|e| ChatError::Network(e.to_string()))?;
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| ChatError::Network(e.to_string()))?;
            Ok::<_, ChatError>((status, text))
        });

        let timeout_ms = self.config.timeout_ms;
        let timer = Box::pin(TimeoutFuture::new(timeout_millis(timeout_ms)));

        match future::select(exchange, timer).await {
            Either::Left((Ok((status, body)), _)) => {
                if is_success(status) {
                    log::debug!("{} {} -> {}", method.as_str(), url, status);
                } else {
                    log::error!("API error {} on {} {}: {}", status, method.as_str(), url, body);
                }
                Ok((status, body))
            }
            Either::Left((Err(e), _)) => {
                log::error!("No response from {} {}: {}", method.as_str(), url, e);
                Err(e)
            }
            Either::Right(_) => {
                controller.abort();
                log::error!("{} {} timed out after {}ms", method.as_str(), url, timeout_ms);
                Err(ChatError::Timeout(timeout_ms))
            }
        }
    }
}

fn file_form(filename: &str, bytes: &[u8]) -> Result<FormData> {
    let js_err = |e: wasm_bindgen::JsValue| ChatError::Network(format!("Request error: {:?}", e));
    let parts = Array::of1(&Uint8Array::from(bytes));
    let blob = Blob::new_with_u8_array_sequence(&parts).map_err(js_err)?;
    let form = FormData::new().map_err(js_err)?;
    form.append_with_blob_and_filename("file", &blob, filename)
        .map_err(js_err)?;
    Ok(form)
}

fn timeout_millis(ms: u64) -> u32 {
    u32::try_from(ms).unwrap_or(u32::MAX)
}

pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Decode a response body, or map an error status to `ChatError::Server`.
pub fn decode<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
    ensure_success(status, body)?;
    serde_json::from_str(body).map_err(ChatError::from)
}

pub fn ensure_success(status: u16, body: &str) -> Result<()> {
    if is_success(status) {
        Ok(())
    } else {
        Err(ChatError::Server {
            status,
            message: server_error_message(status, body),
        })
    }
}

/// Best human-readable text of an error body: `detail`, then `message`,
/// then a generic line naming the status.
pub fn server_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| field_text(&v["detail"]).or_else(|| field_text(&v["message"])))
        .unwrap_or_else(|| format!("Server error: {}", status))
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        // Validation failures report a list of field errors under `detail`
        Value::Array(items) if !items.is_empty() => Some(value.to_string()),
        Value::Object(map) if !map.is_empty() => Some(value.to_string()),
        _ => None,
    }
}
