//! HTTP boundary of the front-end
//!
//! Every backend call goes through [`ApiTransport`], a single-method trait:
//! the browser build uses [`GlooTransport`], tests script the responses.

use crate::shared::api_utils::api_base;
use crate::shared::config::config;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// File picked for a bulk import
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart { field: String, file: UploadFile },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the API origin, starting with `/api/`
    pub path: String,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: RequestBody::Empty,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: RequestBody::Empty,
        }
    }

    pub fn post_json<T: Serialize + ?Sized>(path: impl Into<String>, body: &T) -> Result<Self, ApiError> {
        Self::with_json(Method::Post, path.into(), body)
    }

    pub fn put_json<T: Serialize + ?Sized>(path: impl Into<String>, body: &T) -> Result<Self, ApiError> {
        Self::with_json(Method::Put, path.into(), body)
    }

    pub fn upload(path: impl Into<String>, field: &str, file: UploadFile) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: RequestBody::Multipart {
                field: field.to_string(),
                file,
            },
        }
    }

    fn with_json<T: Serialize + ?Sized>(method: Method, path: String, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(Self {
            method,
            path,
            body: RequestBody::Json(value),
        })
    }

    /// JSON body, if any
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into [`ApiError::Status`]
    pub fn into_result(self) -> Result<Self, ApiError> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(ApiError::Status {
                status: self.status,
                body: self.body,
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Failed to serialize request: {0}")]
    Encode(String),
}

impl ApiError {
    /// Text shown to the user: the server's body for HTTP failures
    pub fn detail(&self) -> String {
        match self {
            Self::Status { status, body } if body.trim().is_empty() => format!("HTTP {}", status),
            Self::Status { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

/// The only way the front-end talks to the backend
#[async_trait(?Send)]
pub trait ApiTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Send and fail on transport errors or non-2xx statuses
pub async fn send_checked<T>(transport: &T, request: ApiRequest) -> Result<ApiResponse, ApiError>
where
    T: ApiTransport + ?Sized,
{
    transport.send(request).await?.into_result()
}

/// GET a path and decode its JSON body
pub async fn get_json<R, T>(transport: &T, path: impl Into<String>) -> Result<R, ApiError>
where
    R: DeserializeOwned,
    T: ApiTransport + ?Sized,
{
    send_checked(transport, ApiRequest::get(path)).await?.json()
}

/// Browser transport over gloo-net, every request raced against a timeout
#[derive(Debug, Clone)]
pub struct GlooTransport {
    base: String,
    timeout_ms: u32,
}

impl GlooTransport {
    pub fn new(base: impl Into<String>, timeout_ms: u32) -> Self {
        Self {
            base: base.into(),
            timeout_ms,
        }
    }

    pub fn from_config() -> Self {
        Self::new(api_base(), config().api.timeout_ms)
    }

    async fn perform(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        use gloo_net::http::Request;

        let url = format!("{}{}", self.base, request.path);
        let builder = match request.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Delete => Request::delete(&url),
        };

        let prepared = match request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart { field, file } => builder.body(build_form_data(&field, &file)?),
        }
        .map_err(|e| ApiError::Encode(e.to_string()))?;

        let response = prepared
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

#[async_trait(?Send)]
impl ApiTransport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        use futures::future::{select, Either};

        let label = format!("{} {}", request.method.as_str(), request.path);
        let perform = self.perform(request);
        let timeout = gloo_timers::future::TimeoutFuture::new(self.timeout_ms);
        futures::pin_mut!(perform);

        match select(perform, timeout).await {
            Either::Left((result, _)) => result,
            Either::Right(_) => {
                log::error!("{} timed out after {} ms", label, self.timeout_ms);
                Err(ApiError::Transport(format!(
                    "request timed out after {} ms",
                    self.timeout_ms
                )))
            }
        }
    }
}

fn build_form_data(field: &str, file: &UploadFile) -> Result<web_sys::FormData, ApiError> {
    let js_err = |e: wasm_bindgen::JsValue| ApiError::Encode(format!("{e:?}"));

    let form = web_sys::FormData::new().map_err(js_err)?;
    let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(&file.mime);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_err)?;
    form.append_with_blob_and_filename(field, &blob, &file.name)
        .map_err(js_err)?;
    Ok(form)
}


#[cfg(test)]
mod tests {
    use super::testing::FakeTransport;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_detail_prefers_body() {
        let err = ApiResponse::new(500, "descricao obrigatoria").into_result().unwrap_err();
        assert_eq!(err.detail(), "descricao obrigatoria");
        let err = ApiResponse::new(502, "").into_result().unwrap_err();
        assert_eq!(err.detail(), "HTTP 502");
    }

    #[test]
    fn test_post_json_keeps_body() {
        let req = ApiRequest::post_json("/api/cliente", &json!({"nome": "Ana"})).unwrap();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.json(), Some(&json!({"nome": "Ana"})));
    }

    #[tokio::test]
    async fn test_get_json_fails_on_non_2xx() {
        let transport = FakeTransport::new();
        transport.respond(Method::Get, "/api/material/1", 404, "sem material");
        let result: Result<Value, _> = get_json(&transport, "/api/material/1").await;
        assert_eq!(
            result.unwrap_err(),
            ApiError::Status {
                status: 404,
                body: "sem material".into()
            }
        );
    }

    #[tokio::test]
    async fn test_fake_transport_queues_replies() {
        let transport = FakeTransport::new();
        transport
            .respond(Method::Get, "/api/x", 200, "1")
            .respond(Method::Get, "/api/x", 200, "2");
        let a = transport.send(ApiRequest::get("/api/x")).await.unwrap();
        let b = transport.send(ApiRequest::get("/api/x")).await.unwrap();
        let c = transport.send(ApiRequest::get("/api/x")).await.unwrap();
        assert_eq!((a.body.as_str(), b.body.as_str(), c.body.as_str()), ("1", "2", "2"));
        assert_eq!(transport.requests().len(), 3);
    }
}
