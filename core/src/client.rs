//! Shared request construction and response interpretation helpers used by
//! both resource clients.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{FilePart, HttpMethod, HttpRequest, HttpResponse, RequestBody};

/// Join a service-relative route (or a HAL href) with the base URL. Absolute
/// hrefs are used as-is so the client works with servers that emit either
/// form.
pub(crate) fn join(base_url: &str, route: &str) -> String {
    if route.starts_with("http://") || route.starts_with("https://") {
        route.to_string()
    } else {
        format!("{}/{}", base_url, route.trim_start_matches('/'))
    }
}

pub(crate) fn request(method: HttpMethod, path: String, body: Option<RequestBody>) -> HttpRequest {
    tracing::debug!(?method, %path, "built request");
    HttpRequest {
        method,
        path,
        headers: Vec::new(),
        body,
    }
}

pub(crate) fn get(path: String) -> HttpRequest {
    request(HttpMethod::Get, path, None)
}

pub(crate) fn delete(path: String) -> HttpRequest {
    request(HttpMethod::Delete, path, None)
}

pub(crate) fn json_request<T: Serialize + ?Sized>(
    method: HttpMethod,
    path: String,
    payload: &T,
) -> Result<HttpRequest, ApiError> {
    let body =
        serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
    let mut req = request(method, path, Some(RequestBody::Json(body)));
    req.headers
        .push(("content-type".to_string(), "application/json".to_string()));
    Ok(req)
}

pub(crate) fn multipart_request(path: String, file: FilePart) -> HttpRequest {
    request(HttpMethod::Post, path, Some(RequestBody::Multipart(file)))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body_text(),
    })
}

pub(crate) fn parse_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_slice(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
