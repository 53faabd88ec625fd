//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network — the caller (host) is responsible for executing
//! the actual I/O. Upload bodies carry the raw file bytes plus a file name;
//! the host client encodes them as a `multipart/form-data` body with a single
//! part named `file`. Response bodies are kept as raw bytes so binary stream
//! downloads and JSON payloads share one shape.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// A file to upload as the `file` part of a multipart form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl FilePart {
    pub fn new(file_name: &str, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content,
        }
    }
}

/// Request payload, described as data rather than encoded bytes.
///
/// `Json` bodies go out verbatim with an `application/json` content type.
/// `Multipart` bodies are encoded by the host HTTP client as a
/// `multipart/form-data` form with one part named `file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Json(String),
    Multipart(FilePart),
}

/// An HTTP request described as plain data.
///
/// Built by the clients' `build_*` methods. The caller is responsible for
/// executing this request against the network and returning the corresponding
/// `HttpResponse`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the caller after executing an `HttpRequest`, then passed
/// to the clients' `parse_*` methods for interpretation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Response body as UTF-8 text, lossily decoded; used for error reporting.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
