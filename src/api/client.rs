use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Characters left alone by `encodeURIComponent`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

// ============================================
// Error Types
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a status outside 200-299.
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    /// No response at all.
    #[error("network error: {0}")]
    Network(String),

    /// A success response whose body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status } => Some(*status),
            _ => None,
        }
    }

    /// Uniqueness conflict (duplicate category, double-booked slot).
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

// ============================================
// Wire Types
// ============================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Per-call options, mirroring `fetch(path, { method, body, headers })`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<B: Serialize + ?Sized>(method: Method, body: &B) -> ApiResult<Self> {
        Ok(Self {
            method,
            body: Some(serde_json::to_string(body)?),
            headers: Vec::new(),
        })
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A binary export pulled from the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct Download {
    pub filename: String,
    pub bytes: Vec<u8>,
}

// ============================================
// Transport
// ============================================

/// Moves one request over the wire. Implementations never interpret status
/// codes; that is the client's job.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse>;
}

// ============================================
// Client
// ============================================

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request and decode the JSON body of a success response.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let response = self.send(path, options).await?;
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_str("null")?);
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(path, RequestOptions::new(Method::Get)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(path, RequestOptions::json(Method::Post, body)?)
            .await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(path, RequestOptions::json(Method::Put, body)?)
            .await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send(path, RequestOptions::new(Method::Delete)).await?;
        Ok(())
    }

    /// Fetch a binary attachment. The filename comes from
    /// `Content-Disposition` when the backend sends one.
    pub async fn download(&self, path: &str, fallback_filename: &str) -> ApiResult<Download> {
        let response = self.send(path, RequestOptions::new(Method::Get)).await?;
        let filename = response
            .header("content-disposition")
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| fallback_filename.to_string());
        Ok(Download {
            filename,
            bytes: response.body,
        })
    }

    async fn send(&self, path: &str, options: RequestOptions) -> ApiResult<ApiResponse> {
        let mut headers = vec![("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())];
        for (name, value) in options.headers {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
            headers.push((name, value));
        }

        let request = ApiRequest {
            method: options.method,
            url: format!("{}{}", self.base_url, path),
            headers,
            body: options.body,
        };
        tracing::debug!(method = %request.method, url = %request.url, "api request");

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ApiError::Http {
                status: response.status,
            });
        }
        Ok(response)
    }
}

/// Append URL-encoded query parameters to `path`.
pub fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, utf8_percent_encode(value, QUERY_VALUE)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}

/// Extract `X` from a `...; filename="X"` header value.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let start = header.find("filename=\"")? + "filename=\"".len();
    let rest = &header[start..];
    let end = rest.rfind('"')?;
    let name = &rest[..end];
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_values_are_encoded() {
        assert_eq!(with_query("/api/recipes", &[]), "/api/recipes");
        assert_eq!(
            with_query("/api/recipes", &[("search", "mac & cheese")]),
            "/api/recipes?search=mac%20%26%20cheese"
        );
        assert_eq!(
            with_query(
                "/api/meal-plans",
                &[("start_date", "2024-01-14"), ("end_date", "2024-01-20")]
            ),
            "/api/meal-plans?start_date=2024-01-14&end_date=2024-01-20"
        );
    }

    #[test]
    fn disposition_filename() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="week-3.pdf""#),
            Some("week-3.pdf".to_string())
        );
        assert_eq!(filename_from_disposition("attachment"), None);
        assert_eq!(filename_from_disposition(r#"attachment; filename="""#), None);
    }

    #[test]
    fn conflict_detection() {
        assert!(ApiError::Http { status: 409 }.is_conflict());
        assert!(!ApiError::Http { status: 500 }.is_conflict());
        assert!(!ApiError::Network("refused".into()).is_conflict());
        assert_eq!(
            ApiError::Http { status: 404 }.to_string(),
            "HTTP error! status: 404"
        );
    }

    #[test]
    fn response_headers_are_case_insensitive() {
        let response = ApiResponse {
            status: 200,
            headers: vec![("Content-Disposition".into(), "inline".into())],
            body: Vec::new(),
        };
        assert_eq!(response.header("content-disposition"), Some("inline"));
        assert!(response.is_success());
    }
}
