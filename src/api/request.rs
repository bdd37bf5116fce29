//! Transport-neutral requests and responses.
//!
//! Endpoints describe a call as a [`Request`] plus a parser for the response
//! body. The blocking and async clients only differ in how they execute it.

use std::fmt;

use tracing::warn;

use super::error::{ApiError, Result};
use crate::codec::{self, WireField};

/// HTTP methods used by the YouTrack REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One file of a multipart upload.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name.
    pub name: String,
    pub file_name: String,
    pub content: Vec<u8>,
}

impl FilePart {
    /// A part whose field name doubles as the file name.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        Self {
            file_name: name.clone(),
            name,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("name", &self.name)
            .field("file_name", &self.file_name)
            .field("len", &self.content.len())
            .finish()
    }
}

/// A fully built HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    /// JSON body.
    pub body: Option<Vec<u8>>,
    /// Multipart files.
    pub files: Vec<FilePart>,
}

impl Request {
    pub fn get(url: String) -> Self {
        Self {
            method: Method::Get,
            url,
            body: None,
            files: Vec::new(),
        }
    }

    pub fn post(url: String, body: Option<Vec<u8>>) -> Self {
        Self {
            method: Method::Post,
            url,
            body,
            files: Vec::new(),
        }
    }

    pub fn delete(url: String) -> Self {
        Self {
            method: Method::Delete,
            url,
            body: None,
            files: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_files(mut self, files: Vec<FilePart>) -> Self {
        self.files = files;
        self
    }
}

/// Status and body as received from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Map a raw response to its body.
///
/// Successful responses with an empty body yield `None`; some endpoints
/// answer that way on success.
///
/// # Errors
///
/// - `ApiError::NotFound` for 404
/// - `ApiError::Unauthorized` for 401
/// - `ApiError::UnexpectedStatus` for any other non-2xx status
pub fn check_response(request: &Request, response: RawResponse) -> Result<Option<Vec<u8>>> {
    if !(200..300).contains(&response.status) {
        warn!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            "Request failed"
        );
        return Err(ApiError::from_status(
            response.status,
            request.method.as_str(),
            &request.url,
        ));
    }

    if response.body.is_empty() {
        return Ok(None);
    }
    Ok(Some(response.body))
}

/// Parser applied to the checked response body.
pub type Parser<T> = fn(&Request, Option<Vec<u8>>) -> crate::Result<T>;

/// A request together with the parser for its response.
#[derive(Debug)]
pub struct Call<T> {
    pub request: Request,
    parse: Parser<T>,
}

impl<T> Call<T> {
    pub fn new(request: Request, parse: Parser<T>) -> Self {
        Self { request, parse }
    }

    /// Parse a checked response body.
    pub fn parse(&self, body: Option<Vec<u8>>) -> crate::Result<T> {
        (self.parse)(&self.request, body)
    }
}

/// Decode a required JSON body.
pub fn expect_json<T: WireField>(request: &Request, body: Option<Vec<u8>>) -> crate::Result<T> {
    let body = body.ok_or_else(|| ApiError::EmptyResponse {
        method: request.method.to_string(),
        url: request.url.clone(),
    })?;
    Ok(codec::from_wire_bytes(&body)?)
}

/// Ignore whatever the server sent back.
pub fn discard(_request: &Request, _body: Option<Vec<u8>>) -> crate::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Project;
    use crate::Error;

    fn request() -> Request {
        Request::get("https://server/api/admin/projects/0-0".to_string())
    }

    fn response(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_check_success() {
        let body = check_response(&request(), response(200, "{}")).unwrap();
        assert_eq!(body, Some(b"{}".to_vec()));
    }

    #[test]
    fn test_check_empty_success() {
        assert_eq!(check_response(&request(), response(200, "")).unwrap(), None);
    }

    #[test]
    fn test_check_not_found() {
        assert!(matches!(
            check_response(&request(), response(404, "")),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_check_unauthorized() {
        assert!(matches!(
            check_response(&request(), response(401, "")),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn test_check_server_error_message() {
        let err = check_response(&request(), response(500, "oops")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected status for GET https://server/api/admin/projects/0-0: 500"
        );
    }

    #[test]
    fn test_expect_json_requires_body() {
        let err = expect_json::<Project>(&request(), None).unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::EmptyResponse { .. })));
        assert_eq!(
            err.to_string(),
            "Unexpected empty response from GET https://server/api/admin/projects/0-0"
        );
    }

    #[test]
    fn test_call_parses_body() {
        let call: Call<Project> = Call::new(request(), expect_json::<Project>);
        let project = call
            .parse(Some(br#"{"$type":"Project","shortName":"DEMO"}"#.to_vec()))
            .unwrap();
        assert_eq!(project.short_name().as_deref(), Some("DEMO"));
    }

    #[test]
    fn test_file_part_debug_omits_content() {
        let part = FilePart::new("log.txt", b"secret bytes".to_vec());
        let debug = format!("{:?}", part);
        assert!(debug.contains("log.txt"));
        assert!(!debug.contains("secret"));
    }
}
