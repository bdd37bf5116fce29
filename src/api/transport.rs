//! HTTP transports.
//!
//! [`Transport`] and [`AsyncTransport`] are the seams between the clients and
//! the network. The default implementations use `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use super::auth::Auth;
use super::error::{ApiError, Result};
use super::request::{RawResponse, Request};

/// Optional connect and read timeouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Option<Duration>,
    /// Upper bound for the whole request once connected.
    pub read: Option<Duration>,
}

impl Timeouts {
    pub fn new(connect: Option<Duration>, read: Option<Duration>) -> Self {
        Self { connect, read }
    }
}

/// Executes requests on the calling thread.
pub trait Transport {
    fn execute(&self, request: &Request, auth: &Auth) -> Result<RawResponse>;
}

/// Executes requests asynchronously.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn execute(&self, request: &Request, auth: &Auth) -> Result<RawResponse>;
}

fn auth_header(auth: &Auth) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(auth.header_value())
        .map_err(|e| ApiError::InvalidHeader(e.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Blocking transport built on `reqwest::blocking`.
#[derive(Debug, Clone)]
pub struct BlockingReqwestTransport {
    client: reqwest::blocking::Client,
}

impl BlockingReqwestTransport {
    /// Build the HTTP client with the given timeouts.
    pub fn new(timeouts: Timeouts) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(connect) = timeouts.connect {
            builder = builder.connect_timeout(connect);
        }
        // The blocking client applies a 30s default unless told otherwise.
        builder = builder.timeout(timeouts.read);
        let client = builder.build().map_err(ApiError::Network)?;
        Ok(Self { client })
    }
}

impl Transport for BlockingReqwestTransport {
    fn execute(&self, request: &Request, auth: &Auth) -> Result<RawResponse> {
        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .header(AUTHORIZATION, auth_header(auth)?);
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }
        if !request.files.is_empty() {
            let form = request.files.iter().fold(
                reqwest::blocking::multipart::Form::new(),
                |form, file| {
                    form.part(
                        file.name.clone(),
                        reqwest::blocking::multipart::Part::bytes(file.content.clone())
                            .file_name(file.file_name.clone()),
                    )
                },
            );
            builder = builder.multipart(form);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        debug!(status, len = body.len(), "Received response");

        Ok(RawResponse { status, body })
    }
}

/// Async transport built on `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the HTTP client with the given timeouts.
    pub fn new(timeouts: Timeouts) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(connect) = timeouts.connect {
            builder = builder.connect_timeout(connect);
        }
        if let Some(read) = timeouts.read {
            builder = builder.timeout(read);
        }
        let client = builder.build().map_err(ApiError::Network)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AsyncTransport for ReqwestTransport {
    async fn execute(&self, request: &Request, auth: &Auth) -> Result<RawResponse> {
        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .header(AUTHORIZATION, auth_header(auth)?);
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }
        if !request.files.is_empty() {
            let form = request
                .files
                .iter()
                .fold(reqwest::multipart::Form::new(), |form, file| {
                    form.part(
                        file.name.clone(),
                        reqwest::multipart::Part::bytes(file.content.clone())
                            .file_name(file.file_name.clone()),
                    )
                });
            builder = builder.multipart(form);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        debug!(status, len = body.len(), "Received response");

        Ok(RawResponse { status, body })
    }
}
