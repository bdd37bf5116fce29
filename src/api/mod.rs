//! YouTrack REST client and transport.
//!
//! [`YouTrackClient`] is the async client; [`blocking::YouTrackClient`]
//! offers the same methods without a runtime. Both go through the request
//! builders in [`Endpoints`] and a pluggable transport.

mod auth;
pub mod blocking;
mod client;
mod endpoints;
mod error;
mod request;
mod transport;
mod url;

pub use auth::Auth;
pub use client::YouTrackClient;
pub use endpoints::{Endpoints, Page};
pub use error::{ApiError, Result};
pub use request::{
    check_response, discard, expect_json, Call, FilePart, Method, Parser, RawResponse, Request,
};
pub use transport::{AsyncTransport, BlockingReqwestTransport, ReqwestTransport, Timeouts, Transport};
pub use url::{QueryValue, UrlBuilder};
