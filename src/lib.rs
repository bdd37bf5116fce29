//! youtrack-sdk - a typed client for the YouTrack REST API.
//!
//! The crate maps YouTrack's polymorphic JSON protocol onto a closed set of
//! strongly-typed entities and derives the `fields` projection the server
//! needs to return exactly the data those entities can hold.
//!
//! - [`model`]: the entity types and discriminated unions.
//! - [`schema`] and [`projection`]: static field descriptors and the
//!   field-selector computation built on them.
//! - [`codec`]: entity to wire map to bytes and back, with the epoch
//!   millisecond timestamp convention.
//! - [`api`]: blocking and async clients with one method per REST resource.
//! - [`config`] and [`logging`]: profiles and log setup for the `youtrack`
//!   binary.

pub mod api;
pub mod codec;
pub mod config;
pub mod error;
pub mod helpers;
pub mod logging;
pub mod model;
pub mod projection;
pub mod schema;

pub use api::YouTrackClient;
pub use error::{Error, Result};
pub use projection::{compute_field_selector, field_selector};

#[doc(hidden)]
pub mod __private {
    pub use paste;
    pub use serde_json;
}
