//! TfL unified API client.
//!
//! This module provides an HTTP client for the Transport for London API,
//! which lists lines, their stops, and stop details.
//!
//! Key characteristics of the API:
//! - Credentials (`app_id`, `app_key`) travel as query parameters
//! - Errors, including rate limiting, are reported inside the JSON body as
//!   `{"statusCode": ..., "message": ...}`
//! - A rate-limited response says how long to wait ("Try again in N seconds")

mod client;
mod error;
mod mock;
mod types;

pub use client::{HttpTransport, TflClient, TflConfig, Transport};
pub use error::TflError;
pub use mock::{MockTransport, RecordedRequest};
pub use types::{LineDto, StopPointDetailDto, StopPointDto};
