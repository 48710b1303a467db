//! Async REST client core for the myrunes API.
//!
//! # Overview
//! `Gateway` exposes one async method per API operation. Each call builds an
//! `HttpRequest`, hands it to a `Transport` exactly once, and normalizes the
//! outcome to `Ok(ApiResponse { res, body })` or `Err(ApiError)`.
//!
//! # Design
//! - `RunesClient` is stateless and holds only the base URL resolved by
//!   `ClientConfig`. Its `build_*` methods never touch the network.
//! - `Transport` is the I/O seam. `ReqwestTransport` is the production
//!   adapter; tests substitute recording transports.
//! - All response handling lives in `response::normalize`: status >= 400
//!   rejects with the decoded body and headers, anything else resolves.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod response;
pub mod transport;
pub mod types;
pub mod util;

pub use client::RunesClient;
pub use config::{ClientConfig, Mode};
pub use error::{ApiError, ApplicationFailure, TransportError};
pub use gateway::{ApiResult, Gateway};
pub use http::{HttpMethod, HttpRequest, Payload, Query, TransportResponse};
pub use response::{ApiResponse, ResponseMeta};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    ApiToken, CreateShare, Credentials, ListResponse, Page, Perks, PrimaryTree, SecondaryTree, Share, ShareView,
    StatusBody, User, UserUpdate, Version,
};
