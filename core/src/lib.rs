//! Typed async client core for a TheHive-style case management API.
//!
//! # Overview
//! `Client` builds requests, runs them through a `Transport` under a
//! cancellable `Context`, and decodes the responses. Resource services such
//! as `CasesServiceOp` compose route templates with the client to fetch one
//! record or enumerate a whole collection page by page.
//!
//! # Design
//! - `Transport` is the only piece that performs I/O; `ReqwestTransport` is
//!   the production implementation and tests plug in scripted fakes.
//! - Every decoded value comes back with its raw `HttpResponse`, and every
//!   error that happened after the server answered carries that response.
//! - The client holds no mutable state beyond what the transport pools, so
//!   one instance can serve concurrent calls.

pub mod cases;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod routes;
pub mod transport;
pub mod types;

pub use cases::{CasesService, CasesServiceOp};
pub use client::Client;
pub use config::ClientConfig;
pub use context::{CancelHandle, Context};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
pub use types::{Case, CustomField, Entity, SendableCase, SendableTask};
