//! TinkerDB gRPC layer: protocol types, services, server loop and client.

pub mod client;
pub mod error;
pub mod proto;
pub mod server;
pub mod services;

pub use client::{ClientConfig, ClientError, ClientResult, KvClient, TenantStats};
pub use error::{ApiError, ApiResult};
pub use server::{serve, serve_with_listener};
