//! # SchoolDigger MCP
//!
//! Exposes the SchoolDigger school and district REST API (v2.3) as typed MCP
//! tools, so an LLM client can search schools and districts without knowing
//! SchoolDigger's HTTP shape, credential scheme or pagination.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          MCP client (stdio or Streamable HTTP)          │
//! ├─────────────────────────────────────────────────────────┤
//! │          mcp::SchoolDiggerServer (rmcp tools)           │
//! ├─────────────────────────────────────────────────────────┤
//! │  ┌────────────┐  ┌──────────────┐  ┌───────────────┐    │
//! │  │ operations │──│    client    │──│   normalize   │    │
//! │  │ (validate) │  │ (GET, retry) │  │ (JSON→models) │    │
//! │  └────────────┘  └──────────────┘  └───────────────┘    │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod error;
pub mod mcp;
pub mod models;
pub mod normalize;
pub mod operations;

pub use client::{ClientConfig, Credentials, RetryConfig, SchoolDiggerClient};
pub use error::{ErrorKind, Result, SchoolDiggerError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
