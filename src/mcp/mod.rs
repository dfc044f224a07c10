//! MCP (Model Context Protocol) surface.
//!
//! [`SchoolDiggerServer`] registers the SchoolDigger tools and resources with
//! the rmcp SDK; [`listener`] serves it over Streamable HTTP.

pub mod listener;
pub mod sdk_server;

pub use listener::{start_listener, ListenerHandle, MCP_PATH};
pub use sdk_server::{SchoolDiggerServer, SCHOOL_LEVELS_URI};
