//! HTTP gateway that runs preconfigured shell commands.
//!
//! Each GET path maps to a command template. A request passes the source IP
//! whitelist and the per-path rate limit, has its `$` query parameters
//! substituted into the template, and runs the result through `bash -c`.

pub mod access_log;
pub mod auth;
pub mod config;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod logging;
pub mod rate_limit;
pub mod routes;
pub mod server;
pub mod state;
pub mod substitute;

pub use config::{Args, Config};
pub use routes::RouteTable;
pub use state::AppState;
