//! Runtime plumbing: server configuration, the hyper conversion pipeline and
//! the TCP server.

mod config;
pub mod pipeline;
mod server;

pub use config::{ServerConfig, HOST_VAR, PORT_VAR};
pub use server::AppServer;
