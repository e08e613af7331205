//! jrpc-client library
//!
//! A small JSON-RPC client that demonstrates two calls against a server:
//!
//! - `rpc` - connection, framing and the `RpcClient` call API
//! - `protocol` - JSON-RPC request/response envelope types
//! - `models` - `Args` and `Reply` payloads
//! - `config` - command line and environment configuration
//! - `demo` - the scripted `sayHello` / `foo` run
//!
//! ```ignore
//! use jrpc_client::{config::ClientConfig, demo};
//!
//! let config = ClientConfig::default();
//! demo::run(&config, &mut std::io::stdout()).await?;
//! ```

pub mod config;
pub mod demo;
pub mod models;
pub mod protocol;
pub mod rpc;
