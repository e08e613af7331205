//! JSON-RPC transport for the demo client.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐        TCP / Unix socket        ┌─────────────────────┐
//! │   jrpc-client   │  ◄─────────────────────────────►│   JSON-RPC server   │
//! │   (RpcClient)   │   JSON-RPC 1.0, JSON per line   │   (out of scope)    │
//! └─────────────────┘                                 └─────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use jrpc_client::rpc::RpcClient;
//!
//! let mut client = RpcClient::connect(&"127.0.0.1:1234".parse()?).await?;
//! let greeting: String = client.call("sayHello", &()).await?;
//! ```

mod client;
mod codec;

pub use client::{RpcClient, RpcError};
pub use codec::{write_message, MessageReader};
