//! JSON-RPC client over TCP or Unix domain sockets.
//!
//! This module provides `RpcClient`, an async client that owns a single
//! connection and issues calls strictly one at a time: each call writes one
//! request and waits for the matching response before returning.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
#[cfg(unix)]
use tokio::net::UnixStream;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::config::Endpoint;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, RemoteError};
use crate::rpc::codec::{write_message, MessageReader};

/// Errors produced by [`RpcClient`].
#[derive(Debug, Error)]
pub enum RpcError {
    /// Failed to establish the connection.
    #[error("Connection failed: {0}")]
    ConnectionFailed(#[source] std::io::Error),

    /// Call timed out waiting for the response.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Protocol-level error (framing, envelope, id correlation).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Server answered with a non-null `error` member.
    #[error(transparent)]
    Server(#[from] RemoteError),

    /// Result could not be decoded into the expected type.
    #[error("Failed to decode result: {0}")]
    Decode(#[source] serde_json::Error),

    /// I/O error outside of message framing.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
}

/// Object-safe alias for the duplex streams the client can drive.
trait Transport: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> Transport for T {}

type BoxedTransport = Box<dyn Transport>;

/// JSON-RPC client bound to one connection.
///
/// Calls take `&mut self`, so at most one request is in flight and no
/// response multiplexing is needed. Dropping the client releases the
/// connection; [`RpcClient::close`] additionally shuts down the write side
/// so the server observes end-of-stream.
///
/// # Example
///
/// ```ignore
/// use jrpc_client::config::Endpoint;
/// use jrpc_client::rpc::RpcClient;
///
/// let endpoint: Endpoint = "127.0.0.1:1234".parse()?;
/// let mut client = RpcClient::connect(&endpoint).await?;
/// let greeting: String = client.call("sayHello", &()).await?;
/// client.close().await?;
/// ```
pub struct RpcClient {
    reader: MessageReader<ReadHalf<BoxedTransport>>,
    writer: WriteHalf<BoxedTransport>,
    /// Monotonically increasing request id counter.
    request_id: AtomicU64,
    /// Per-call timeout; `None` waits indefinitely.
    timeout: Option<Duration>,
}

impl RpcClient {
    /// Connect to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `RpcError::ConnectionFailed` if the connection is refused,
    /// the address cannot be resolved, or the socket path does not exist.
    pub async fn connect(endpoint: &Endpoint) -> Result<Self, RpcError> {
        let client = match endpoint {
            Endpoint::Tcp(addr) => {
                let stream = TcpStream::connect(addr.as_str())
                    .await
                    .map_err(RpcError::ConnectionFailed)?;
                stream.set_nodelay(true).map_err(RpcError::Io)?;
                Self::from_stream(stream)
            }
            Endpoint::Unix(path) => Self::connect_unix(path).await?,
        };
        info!("Connected to {}", endpoint);
        Ok(client)
    }

    #[cfg(unix)]
    async fn connect_unix(path: &Path) -> Result<Self, RpcError> {
        let stream = UnixStream::connect(path)
            .await
            .map_err(RpcError::ConnectionFailed)?;
        Ok(Self::from_stream(stream))
    }

    #[cfg(not(unix))]
    async fn connect_unix(path: &Path) -> Result<Self, RpcError> {
        Err(RpcError::ConnectionFailed(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            format!("Unix sockets are not supported here: {}", path.display()),
        )))
    }

    /// Wrap an already-connected stream.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let boxed: BoxedTransport = Box::new(stream);
        let (read_half, write_half) = tokio::io::split(boxed);

        Self {
            reader: MessageReader::new(read_half),
            writer: write_half,
            request_id: AtomicU64::new(1),
            timeout: None,
        }
    }

    /// Set the per-call timeout. `None` (the default) disables it.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Call `method` with a single parameter and decode the result.
    ///
    /// Pass `&()` for a null parameter.
    ///
    /// # Errors
    ///
    /// - `RpcError::Server` if the server reports an error
    /// - `RpcError::Decode` if the result does not fit `R`
    /// - `RpcError::Protocol` / `RpcError::Timeout` on transport problems
    pub async fn call<P, R>(&mut self, method: &str, params: &P) -> Result<R, RpcError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let params = serde_json::to_value(params)
            .map_err(|e| RpcError::Protocol(format!("Failed to encode params: {}", e)))?;
        let result = self.call_value(method, params).await?;
        serde_json::from_value(result).map_err(RpcError::Decode)
    }

    /// Call `method` with a raw JSON parameter and return the raw result.
    pub async fn call_value(
        &mut self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        let id = self.next_id();
        let request = JsonRpcRequest::new(method, params, id);

        let limit = self.timeout;
        let response = match limit {
            Some(limit) => timeout(limit, self.send_receive(&request))
                .await
                .map_err(|_| RpcError::Timeout(limit))??,
            None => self.send_receive(&request).await?,
        };

        self.process_response(id, response)
    }

    /// Shut down the write side and release the connection.
    pub async fn close(mut self) -> Result<(), RpcError> {
        self.writer.shutdown().await.map_err(RpcError::Io)?;
        debug!("Connection closed");
        Ok(())
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn send_receive(&mut self, request: &JsonRpcRequest) -> Result<JsonRpcResponse, RpcError> {
        debug!(method = %request.method, id = request.id, "Sending request");

        write_message(&mut self.writer, request)
            .await
            .map_err(|e| RpcError::Protocol(format!("Failed to send request: {:#}", e)))?;

        let value = self
            .reader
            .read_value()
            .await
            .map_err(|e| RpcError::Protocol(format!("Failed to read response: {:#}", e)))?;

        debug!(response = %value, "Received response");

        serde_json::from_value(value)
            .map_err(|e| RpcError::Protocol(format!("Failed to parse response: {}", e)))
    }

    fn process_response(
        &self,
        id: u64,
        response: JsonRpcResponse,
    ) -> Result<serde_json::Value, RpcError> {
        if !response.id_matches(id) {
            return Err(RpcError::Protocol(format!(
                "Response id {} does not match request id {}",
                response
                    .id
                    .as_ref()
                    .map_or_else(|| "null".to_string(), ToString::to_string),
                id
            )));
        }

        Ok(response.into_outcome()?)
    }
}
