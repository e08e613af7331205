//! JSON value framing for JSON-RPC over byte streams.
//!
//! There is no length prefix: each message is one complete JSON value.
//! Outgoing values are terminated with a newline. Incoming values may be
//! newline-delimited, whitespace-separated or simply concatenated; bytes that
//! follow a complete value are kept for the next read.
//!
//! # Wire Format
//!
//! ```text
//! {"method":"sayHello","params":[null],"id":1}\n
//! ```

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum size of a single incoming message (16MB).
const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Read chunk size.
const CHUNK_SIZE: usize = 64 * 1024;

/// Incremental reader yielding one JSON value at a time.
///
/// Objects, arrays and strings are delimited by a single forward scan that
/// resumes where the previous read stopped, so only a complete value is ever
/// handed to serde. Bare top-level scalars have no closing delimiter and are
/// parsed speculatively instead.
pub struct MessageReader<R> {
    inner: R,
    buf: Vec<u8>,
    scan: ScanState,
}

/// Progress of the delimiter scan over `buf`.
#[derive(Debug, Default)]
struct ScanState {
    /// Bytes of `buf` already scanned.
    pos: usize,
    /// Nesting depth of objects and arrays.
    depth: usize,
    in_string: bool,
    escaped: bool,
    /// A value has started (first non-whitespace byte seen).
    started: bool,
    /// The value is a bare scalar (number or literal).
    scalar: bool,
}

impl ScanState {
    /// Advance over `buf`, returning the end offset of a complete value.
    fn advance(&mut self, buf: &[u8]) -> Option<usize> {
        while self.pos < buf.len() && !self.scalar {
            let b = buf[self.pos];
            self.pos += 1;

            if !self.started {
                match b {
                    b if b.is_ascii_whitespace() => {}
                    b'{' | b'[' => {
                        self.started = true;
                        self.depth = 1;
                    }
                    b'"' => {
                        self.started = true;
                        self.in_string = true;
                    }
                    _ => {
                        self.started = true;
                        self.scalar = true;
                    }
                }
                continue;
            }

            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if b == b'\\' {
                    self.escaped = true;
                } else if b == b'"' {
                    self.in_string = false;
                    if self.depth == 0 {
                        return Some(self.pos);
                    }
                }
                continue;
            }

            match b {
                b'{' | b'[' => self.depth += 1,
                b'}' | b']' => {
                    self.depth = self.depth.saturating_sub(1);
                    if self.depth == 0 {
                        return Some(self.pos);
                    }
                }
                b'"' => self.in_string = true,
                _ => {}
            }
        }
        None
    }
}

impl<R: AsyncRead + Unpin> MessageReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            scan: ScanState::default(),
        }
    }

    /// Read the next complete JSON value from the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The stream is closed before any value starts (`Connection closed by server`)
    /// - The stream is closed in the middle of a value
    /// - The buffered bytes are not valid JSON
    /// - A single value grows beyond MAX_MESSAGE_SIZE
    pub async fn read_value(&mut self) -> Result<Value> {
        loop {
            if let Some(value) = self.next_buffered()? {
                return Ok(value);
            }

            if self.buf.len() > MAX_MESSAGE_SIZE {
                return Err(anyhow!(
                    "Message size {} exceeds maximum {} bytes",
                    self.buf.len(),
                    MAX_MESSAGE_SIZE
                ));
            }

            let mut chunk = vec![0u8; CHUNK_SIZE];
            let n = self
                .inner
                .read(&mut chunk)
                .await
                .context("Failed to read from stream")?;

            if n == 0 {
                if self.buf.iter().all(u8::is_ascii_whitespace) {
                    return Err(anyhow!("Connection closed by server"));
                }
                return Err(anyhow!(
                    "Connection closed mid-message ({} bytes buffered)",
                    self.buf.len()
                ));
            }

            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    /// Take one value out of the buffer if a complete one is present.
    ///
    /// `Ok(None)` means more input is needed.
    fn next_buffered(&mut self) -> Result<Option<Value>> {
        if let Some(end) = self.scan.advance(&self.buf) {
            let parsed = serde_json::from_slice::<Value>(&self.buf[..end]);
            self.buf.drain(..end);
            self.scan = ScanState::default();
            return parsed
                .map(Some)
                .map_err(|e| anyhow!(e).context("Invalid JSON in response stream"));
        }

        if self.scan.scalar {
            return self.try_parse_scalar();
        }
        Ok(None)
    }

    /// Speculatively parse a bare scalar from the start of the buffer.
    fn try_parse_scalar(&mut self) -> Result<Option<Value>> {
        let mut stream = serde_json::Deserializer::from_slice(&self.buf).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                let consumed = stream.byte_offset();
                // A number running into end-of-buffer may still be growing.
                if consumed == self.buf.len() && value.is_number() {
                    return Ok(None);
                }
                self.buf.drain(..consumed);
                self.scan = ScanState::default();
                Ok(Some(value))
            }
            Some(Err(e)) if e.is_eof() => Ok(None),
            Some(Err(e)) => Err(anyhow!(e).context("Invalid JSON in response stream")),
            None => Ok(None),
        }
    }

    /// Bytes received but not yet consumed.
    #[cfg(test)]
    fn buffered(&self) -> &[u8] {
        &self.buf
    }
}

/// Serialize `message` and write it followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization, the write or the flush fails.
pub async fn write_message<W, T>(writer: &mut W, message: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize + ?Sized,
{
    let mut body = serde_json::to_vec(message).context("Failed to encode message")?;
    body.push(b'\n');

    writer
        .write_all(&body)
        .await
        .context("Failed to write message")?;

    writer.flush().await.context("Failed to flush message")?;

    Ok(())
}
