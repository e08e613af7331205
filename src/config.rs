//! Command line and environment configuration.
//!
//! Every setting can be given as a flag or through the environment; flags
//! win. Without either, the client targets `127.0.0.1:1234`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;

/// Address used when neither `--addr` nor `JRPC_ADDR` is set.
pub const DEFAULT_ADDR: &str = "127.0.0.1:1234";

/// Prefix selecting a Unix domain socket address.
const UNIX_PREFIX: &str = "unix:";

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `host:port`, resolved at connect time.
    Tcp(String),
    /// `unix:<path>`
    Unix(PathBuf),
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(path) = s.strip_prefix(UNIX_PREFIX) {
            if path.is_empty() {
                return Err("unix: address requires a socket path".to_string());
            }
            return Ok(Endpoint::Unix(PathBuf::from(path)));
        }

        match s.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() => {
                port.parse::<u16>()
                    .map_err(|_| format!("invalid port in address '{}'", s))?;
                Ok(Endpoint::Tcp(s.to_string()))
            }
            _ => Err(format!("expected host:port or unix:<path>, got '{}'", s)),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Tcp(addr) => f.write_str(addr),
            Endpoint::Unix(path) => write!(f, "{}{}", UNIX_PREFIX, path.display()),
        }
    }
}

/// Runtime configuration for the demo client.
#[derive(Debug, Clone, Parser)]
#[command(name = "jrpc-client")]
#[command(about = "Call sayHello and foo on a JSON-RPC server and print the replies")]
#[command(version)]
pub struct ClientConfig {
    /// Server address: host:port or unix:<path>
    #[arg(short, long, env = "JRPC_ADDR", default_value = DEFAULT_ADDR)]
    pub addr: Endpoint,

    /// Per-call timeout in seconds (unset = wait indefinitely)
    #[arg(short, long, env = "JRPC_TIMEOUT")]
    pub timeout: Option<u64>,
}

impl ClientConfig {
    /// Configuration targeting `addr` with no timeout.
    pub fn new(addr: Endpoint) -> Self {
        Self { addr, timeout: None }
    }

    /// The per-call timeout, if any.
    pub fn call_timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Endpoint::Tcp(DEFAULT_ADDR.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_tcp_endpoint() {
        let endpoint: Endpoint = "127.0.0.1:1234".parse().unwrap();
        assert_eq!(endpoint, Endpoint::Tcp("127.0.0.1:1234".to_string()));
        assert_eq!(endpoint.to_string(), "127.0.0.1:1234");

        let named: Endpoint = "localhost:80".parse().unwrap();
        assert!(matches!(named, Endpoint::Tcp(_)));
    }

    #[test]
    fn test_parse_unix_endpoint() {
        let endpoint: Endpoint = "unix:/tmp/test.sock".parse().unwrap();
        assert_eq!(endpoint, Endpoint::Unix(PathBuf::from("/tmp/test.sock")));
        assert_eq!(endpoint.to_string(), "unix:/tmp/test.sock");
    }

    #[test]
    fn test_parse_rejects_bad_addresses() {
        assert!("127.0.0.1".parse::<Endpoint>().is_err());
        assert!("127.0.0.1:http".parse::<Endpoint>().is_err());
        assert!(":1234".parse::<Endpoint>().is_err());
        assert!("unix:".parse::<Endpoint>().is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(config.call_timeout(), None);
    }

    #[test]
    fn test_cli_flags() {
        let config =
            ClientConfig::try_parse_from(["jrpc-client", "--addr", "10.0.0.1:9000", "-t", "5"])
                .unwrap();
        assert_eq!(config.addr, Endpoint::Tcp("10.0.0.1:9000".to_string()));
        assert_eq!(config.call_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_cli_rejects_invalid_addr() {
        let result = ClientConfig::try_parse_from(["jrpc-client", "--addr", "nonsense"]);
        assert!(result.is_err());
    }
}
