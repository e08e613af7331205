//! Scripted JSON-RPC server shared by the integration tests.
//!
//! Runs on a plain OS thread so it serves equally well for async library
//! tests and for blocking `assert_cmd` tests of the binary.
#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Value};

/// Outcome of one scripted call: `Ok(result)` or `Err(error member)`.
pub type Outcome = Result<Value, Value>;

/// Mock server answering newline-delimited JSON-RPC 1.0 requests.
pub struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockServer {
    /// Start serving `connections` sequential connections with `handler`.
    pub fn start<F>(connections: usize, handler: F) -> Self
    where
        F: Fn(&str, &Value) -> Outcome + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for _ in 0..connections {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                let mut writer = stream.try_clone().expect("clone stream");
                let reader = BufReader::new(stream);

                for line in reader.lines() {
                    let Ok(line) = line else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    let request: Value = serde_json::from_str(&line).expect("request is JSON");
                    let method = request["method"].as_str().unwrap_or_default().to_string();
                    let outcome = handler(&method, &request["params"]);
                    seen.lock().unwrap().push(request.clone());

                    let response = match outcome {
                        Ok(result) => json!({"id": request["id"], "result": result, "error": null}),
                        Err(error) => json!({"id": request["id"], "result": null, "error": error}),
                    };
                    if writeln!(writer, "{}", response).is_err() {
                        break;
                    }
                }
            }
        });

        Self { addr, requests }
    }

    /// Address string suitable for `--addr`.
    pub fn addr(&self) -> String {
        self.addr.to_string()
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

/// Handler behaving like the reference demo server.
pub fn happy_handler(method: &str, _params: &Value) -> Outcome {
    match method {
        "sayHello" => Ok(json!("hello")),
        "foo" => Ok(json!({"Args": [], "Str": "ok"})),
        other => Err(json!(format!("rpc: can't find method {}", other))),
    }
}

/// An address with nothing listening on it.
pub fn unused_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    addr.to_string()
}
