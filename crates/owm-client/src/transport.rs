// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Blocking HTTP transport seam.
//!
//! The client only ever needs "body text or a typed failure" from the
//! network, so that is the whole trait surface. Production code uses the
//! reqwest-backed [`HttpTransport`]; tests substitute a stub that counts
//! calls and serves canned bodies.

use std::time::Duration;

use thiserror::Error;

/// Default per-request timeout for provider calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur below the JSON layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-success status code.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Connection, DNS, TLS, or timeout failure.
    #[error("network error: {0}")]
    Network(String),
}

/// Blocking HTTP GET.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<String, TransportError>;
}

/// reqwest-backed transport with a bounded per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            timeout,
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String, TransportError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .text()
            .map_err(|e| TransportError::Network(e.to_string()))
    }
}
