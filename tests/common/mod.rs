#![allow(dead_code)]

use async_trait::async_trait;
use m3u_curator::utils::{ProbeHttpClient, TransportError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Head,
    Get,
}

type Responder = dyn Fn(Method, &str) -> Result<u16, TransportError> + Send + Sync;

/// Scripted transport: answers from a closure and counts requests
pub struct StubClient {
    respond: Box<Responder>,
    calls: Arc<AtomicUsize>,
}

impl StubClient {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(Method, &str) -> Result<u16, TransportError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Behaviour keyed on the host name:
    /// `ok.*` 200, `timeout.*` times out, `dead.*` 404, `headless.*` rejects
    /// HEAD but serves GET, anything else refuses the connection
    pub fn by_host() -> Self {
        Self::new(|method, url| {
            let host = url::Url::parse(url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
                .unwrap_or_default();

            if host.starts_with("ok.") {
                Ok(200)
            } else if host.starts_with("timeout.") {
                Err(TransportError::Timeout)
            } else if host.starts_with("dead.") {
                Ok(404)
            } else if host.starts_with("headless.") {
                Ok(if method == Method::Head { 405 } else { 200 })
            } else {
                Err(TransportError::Connection)
            }
        })
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl ProbeHttpClient for StubClient {
    async fn head(&self, url: &str) -> Result<u16, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.respond)(Method::Head, url)
    }

    async fn get(&self, url: &str) -> Result<u16, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.respond)(Method::Get, url)
    }
}

/// Transport that fails the test if it is ever used
pub struct PanicClient;

#[async_trait]
impl ProbeHttpClient for PanicClient {
    async fn head(&self, url: &str) -> Result<u16, TransportError> {
        panic!("network layer invoked with HEAD {url}");
    }

    async fn get(&self, url: &str) -> Result<u16, TransportError> {
        panic!("network layer invoked with GET {url}");
    }
}
