//! Canned-response transport for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use outlook_common::{OutlookError, OutlookResult};

use crate::fetch::Transport;

/// In-memory transport serving canned responses and counting requests.
///
/// URLs without a registered response answer with HTTP 404.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    responses: HashMap<String, Result<Bytes, u16>>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.responses.insert(url.into(), Ok(body.into()));
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), Err(status));
        self
    }

    /// Total number of requests served.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// URLs in the order they were requested.
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, url: &str) -> OutlookResult<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut urls) = self.requested.lock() {
            urls.push(url.to_string());
        }

        match self.responses.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(OutlookError::Fetch {
                url: url.to_string(),
                status: Some(*status),
                message: format!("HTTP {}", status),
            }),
            None => Err(OutlookError::Fetch {
                url: url.to_string(),
                status: Some(404),
                message: "HTTP 404 Not Found".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outlook_common::ErrorKind;

    #[tokio::test]
    async fn test_unregistered_url_is_not_found() {
        let transport = MemoryTransport::new()
            .with_response("http://spc.test/a", "body")
            .with_status("http://spc.test/b", 503);

        assert_eq!(transport.get("http://spc.test/a").await.unwrap(), Bytes::from("body"));

        let err = transport.get("http://spc.test/b").await.unwrap_err();
        assert_eq!(err.fetch_status(), Some(503));

        let err = transport.get("http://spc.test/c").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert_eq!(err.fetch_status(), Some(404));

        assert_eq!(transport.calls(), 3);
        assert_eq!(
            transport.requested(),
            vec!["http://spc.test/a", "http://spc.test/b", "http://spc.test/c"]
        );
    }
}
