//! Stream Probing Service
//!
//! Checks whether channel endpoints are reachable. Each endpoint goes through
//! two offline checks (known malformations, then structural parsing) before
//! any request is made. Reachable endpoints are probed with a HEAD request;
//! an error status earns exactly one GET retry, since many stream servers
//! reject HEAD outright.
//!
//! Probes run with bounded concurrency. Results arrive in completion order and
//! carry the input index of their record so callers can restore input order.

use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::ProbeConfig;
use crate::config::defaults::MAX_ERROR_DETAIL_CHARS;
use crate::models::{ChannelRecord, ProbeResult, ProbeStatus};
use crate::utils::{EndpointDefect, ProbeHttpClient, TransportError, UrlUtils, format_duration, truncate_chars};

/// Outcome of checking a single endpoint, independent of any record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointCheck {
    pub status: ProbeStatus,
    pub http_status: Option<u16>,
    pub error_detail: Option<String>,
}

impl EndpointCheck {
    fn working(code: u16) -> Self {
        Self {
            status: ProbeStatus::Working,
            http_status: Some(code),
            error_detail: None,
        }
    }

    fn rejected(code: u16) -> Self {
        Self {
            status: ProbeStatus::Failed,
            http_status: Some(code),
            error_detail: Some(format!("HTTP {}", code)),
        }
    }

    fn unreachable(error: TransportError) -> Self {
        Self {
            status: ProbeStatus::Failed,
            http_status: None,
            error_detail: Some(truncate_chars(&error.to_string(), MAX_ERROR_DETAIL_CHARS)),
        }
    }

    fn invalid(defect: EndpointDefect) -> Self {
        Self {
            status: ProbeStatus::Invalid,
            http_status: None,
            error_detail: Some(defect.detail().to_string()),
        }
    }
}

/// Service for probing channel endpoints
pub struct StreamProber<C> {
    client: C,
    concurrency: usize,
    quiet: bool,
}

impl<C: ProbeHttpClient> StreamProber<C> {
    pub fn new(client: C, config: &ProbeConfig) -> Self {
        Self {
            client,
            concurrency: config.concurrency.max(1),
            quiet: config.quiet,
        }
    }

    /// Classify one endpoint, making at most two requests
    pub async fn check_endpoint(&self, endpoint: &str) -> EndpointCheck {
        if let Err(defect) = UrlUtils::check_endpoint(endpoint) {
            debug!("Skipping request for {}: {}", endpoint, defect.detail());
            return EndpointCheck::invalid(defect);
        }

        let head_status = match self.client.head(endpoint).await {
            Ok(code) if code < 400 => return EndpointCheck::working(code),
            Ok(code) => code,
            Err(e) => return EndpointCheck::unreachable(e),
        };

        debug!("HEAD {} returned {}, retrying with GET", endpoint, head_status);
        match self.client.get(endpoint).await {
            Ok(code) if code < 400 => EndpointCheck::working(code),
            Ok(code) => EndpointCheck::rejected(code),
            Err(e) => EndpointCheck::unreachable(e),
        }
    }

    /// Probe every record, yielding exactly one result per record
    ///
    /// The returned vector is in completion order; use [`ProbeResult::index`]
    /// to map results back to `records`.
    pub async fn probe_all<'a>(&self, records: &'a [ChannelRecord]) -> Vec<ProbeResult<'a>> {
        let total = records.len();
        let started = Instant::now();
        info!(
            "Testing {} streams with {} concurrent workers",
            total, self.concurrency
        );

        let this = self;
        let mut completed = stream::iter(records.iter().enumerate())
            .map(move |(index, record)| async move {
                let check = this.check_endpoint(record.endpoint()).await;
                ProbeResult {
                    record,
                    index,
                    status: check.status,
                    http_status: check.http_status,
                    error_detail: check.error_detail,
                }
            })
            .buffer_unordered(self.concurrency);

        let mut results = Vec::with_capacity(total);
        while let Some(result) = completed.next().await {
            self.log_progress(results.len() + 1, total, &result);
            results.push(result);
        }

        info!(
            "Tested {} streams in {}",
            results.len(),
            format_duration(started.elapsed())
        );
        results
    }

    fn log_progress(&self, done: usize, total: usize, result: &ProbeResult<'_>) {
        let marker = match result.status {
            ProbeStatus::Working => "✓",
            ProbeStatus::Failed => "✗",
            ProbeStatus::Invalid => "⚠",
        };
        let detail = match (result.http_status, result.error_detail.as_deref()) {
            (_, Some(detail)) => detail.to_string(),
            (Some(code), None) => code.to_string(),
            (None, None) => String::new(),
        };

        if self.quiet {
            debug!("[{}/{}] {} {} {}", done, total, marker, result.record.name(), detail);
        } else {
            info!("[{}/{}] {} {} {}", done, total, marker, result.record.name(), detail);
        }
    }
}
