//! Prometheus metrics for registration outcomes.
//!
//! # Example
//!
//! ```rust,no_run
//! use student_portal_runtime::metrics::MetricsServer;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut server = MetricsServer::new("0.0.0.0:9090".parse()?);
//! server.start()?;
//!
//! // Serve `server.render()` at /metrics
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::time::Duration;
use student_portal_core::RegistrationError;
use thiserror::Error;

pub use metrics::{counter, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus recorder plus the address its scrape endpoint is served on.
pub struct MetricsServer {
    addr: SocketAddr,
    handle: Option<PrometheusHandle>,
}

impl MetricsServer {
    /// Create a new metrics server for `addr`.
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self { addr, handle: None }
    }

    /// Address the scrape endpoint should bind to.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Register metric descriptions and install the Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// A recorder that is already installed (e.g., in tests) is tolerated
    /// with a warning; [`MetricsServer::render`] then returns `None`.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!(addr = %self.addr, "Metrics recorder installed");
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus text format.
    ///
    /// Returns `None` if the recorder was not installed by this server.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

fn register_metrics() {
    describe_counter!(
        "registration_attempts_total",
        "Total number of registration requests received"
    );
    describe_counter!(
        "registration_succeeded_total",
        "Total number of registrations committed"
    );
    describe_counter!(
        "registration_rejected_total",
        "Registrations refused by a business rule, by kind"
    );
    describe_counter!(
        "registration_failed_total",
        "Registrations that failed on a store error, by kind"
    );
    describe_counter!(
        "registration_retries_total",
        "Commit attempts retried after a transient store error"
    );
    describe_histogram!(
        "registration_duration_seconds",
        "End-to-end time of a registration request"
    );
}

/// Registration outcome recorder.
pub struct RegistrationMetrics;

impl RegistrationMetrics {
    /// Count an incoming request.
    pub fn record_attempt() {
        counter!("registration_attempts_total").increment(1);
    }

    /// Record how a request ended and how long it took.
    pub fn record_outcome<T>(result: &Result<T, RegistrationError>, duration: Duration) {
        match result {
            Ok(_) => counter!("registration_succeeded_total").increment(1),
            Err(err) if err.is_rejection() => {
                counter!("registration_rejected_total", "kind" => err.kind()).increment(1);
            }
            Err(err) => {
                counter!("registration_failed_total", "kind" => err.kind()).increment(1);
            }
        }
        histogram!("registration_duration_seconds").record(duration.as_secs_f64());
    }
}
