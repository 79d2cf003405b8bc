//! MongoDB connection manager
//!
//! Connects with bounded retries and exponential backoff, verifies the
//! connection with `ping`, and logs topology health transitions for the
//! lifetime of the client.

use crate::config::DatabaseConfig;
use mongodb::bson::doc;
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::event::EventHandler;
use mongodb::event::sdam::SdamEvent;
use mongodb::options::{ClientOptions, ReadPreference, SelectionCriteria};
use mongodb::{Client, Database};
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Jitter added to every backoff delay
pub const DEFAULT_MAX_JITTER: Duration = Duration::from_millis(2000);

#[derive(Debug, Error)]
pub enum ConnectError {
    /// The connection string could not be parsed; retrying cannot help
    #[error("Invalid MongoDB connection string: {0}")]
    InvalidUri(String),

    #[error("Failed to connect to MongoDB after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

/// Why a connection attempt failed, for log categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUri,
    Network,
    ServerSelection,
    Unknown,
}

impl FailureKind {
    pub fn classify(err: &MongoError) -> Self {
        match err.kind.as_ref() {
            ErrorKind::InvalidArgument { .. } => FailureKind::InvalidUri,
            ErrorKind::ServerSelection { .. } => FailureKind::ServerSelection,
            ErrorKind::Io(_) | ErrorKind::DnsResolve { .. } | ErrorKind::ConnectionPoolCleared { .. } => {
                FailureKind::Network
            }
            _ => FailureKind::Unknown,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FailureKind::InvalidUri => "invalid connection string",
            FailureKind::Network => "network error",
            FailureKind::ServerSelection => "no servers available (server selection timeout)",
            FailureKind::Unknown => "unknown error",
        }
    }

    fn is_fatal(self) -> bool {
        self == FailureKind::InvalidUri
    }
}

/// Bounded exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries: max_retries.max(1),
            base_delay,
            max_jitter: DEFAULT_MAX_JITTER,
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.retry_base_delay_ms),
        )
    }

    pub fn without_jitter(mut self) -> Self {
        self.max_jitter = Duration::ZERO;
        self
    }

    /// Deterministic part of the delay after failed attempt `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }

    /// Full delay: backoff plus uniform jitter in `0..max_jitter`
    pub fn delay(&self, attempt: u32) -> Duration {
        let jitter_ms = self.max_jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..jitter_ms)
        };
        self.backoff(attempt) + Duration::from_millis(jitter)
    }
}

/// Outcome of one failed attempt as reported to the retry loop
#[derive(Debug, Clone)]
pub struct AttemptError {
    pub kind: FailureKind,
    pub message: String,
}

impl From<MongoError> for AttemptError {
    fn from(err: MongoError) -> Self {
        Self {
            kind: FailureKind::classify(&err),
            message: err.to_string(),
        }
    }
}

/// Run `attempt` until it succeeds, a fatal failure occurs, or the policy is
/// exhausted. Sleeps between attempts, never after the last one.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    mut attempt: F,
) -> Result<T, ConnectError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let mut last_error = String::new();

    for n in 1..=policy.max_retries {
        match attempt(n).await {
            Ok(value) => return Ok(value),
            Err(err) if err.kind.is_fatal() => {
                tracing::error!(error = %err.message, "MongoDB connection string rejected");
                return Err(ConnectError::InvalidUri(err.message));
            }
            Err(err) => {
                tracing::warn!(
                    attempt = n,
                    max_retries = policy.max_retries,
                    error = %err.message,
                    "MongoDB connection attempt {}/{} failed: {}",
                    n,
                    policy.max_retries,
                    err.kind.describe()
                );
                last_error = err.message;

                if n < policy.max_retries {
                    let delay = policy.delay(n);
                    tracing::info!(delay_ms = delay.as_millis() as u64, "retrying MongoDB connection");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    tracing::error!(
        attempts = policy.max_retries,
        "giving up on MongoDB after {} attempts",
        policy.max_retries
    );
    Err(ConnectError::RetriesExhausted {
        attempts: policy.max_retries,
        last_error,
    })
}

/// An established, verified MongoDB connection
#[derive(Clone, Debug)]
pub struct DatabaseConnection {
    client: Client,
    database: Database,
}

impl DatabaseConnection {
    /// Connect using the configured pool settings and retry policy.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, ConnectError> {
        let policy = RetryPolicy::from_config(config);
        retry_with_backoff(&policy, |_| Self::try_connect(config)).await
    }

    async fn try_connect(config: &DatabaseConfig) -> Result<Self, AttemptError> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some("saas-admin".to_string());
        options.max_pool_size = Some(config.max_pool_size);
        options.min_pool_size = Some(config.min_pool_size);
        options.server_selection_timeout = Some(Duration::from_secs(5));
        options.heartbeat_freq = Some(Duration::from_secs(10));
        options.connect_timeout = Some(Duration::from_secs(10));
        options.retry_writes = Some(true);
        options.selection_criteria = Some(SelectionCriteria::ReadPreference(
            ReadPreference::PrimaryPreferred { options: None },
        ));
        options.sdam_event_handler = Some(topology_logger());

        let hosts = options
            .hosts
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let client = Client::with_options(options)?;
        let database = client.database(&config.name);
        database.run_command(doc! { "ping": 1 }).await?;

        tracing::info!(host = %hosts, database = %config.name, "MongoDB connected");
        Ok(Self { client, database })
    }

    pub fn database(&self) -> Database {
        self.database.clone()
    }

    /// Shut the client down, waiting for pooled connections to close.
    pub async fn close(self) {
        self.client.shutdown().await;
        tracing::info!("MongoDB connection closed");
    }
}

/// Topology listener logging disconnects, reconnects and driver errors.
///
/// A heartbeat failure marks the server as lost; the next successful
/// heartbeat is reported once as a re-established connection. A server
/// description turning to an error state is logged once per transition.
fn topology_logger() -> EventHandler<SdamEvent> {
    let disconnected = Arc::new(AtomicBool::new(false));

    EventHandler::callback(move |event: SdamEvent| match event {
        SdamEvent::ServerHeartbeatFailed(e) => {
            if !disconnected.swap(true, Ordering::SeqCst) {
                tracing::warn!(
                    host = %e.server_address,
                    error = %e.failure,
                    "MongoDB disconnected"
                );
            }
        }
        SdamEvent::ServerHeartbeatSucceeded(e) => {
            if disconnected.swap(false, Ordering::SeqCst) {
                tracing::info!(host = %e.server_address, "MongoDB connection re-established");
            }
        }
        SdamEvent::ServerDescriptionChanged(e) => {
            if let Some(err) = e.new_description.error() {
                if e.previous_description.error().is_none() {
                    tracing::warn!(host = %e.address, error = %err, "MongoDB driver error");
                }
            }
        }
        SdamEvent::ServerClosed(e) => {
            tracing::info!(host = %e.address, "MongoDB server closed");
        }
        _ => {}
    })
}
