//! Resolution error types.
//!
//! Per-server failures are "try the next server" signals and never reach the
//! caller on their own. They are collected into [`ResolveError::NotResolved`]
//! (or [`ResolveError::DeadlineExceeded`]) once the fallback chain runs dry.

use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::RecordType;
use std::{fmt, io, net::SocketAddr, sync::Arc, time::Duration};
use thiserror::Error;

/// Failure of a single DNS exchange (one query, one server).
#[derive(Debug, Error, Clone)]
pub enum ExchangeError {
    #[error("exchange with {server} timed out after {timeout:?}")]
    Timeout { server: SocketAddr, timeout: Duration },
    #[error("I/O error talking to {server}: {source}")]
    Io {
        server: SocketAddr,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("cannot encode query for {domain:?}: {reason}")]
    Encode { domain: String, reason: String },
    #[error("malformed response from {server}: {reason}")]
    Decode { server: SocketAddr, reason: String },
}

impl ExchangeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExchangeError::Timeout { .. })
    }
}

/// Why a server produced no usable answer.
#[derive(Debug, Error, Clone)]
pub enum FailureReason {
    /// Transport-level failure: nothing usable came back.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
    /// The server answered, but not with NOERROR.
    #[error("server answered {0}")]
    ResponseCode(ResponseCode),
    /// NOERROR, but no A/AAAA records in the answer section.
    #[error("no address records in answer")]
    NoAddresses,
}

/// One failed query in the fallback chain.
#[derive(Debug, Clone)]
pub struct ServerFailure {
    pub server: SocketAddr,
    pub record_type: RecordType,
    pub reason: FailureReason,
}

impl fmt::Display for ServerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.server, self.record_type, self.reason)
    }
}

#[derive(Debug, Error, Clone)]
pub enum ResolveError {
    #[error("invalid domain name {domain:?}")]
    InvalidName { domain: String },
    #[error("invalid resolver configuration: {0}")]
    InvalidConfig(&'static str),
    /// The OS resolver failed or returned nothing.
    #[error("system resolver could not resolve {domain}: {source}")]
    System {
        domain: String,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("{domain} not resolved: {}", summarize(.failures))]
    NotResolved {
        domain: String,
        failures: Vec<ServerFailure>,
    },
    #[error("deadline exceeded resolving {domain} after {} failed queries", .failures.len())]
    DeadlineExceeded {
        domain: String,
        failures: Vec<ServerFailure>,
    },
}

impl ResolveError {
    /// Every per-server failure recorded before giving up, in query order.
    pub fn failures(&self) -> &[ServerFailure] {
        match self {
            ResolveError::NotResolved { failures, .. }
            | ResolveError::DeadlineExceeded { failures, .. } => failures,
            _ => &[],
        }
    }

    /// The transport error of the last server that failed at transport level.
    ///
    /// `None` when every server answered, whether with a non-success
    /// response code or with an empty answer.
    pub fn last_exchange_error(&self) -> Option<&ExchangeError> {
        self.failures().iter().rev().find_map(|f| match &f.reason {
            FailureReason::Exchange(e) => Some(e),
            FailureReason::ResponseCode(_) | FailureReason::NoAddresses => None,
        })
    }

    pub(crate) fn system(domain: &str, source: io::Error) -> Self {
        ResolveError::System {
            domain: domain.to_string(),
            source: Arc::new(source),
        }
    }
}

fn summarize(failures: &[ServerFailure]) -> String {
    if failures.is_empty() {
        return "no servers answered".to_string();
    }
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
