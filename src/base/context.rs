//! Ergonomic error context helpers.
//!
//! Extension traits that turn bare IO failures and elapsed timers into
//! [`ExchangeError`]s naming the server involved.

use crate::base::error::ExchangeError;
use std::{io, net::SocketAddr, sync::Arc, time::Duration};
use tokio::time::error::Elapsed;

/// Extension trait for adding server context to IO Results.
pub trait IoResultExt<T> {
    /// Attach the DNS server address to an IO error.
    ///
    /// # Example
    /// ```ignore
    /// use fallback_resolver::base::context::IoResultExt;
    ///
    /// socket.send_to(&bytes, server).await.exchange_context(server)?;
    /// // Error: "I/O error talking to 8.8.8.8:53: network unreachable"
    /// ```
    fn exchange_context(self, server: SocketAddr) -> Result<T, ExchangeError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn exchange_context(self, server: SocketAddr) -> Result<T, ExchangeError> {
        self.map_err(|e| ExchangeError::Io {
            server,
            source: Arc::new(e),
        })
    }
}

/// Extension trait for `tokio::time::timeout` results.
pub trait TimeoutResultExt<T> {
    /// Convert an elapsed timer into [`ExchangeError::Timeout`].
    fn timeout_context(self, server: SocketAddr, timeout: Duration) -> Result<T, ExchangeError>;
}

impl<T> TimeoutResultExt<T> for Result<T, Elapsed> {
    fn timeout_context(self, server: SocketAddr, timeout: Duration) -> Result<T, ExchangeError> {
        self.map_err(|_| ExchangeError::Timeout { server, timeout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_exchange_context() {
        let server: SocketAddr = "1.1.1.1:53".parse().unwrap();
        let result: Result<(), io::Error> =
            Err(Error::new(ErrorKind::ConnectionRefused, "refused"));
        let err = result.exchange_context(server).unwrap_err();

        match err {
            ExchangeError::Io { server: s, source } => {
                assert_eq!(s, server);
                assert_eq!(source.kind(), ErrorKind::ConnectionRefused);
            }
            _ => panic!("Expected Io"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_context() {
        let server: SocketAddr = "8.8.8.8:53".parse().unwrap();
        let timeout = Duration::from_millis(10);
        let result = tokio::time::timeout(timeout, std::future::pending::<()>()).await;
        let err = result.timeout_context(server, timeout).unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(
            err.to_string(),
            "exchange with 8.8.8.8:53 timed out after 10ms"
        );
    }
}
