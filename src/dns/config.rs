//! Fallback resolver configuration.

use crate::base::error::ResolveError;
use serde::{Deserialize, Serialize};
use std::{
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    time::Duration,
};

/// Public recursive resolvers queried, in order, when the OS resolver fails.
pub const DEFAULT_SERVERS: [SocketAddr; 3] = [
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(8, 8, 8, 8), 53)),
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(114, 114, 114, 114), 53)),
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(1, 1, 1, 1), 53)),
];

/// Configuration for [`FallbackResolver`](super::FallbackResolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Fallback servers, tried in order
    pub servers: Vec<SocketAddr>,
    /// Bound on the OS resolver lookup (default: 10s)
    pub system_timeout: Duration,
    /// Bound on each raw DNS exchange (default: 5s)
    pub exchange_timeout: Duration,
    /// Optional bound on the whole fallback chain
    pub deadline: Option<Duration>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            servers: DEFAULT_SERVERS.to_vec(),
            system_timeout: Duration::from_secs(10),
            exchange_timeout: Duration::from_secs(5),
            deadline: None,
        }
    }
}

impl ResolverConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback server list.
    pub fn servers(mut self, servers: impl IntoIterator<Item = SocketAddr>) -> Self {
        self.servers = servers.into_iter().collect();
        self
    }

    /// Set the OS resolver timeout.
    pub fn system_timeout(mut self, timeout: Duration) -> Self {
        self.system_timeout = timeout;
        self
    }

    /// Set the per-exchange timeout.
    pub fn exchange_timeout(mut self, timeout: Duration) -> Self {
        self.exchange_timeout = timeout;
        self
    }

    /// Bound the fallback chain as a whole.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn validate(&self) -> Result<(), ResolveError> {
        if self.servers.is_empty() {
            return Err(ResolveError::InvalidConfig("no fallback servers configured"));
        }
        if self.system_timeout.is_zero() {
            return Err(ResolveError::InvalidConfig("system_timeout must be non-zero"));
        }
        if self.exchange_timeout.is_zero() {
            return Err(ResolveError::InvalidConfig("exchange_timeout must be non-zero"));
        }
        if self.deadline.is_some_and(|d| d.is_zero()) {
            return Err(ResolveError::InvalidConfig("deadline must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.system_timeout, Duration::from_secs(10));
        assert_eq!(config.exchange_timeout, Duration::from_secs(5));
        assert!(config.deadline.is_none());

        let servers: Vec<String> = config.servers.iter().map(ToString::to_string).collect();
        assert_eq!(
            servers,
            ["8.8.8.8:53", "114.114.114.114:53", "1.1.1.1:53"]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let server: SocketAddr = "9.9.9.9:53".parse().unwrap();
        let config = ResolverConfig::new()
            .servers([server])
            .exchange_timeout(Duration::from_secs(2))
            .deadline(Duration::from_secs(8));

        assert_eq!(config.servers, vec![server]);
        assert_eq!(config.exchange_timeout, Duration::from_secs(2));
        assert_eq!(config.deadline, Some(Duration::from_secs(8)));
        assert_eq!(config.system_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_validate_rejects_empty_servers() {
        let config = ResolverConfig::new().servers(Vec::new());
        assert!(matches!(
            config.validate(),
            Err(ResolveError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeouts() {
        assert!(ResolverConfig::new()
            .exchange_timeout(Duration::ZERO)
            .validate()
            .is_err());
        assert!(ResolverConfig::new()
            .system_timeout(Duration::ZERO)
            .validate()
            .is_err());
        assert!(ResolverConfig::new()
            .deadline(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ResolverConfig =
            serde_json::from_str(r#"{"servers": ["9.9.9.9:53", "[2620:fe::fe]:53"]}"#).unwrap();

        assert_eq!(config.servers.len(), 2);
        assert!(config.servers[1].is_ipv6());
        assert_eq!(config.exchange_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ResolverConfig::new().deadline(Duration::from_millis(1500));
        let json = serde_json::to_string(&config).unwrap();
        let back: ResolverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
