//! Server and engine configuration

use std::time::Duration;

/// NNTP server configuration
///
/// Contains all the information needed to connect to an NNTP server.
///
/// # Example
///
/// ```
/// use nntp_scanner::ServerConfig;
///
/// // Recommended: use the constructor methods
/// let config = ServerConfig::tls("news.example.com", "user", "pass");
///
/// // Or construct manually
/// let config = ServerConfig {
///     host: "news.example.com".to_string(),
///     port: 563,
///     tls: true,
///     allow_insecure_tls: false,
///     compression: true,
///     username: "user".to_string(),
///     password: "pass".to_string(),
/// };
/// ```
#[must_use]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerConfig {
    /// Server hostname (e.g., "news.example.com")
    pub host: String,

    /// Server port (typically 119 for plain, 563 for TLS)
    pub port: u16,

    /// Wrap the connection in TLS
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub tls: bool,

    /// Allow insecure TLS connections (self-signed certificates, expired certificates)
    ///
    /// **Security Warning:** Setting this to `true` disables certificate validation,
    /// making your connection vulnerable to man-in-the-middle attacks. Only use this
    /// for testing or with servers you trust on a secure network.
    ///
    /// Default: `false` (secure certificate validation enabled)
    #[cfg_attr(feature = "serde", serde(default))]
    pub allow_insecure_tls: bool,

    /// Negotiate XFEATURE COMPRESS GZIP after connecting
    ///
    /// Servers that refuse the feature are used uncompressed.
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub compression: bool,

    /// Username for authentication (empty skips AUTHINFO)
    #[cfg_attr(feature = "serde", serde(default))]
    pub username: String,

    /// Password for authentication
    #[cfg_attr(feature = "serde", serde(default))]
    pub password: String,
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

impl ServerConfig {
    /// Create a new server configuration with compression enabled
    ///
    /// # Arguments
    ///
    /// * `host` - Server hostname
    /// * `port` - Server port
    /// * `tls` - Whether to use TLS/SSL
    /// * `username` - Authentication username
    /// * `password` - Authentication password
    pub fn new(
        host: impl Into<String>,
        port: u16,
        tls: bool,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            tls,
            allow_insecure_tls: false,
            compression: true,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Create a configuration for a TLS connection on the standard secure port (563)
    pub fn tls(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(host, 563, true, username, password)
    }

    /// Create a configuration for a plain connection on the standard port (119)
    ///
    /// **Warning:** Plain connections transmit credentials in clear text.
    /// Use TLS connections whenever possible.
    pub fn plain(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(host, 119, false, username, password)
    }

    /// Create a TLS configuration that accepts self-signed certificates
    ///
    /// **Security Warning:** This configuration disables certificate validation.
    pub fn tls_insecure(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let mut config = Self::tls(host, username, password);
        config.allow_insecure_tls = true;
        config
    }

    /// Disable compression negotiation
    pub fn without_compression(mut self) -> Self {
        self.compression = false;
        self
    }

    /// Whether AUTHINFO should be sent after the greeting
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }
}

/// Tuning for the scanning engine's retry and search behaviour
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Pause before reconnecting after a transient failure inside a scan
    pub scan_retry_delay: Duration,
    /// Pause before reconnecting after a transient failure anywhere else
    pub retry_delay: Duration,
    /// Overview fetch attempts per range before the range is abandoned
    pub max_range_attempts: u32,
    /// Unavailable candidates tolerated by `day_to_post` before giving up
    ///
    /// `None` keeps probing until a dated article is found.
    pub max_probe_failures: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scan_retry_delay: Duration::from_secs(30),
            retry_delay: Duration::from_secs(5),
            max_range_attempts: 3,
            max_probe_failures: None,
        }
    }
}

impl EngineConfig {
    /// Override both reconnect delays
    pub fn with_retry_delays(mut self, scan: Duration, other: Duration) -> Self {
        self.scan_retry_delay = scan;
        self.retry_delay = other;
        self
    }

    /// Override the per-range attempt budget (at least one attempt is always made)
    pub fn with_max_range_attempts(mut self, attempts: u32) -> Self {
        self.max_range_attempts = attempts.max(1);
        self
    }

    /// Bound the number of undatable locator candidates
    pub fn with_max_probe_failures(mut self, failures: u32) -> Self {
        self.max_probe_failures = Some(failures);
        self
    }
}
