//! Server configuration.

/// How the server picks the version it confirms on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionPolicy {
    /// Confirm the submitted version unchanged.
    #[default]
    Accept,
    /// Confirm `max(submitted, stored + 1)`, so stored versions never repeat.
    Advance,
}

/// Configuration for the tab server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
    /// Version assignment on save.
    pub version_policy: VersionPolicy,
}

impl ServerConfig {
    /// Creates a configuration with default limits.
    pub fn new() -> Self {
        Self {
            max_body_bytes: 32 * 1024 * 1024,
            version_policy: VersionPolicy::Accept,
        }
    }

    /// Sets the maximum request body size.
    pub fn with_max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }

    /// Sets the version policy.
    pub fn with_version_policy(mut self, policy: VersionPolicy) -> Self {
        self.version_policy = policy;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = ServerConfig::new()
            .with_max_body_bytes(1024)
            .with_version_policy(VersionPolicy::Advance);

        assert_eq!(config.max_body_bytes, 1024);
        assert_eq!(config.version_policy, VersionPolicy::Advance);
        assert_eq!(ServerConfig::default().version_policy, VersionPolicy::Accept);
    }
}
