//! Client configuration

use shared::order::Role;
use std::time::Duration;

/// Minimum gap between two customer "call staff" requests
pub const DEFAULT_CALL_STAFF_DEBOUNCE: Duration = Duration::from_secs(10);

/// Connection settings for one role view
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Gateway base URL (e.g. "http://localhost:3000")
    pub base_url: String,

    /// Tenant every request is scoped to
    pub tenant_id: String,

    /// Role sent as `x-actor-role`
    pub role: Role,

    /// Sent as `x-actor-id` when set
    pub actor_id: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Kitchen tickets older than this many minutes show as late
    pub late_threshold_minutes: i64,

    pub call_staff_debounce: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            tenant_id: tenant_id.into(),
            role: Role::Customer,
            actor_id: None,
            timeout: 30,
            late_threshold_minutes: 15,
            call_staff_debounce: DEFAULT_CALL_STAFF_DEBOUNCE,
        }
    }

    /// Set the acting role
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Set the acting user id (waiter id for waiter views)
    pub fn with_actor_id(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_late_threshold(mut self, minutes: i64) -> Self {
        self.late_threshold_minutes = minutes;
        self
    }

    /// Values under the default are raised to it
    pub fn with_call_staff_debounce(mut self, debounce: Duration) -> Self {
        self.call_staff_debounce = debounce.max(DEFAULT_CALL_STAFF_DEBOUNCE);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let config = ClientConfig::new("http://localhost:3000", "T1")
            .with_role(Role::Waiter)
            .with_actor_id("w1")
            .with_timeout(5)
            .with_late_threshold(20)
            .with_call_staff_debounce(Duration::from_secs(30));
        assert_eq!(config.role, Role::Waiter);
        assert_eq!(config.actor_id.as_deref(), Some("w1"));
        assert_eq!(config.timeout, 5);
        assert_eq!(config.late_threshold_minutes, 20);
        assert_eq!(config.call_staff_debounce, Duration::from_secs(30));
    }

    #[test]
    fn debounce_never_below_default() {
        let config =
            ClientConfig::new("http://x", "T1").with_call_staff_debounce(Duration::from_secs(1));
        assert_eq!(config.call_staff_debounce, DEFAULT_CALL_STAFF_DEBOUNCE);
    }
}
