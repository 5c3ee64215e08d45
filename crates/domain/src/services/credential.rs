//! Single-slot cache for the USPS bearer token.
//!
//! The slot is owned by the gateway instance rather than living in process
//! globals, so tests can isolate caches and a multi-tenant deployment could
//! hold one per credential set. Two callers that both observe a stale entry
//! may both perform an exchange; the later write wins and both tokens are
//! valid, so the duplicate cost is accepted without a single-flight guard.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

/// Seconds subtracted from the provider-declared lifetime so a token is
/// refreshed before the upstream actually rejects it.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 300;

/// An access token paired with the instant it stops being trusted locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedCredential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedCredential {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Cloneable handle to the shared credential slot.
#[derive(Debug, Clone, Default)]
pub struct CredentialCache {
    slot: Arc<Mutex<Option<CachedCredential>>>,
}

impl CredentialCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token while it is still inside the safety margin.
    pub fn bearer(&self, now: DateTime<Utc>) -> Option<String> {
        let guard = self.slot.lock().expect("mutex poisoned");
        guard
            .as_ref()
            .filter(|credential| credential.is_fresh(now))
            .map(|credential| credential.token.clone())
    }

    /// Stores a freshly exchanged grant, applying the expiry margin. A
    /// lifetime at or below the margin yields an immediately stale entry,
    /// which simply forces the next caller to exchange again.
    pub fn store_grant(&self, token: impl Into<String>, expires_in_secs: i64, now: DateTime<Utc>) {
        let usable = expires_in_secs.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS).max(0);
        let credential = CachedCredential {
            token: token.into(),
            expires_at: now + Duration::seconds(usable),
        };
        let mut guard = self.slot.lock().expect("mutex poisoned");
        *guard = Some(credential);
    }

    /// Drops the slot contents; only tests and explicit operator actions
    /// need this, normal operation overwrites on refresh.
    pub fn clear(&self) {
        let mut guard = self.slot.lock().expect("mutex poisoned");
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_yields_no_bearer() {
        let cache = CredentialCache::new();
        assert_eq!(cache.bearer(Utc::now()), None);
    }

    #[test]
    fn fresh_grant_is_reused_within_margin() {
        let cache = CredentialCache::new();
        let now = Utc::now();
        cache.store_grant("tok-1", 3600, now);

        assert_eq!(cache.bearer(now), Some("tok-1".to_string()));
        // Still fresh just before the margin-adjusted expiry.
        let almost = now + Duration::seconds(3600 - TOKEN_EXPIRY_MARGIN_SECS - 1);
        assert_eq!(cache.bearer(almost), Some("tok-1".to_string()));
    }

    #[test]
    fn grant_expires_at_lifetime_minus_margin() {
        let cache = CredentialCache::new();
        let now = Utc::now();
        cache.store_grant("tok-1", 3600, now);

        let at_expiry = now + Duration::seconds(3600 - TOKEN_EXPIRY_MARGIN_SECS);
        assert_eq!(cache.bearer(at_expiry), None);
    }

    #[test]
    fn tiny_lifetime_is_immediately_stale() {
        let cache = CredentialCache::new();
        let now = Utc::now();
        cache.store_grant("tok-1", TOKEN_EXPIRY_MARGIN_SECS - 10, now);
        assert_eq!(cache.bearer(now), None);
    }

    #[test]
    fn store_overwrites_previous_grant() {
        let cache = CredentialCache::new();
        let now = Utc::now();
        cache.store_grant("tok-1", 3600, now);
        cache.store_grant("tok-2", 3600, now);
        assert_eq!(cache.bearer(now), Some("tok-2".to_string()));
    }

    #[test]
    fn clones_share_the_slot() {
        let cache = CredentialCache::new();
        let other = cache.clone();
        let now = Utc::now();
        cache.store_grant("tok-1", 3600, now);
        assert_eq!(other.bearer(now), Some("tok-1".to_string()));
        other.clear();
        assert_eq!(cache.bearer(now), None);
    }
}
