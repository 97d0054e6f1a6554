use chrono::{DateTime, Duration, Utc};

// Upstream session tokens expire server-side after 15 minutes; treat them as
// stale a minute early.
const TOKEN_LIFETIME_MINUTES: i64 = 14;

/// Process-lifetime upstream credential. Replaced wholesale on refresh,
/// never mutated in place.
#[derive(Clone, Debug, Default)]
pub(crate) struct SessionToken {
    value: String,
    issued_at: Option<DateTime<Utc>>,
}

impl SessionToken {
    /// Wraps a freshly issued token value, starting its validity window.
    pub(crate) fn issue(value: String) -> Self {
        Self {
            value,
            issued_at: Some(Utc::now()),
        }
    }

    pub(crate) fn value(&self) -> &str {
        &self.value
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.issued_at {
            Some(issued_at) => now - issued_at <= Duration::minutes(TOKEN_LIFETIME_MINUTES),
            None => false,
        }
    }
}
