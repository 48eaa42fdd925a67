//! Out-of-band notices.
//!
//! The real system sends email for verification and password reset; the
//! mock records each notice in an in-memory outbox and logs it. The test
//! harness reads the outbox to pick up tokens for round trips.

use std::sync::{Arc, Mutex};

/// A simulated email/alert, recorded rather than delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Sent on registration of a non-first account.
    Verification { email: String, token: String },
    /// Sent when an unverified account attempts to authenticate.
    ResendVerification {
        email: String,
        token: Option<String>,
    },
    /// Sent on forgot-password for an existing account.
    PasswordReset { email: String, token: String },
}

impl Notice {
    pub fn email(&self) -> &str {
        match self {
            Notice::Verification { email, .. }
            | Notice::ResendVerification { email, .. }
            | Notice::PasswordReset { email, .. } => email,
        }
    }
}

/// Shared recorder for out-of-band notices.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    inner: Arc<Mutex<Vec<Notice>>>,
}

impl Outbox {
    pub fn new() -> Self {
        Outbox::default()
    }

    pub fn record(&self, notice: Notice) {
        tracing::info!(?notice, "out-of-band notice");
        self.inner.lock().expect("outbox lock poisoned").push(notice);
    }

    /// Snapshot of every notice recorded so far, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.inner.lock().expect("outbox lock poisoned").clone()
    }

    /// The most recent verification token emitted for an email, if any.
    pub fn verification_token_for(&self, email: &str) -> Option<String> {
        self.notices().into_iter().rev().find_map(|n| match n {
            Notice::Verification { email: e, token } if e == email => Some(token),
            _ => None,
        })
    }

    /// The most recent password-reset token emitted for an email, if any.
    pub fn reset_token_for(&self, email: &str) -> Option<String> {
        self.notices().into_iter().rev().find_map(|n| match n {
            Notice::PasswordReset { email: e, token } if e == email => Some(token),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_finds_latest_token() {
        let outbox = Outbox::new();
        outbox.record(Notice::Verification {
            email: "a@example.com".into(),
            token: "first".into(),
        });
        outbox.record(Notice::Verification {
            email: "a@example.com".into(),
            token: "second".into(),
        });
        outbox.record(Notice::PasswordReset {
            email: "a@example.com".into(),
            token: "reset".into(),
        });

        assert_eq!(outbox.notices().len(), 3);
        assert_eq!(
            outbox.verification_token_for("a@example.com").as_deref(),
            Some("second")
        );
        assert_eq!(outbox.reset_token_for("a@example.com").as_deref(), Some("reset"));
        assert_eq!(outbox.verification_token_for("b@example.com"), None);
    }
}
