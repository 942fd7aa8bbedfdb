//! Passcode gate in front of the generator.

use crate::error::{ChitrakarError, Result};

/// Compares submitted passcodes against the configured one.
#[derive(Clone, Default)]
pub struct AuthGate {
    passcode: Option<String>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("configured", &self.passcode.is_some())
            .finish()
    }
}

impl AuthGate {
    /// Creates a gate. With no configured passcode nothing ever matches.
    pub fn new(passcode: Option<String>) -> Self {
        Self { passcode }
    }

    /// Returns true if `submitted` equals the configured passcode.
    pub fn check(&self, submitted: &str) -> bool {
        self.passcode.as_deref() == Some(submitted)
    }

    /// Returns true if a passcode has been configured at all.
    pub fn is_configured(&self) -> bool {
        self.passcode.is_some()
    }
}

/// Per-session authentication state. Once unlocked it stays unlocked.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    gate: AuthGate,
    authenticated: bool,
}

impl AuthState {
    /// Creates a locked session guarded by `gate`.
    pub fn new(gate: AuthGate) -> Self {
        Self {
            gate,
            authenticated: false,
        }
    }

    /// Attempts to unlock the session.
    ///
    /// A failed attempt leaves the session locked; attempts are unlimited.
    pub fn unlock(&mut self, submitted: &str) -> Result<()> {
        if self.authenticated {
            return Ok(());
        }
        if self.gate.check(submitted) {
            self.authenticated = true;
            tracing::debug!("session unlocked");
            Ok(())
        } else {
            tracing::warn!(
                passcode_configured = self.gate.is_configured(),
                "rejected passcode attempt"
            );
            Err(ChitrakarError::Auth("incorrect passcode".into()))
        }
    }

    /// Whether the session has been unlocked.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}
