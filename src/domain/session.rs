//! Admin session gate state machine.
//!
//! Every admin request starts with an unresolved gate. The gate resolves
//! exactly once, to either an authenticated identity or to the anonymous
//! state; a later `sign_out` is the only other permitted transition. While
//! the gate is pending the admin surface must take no action.

/// Resolved or unresolved authentication state for an admin request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Session status is not yet known.
    Pending,
    /// A valid session exists for the named account.
    Authenticated { username: String },
    /// No session, or the presented session is invalid or expired.
    Unauthenticated,
}

impl SessionState {
    pub fn authenticated(username: impl Into<String>) -> Self {
        Self::Authenticated {
            username: username.into(),
        }
    }
}

/// One-shot gate guarding the admin surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGate {
    state: SessionState,
}

impl SessionGate {
    pub fn new() -> Self {
        Self {
            state: SessionState::Pending,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    /// Resolve the pending gate. Resolving twice is ignored: the first
    /// outcome sticks for the lifetime of the request.
    pub fn resolve(&mut self, outcome: SessionState) -> &SessionState {
        if self.state == SessionState::Pending && outcome != SessionState::Pending {
            self.state = outcome;
        }
        &self.state
    }

    /// Explicit logout: drops an authenticated identity. Has no effect on a
    /// pending or already-anonymous gate.
    pub fn sign_out(&mut self) {
        if self.is_authenticated() {
            self.state = SessionState::Unauthenticated;
        }
    }
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}
