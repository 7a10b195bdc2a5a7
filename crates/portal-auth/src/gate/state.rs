//! The `loading → authenticated | unauthenticated` state machine.
//!
//! A client owns one [`SessionGate`]. It starts in [`GateState::Loading`]
//! while the stored token is checked, settles into one of the two resolved
//! states, and drops back to unauthenticated on sign-out or expiry. Every
//! navigation asks [`SessionGate::decide`] first.

use tokio::sync::watch;

use crate::session::SessionRecord;

/// Where the client's session stands.
#[derive(Debug, Clone, PartialEq)]
pub enum GateState {
    /// Session not yet resolved.
    Loading,
    /// Signed in.
    Authenticated {
        /// Bearer token.
        token: String,
        /// Session details reported by the server.
        session: SessionRecord,
    },
    /// Not signed in.
    Unauthenticated,
}

/// Whether a destination requires a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Reachable without a session (sign-in).
    Public,
    /// Requires an authenticated session.
    Protected,
}

/// What the client should do when navigating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Go ahead.
    Proceed,
    /// Wait; the session is still being resolved.
    ShowSpinner,
    /// Send the user to sign in.
    RedirectToSignIn,
}

/// Observable session state machine.
#[derive(Debug)]
pub struct SessionGate {
    tx: watch::Sender<GateState>,
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGate {
    /// A gate in the loading state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(GateState::Loading);
        Self { tx }
    }

    /// Current state.
    pub fn state(&self) -> GateState {
        self.tx.borrow().clone()
    }

    /// Watch state changes.
    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.tx.subscribe()
    }

    /// Resolve the session: `Some` authenticates, `None` does not.
    pub fn resolve(&self, session: Option<(String, SessionRecord)>) {
        let next = match session {
            Some((token, session)) if !session.is_expired() => {
                GateState::Authenticated { token, session }
            }
            _ => GateState::Unauthenticated,
        };
        self.tx.send_replace(next);
    }

    /// End the session on the client.
    pub fn sign_out(&self) {
        self.tx.send_replace(GateState::Unauthenticated);
    }

    /// The bearer token, if authenticated and unexpired.
    pub fn token(&self) -> Option<String> {
        self.expire_if_due();
        match &*self.tx.borrow() {
            GateState::Authenticated { token, .. } => Some(token.clone()),
            _ => None,
        }
    }

    /// Decide what a navigation to a destination with `access` should do.
    pub fn decide(&self, access: RouteAccess) -> Navigation {
        if access == RouteAccess::Public {
            return Navigation::Proceed;
        }
        self.expire_if_due();
        match &*self.tx.borrow() {
            GateState::Loading => Navigation::ShowSpinner,
            GateState::Authenticated { .. } => Navigation::Proceed,
            GateState::Unauthenticated => Navigation::RedirectToSignIn,
        }
    }

    /// Wait until the gate leaves [`GateState::Loading`].
    pub async fn resolved(&self) -> GateState {
        let mut rx = self.tx.subscribe();
        match rx.wait_for(|s| *s != GateState::Loading).await {
            Ok(state) => state.clone(),
            Err(_) => GateState::Unauthenticated,
        }
    }

    fn expire_if_due(&self) {
        self.tx.send_if_modified(|state| match state {
            GateState::Authenticated { session, .. } if session.is_expired() => {
                *state = GateState::Unauthenticated;
                true
            }
            _ => false,
        });
    }
}
