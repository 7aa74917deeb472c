//! Login gate consulted before submission.

use std::cell::Cell;

/// Externally owned authentication state.
pub trait AuthCapability {
    fn is_authenticated(&self) -> bool;

    /// Asks the host to start its login flow.
    fn request_login(&self);
}

/// Fixed-answer capability; counts login requests.
#[derive(Debug, Default)]
pub struct StaticAuth {
    authenticated: bool,
    login_requests: Cell<usize>,
}

impl StaticAuth {
    pub fn new(authenticated: bool) -> Self {
        Self {
            authenticated,
            login_requests: Cell::new(0),
        }
    }

    pub fn authenticated() -> Self {
        Self::new(true)
    }

    pub fn anonymous() -> Self {
        Self::new(false)
    }

    pub fn login_requests(&self) -> usize {
        self.login_requests.get()
    }
}

impl AuthCapability for StaticAuth {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn request_login(&self) {
        self.login_requests.set(self.login_requests.get() + 1);
    }
}
