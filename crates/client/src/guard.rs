use crate::{
    route::{HOME_ROUTE, LOGIN_ROUTE, Navigator},
    session::{SessionState, SessionStore},
};

/// What a guarded page should show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardView {
    /// Session check still in progress.
    Placeholder,
    /// Children are hidden; navigation to the target has been issued.
    Redirect(String),
    Render,
}

/// Gate for pages that need (or must not have) a session.
///
/// The redirect is issued once per session transition, not once per
/// evaluation.
#[derive(Clone, Debug)]
pub struct AuthGuard {
    require_auth: bool,
    fallback: String,
    redirected_at: Option<u64>,
}

impl AuthGuard {
    /// Signed-in pages; anonymous visitors go to the login route.
    pub fn authenticated() -> Self {
        Self {
            require_auth: true,
            fallback: LOGIN_ROUTE.to_string(),
            redirected_at: None,
        }
    }

    /// Pages such as login; signed-in visitors go home.
    pub fn guest_only() -> Self {
        Self {
            require_auth: false,
            fallback: LOGIN_ROUTE.to_string(),
            redirected_at: None,
        }
    }

    pub fn with_fallback(mut self, fallback: &str) -> Self {
        self.fallback = fallback.to_string();
        self
    }

    pub fn requires_auth(&self) -> bool {
        self.require_auth
    }

    pub fn evaluate<N: Navigator>(&mut self, session: &SessionStore, navigator: &mut N) -> GuardView {
        let target = match (session.state(), self.require_auth) {
            (SessionState::Loading, _) => return GuardView::Placeholder,
            (SessionState::Unauthenticated, true) => self.fallback.clone(),
            (SessionState::Authenticated(_), false) => HOME_ROUTE.to_string(),
            _ => return GuardView::Render,
        };

        if self.redirected_at != Some(session.revision()) {
            tracing::debug!(to = %target, "guard redirect");
            navigator.push(&target);
            self.redirected_at = Some(session.revision());
        }
        GuardView::Redirect(target)
    }
}
