//! Route guards deciding whether a page renders or redirects.
//!
//! Guards compose as session check first, role check second: a missing
//! token always sends the user to `/login`, even if a role is still stored.

use super::role::{home_route_for, normalize_role};
use super::{Role, StoredSession};

/// Route of the login page.
pub const LOGIN_ROUTE: &str = "/login";
/// Route of the public landing page; unknown paths redirect here.
pub const LANDING_ROUTE: &str = "/";

/// What a guarded route should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    /// Show the requested page.
    Render,
    /// Send the user to [`LOGIN_ROUTE`].
    RedirectToLogin,
    /// Send the user elsewhere.
    Redirect(&'static str),
}

impl AccessOutcome {
    /// Redirect target, or `None` when the page renders.
    pub const fn target(self) -> Option<&'static str> {
        match self {
            Self::Render => None,
            Self::RedirectToLogin => Some(LOGIN_ROUTE),
            Self::Redirect(path) => Some(path),
        }
    }
}

/// Role guard over a stored role string.
///
/// A user whose role is not allowed is sent to their own dashboard, unless
/// they are already on it.
///
/// # Examples
/// ```
/// use loanflow_client::domain::{authorize, AccessOutcome, Role};
///
/// let outcome = authorize(Some("ROLE_ADMIN"), &[Role::Analyst], "/somewhere");
/// assert_eq!(outcome, AccessOutcome::Redirect("/admin"));
/// assert_eq!(authorize(None, &[Role::Admin], "/admin"), AccessOutcome::RedirectToLogin);
/// ```
pub fn authorize(stored_role: Option<&str>, allowed: &[Role], current_path: &str) -> AccessOutcome {
    let role = stored_role.map(normalize_role).unwrap_or_default();
    if role.is_empty() {
        return AccessOutcome::RedirectToLogin;
    }
    if allowed.iter().any(|candidate| candidate.as_str() == role) {
        return AccessOutcome::Render;
    }
    let home = home_route_for(&role);
    if current_path == home {
        AccessOutcome::Render
    } else {
        AccessOutcome::Redirect(home)
    }
}

/// Session guard: render only when a non-blank token is present.
pub fn require_session(token: Option<&str>) -> AccessOutcome {
    match token {
        Some(token) if !token.trim().is_empty() => AccessOutcome::Render,
        _ => AccessOutcome::RedirectToLogin,
    }
}

/// Session guard wrapping the role guard.
pub fn guard(session: &StoredSession, allowed: &[Role], current_path: &str) -> AccessOutcome {
    match require_session(session.token()) {
        AccessOutcome::Render => authorize(session.role(), allowed, current_path),
        denied => denied,
    }
}

/// Dashboard for the stored role: `/admin`, `/analyst`, or `/customer` for
/// anything else, including no role at all.
pub fn dashboard_redirect(stored_role: Option<&str>) -> &'static str {
    home_route_for(&stored_role.map(normalize_role).unwrap_or_default())
}

/// How a declared route is protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGuard {
    /// Open to everyone.
    Public,
    /// Requires a session.
    Session,
    /// Requires a session and one of the roles.
    Roles(&'static [Role]),
    /// Requires a session, then redirects to the role's dashboard.
    RoleHome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Route {
    path: &'static str,
    guard: RouteGuard,
}

/// The application's routes and their guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

const CUSTOMER_ONLY: &[Role] = &[Role::Customer];
const ANALYST_ONLY: &[Role] = &[Role::Analyst];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

impl RouteTable {
    /// An empty table; every path redirects to [`LANDING_ROUTE`].
    pub fn empty() -> Self {
        Self { routes: Vec::new() }
    }

    /// Declare `path` with `guard`. A later declaration of the same path
    /// replaces the earlier one.
    #[must_use]
    pub fn with(mut self, path: &'static str, guard: RouteGuard) -> Self {
        self.routes.retain(|route| route.path != path);
        self.routes.push(Route { path, guard });
        self
    }

    /// The LoanFlow route table.
    pub fn standard() -> Self {
        Self::empty()
            .with(LANDING_ROUTE, RouteGuard::Public)
            .with(LOGIN_ROUTE, RouteGuard::Public)
            .with("/signup", RouteGuard::Public)
            .with("/dashboard", RouteGuard::RoleHome)
            .with("/loan-application", RouteGuard::Session)
            .with("/application-status", RouteGuard::Session)
            .with(Role::Customer.home_route(), RouteGuard::Roles(CUSTOMER_ONLY))
            .with(Role::Analyst.home_route(), RouteGuard::Roles(ANALYST_ONLY))
            .with(Role::Admin.home_route(), RouteGuard::Roles(ADMIN_ONLY))
            .with("/admin/users", RouteGuard::Roles(ADMIN_ONLY))
            .with("/admin/loans", RouteGuard::Roles(ADMIN_ONLY))
    }

    /// Guard declared for `path`, matched exactly.
    pub fn guard_for(&self, path: &str) -> Option<RouteGuard> {
        self.routes
            .iter()
            .find(|route| route.path == path)
            .map(|route| route.guard)
    }

    /// Declared paths in declaration order.
    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routes.iter().map(|route| route.path)
    }

    /// Decide what visiting `path` with `session` does.
    pub fn resolve(&self, path: &str, session: &StoredSession) -> AccessOutcome {
        let Some(route_guard) = self.guard_for(path) else {
            return AccessOutcome::Redirect(LANDING_ROUTE);
        };
        match route_guard {
            RouteGuard::Public => AccessOutcome::Render,
            RouteGuard::Session => require_session(session.token()),
            RouteGuard::Roles(allowed) => guard(session, allowed, path),
            RouteGuard::RoleHome => match require_session(session.token()) {
                AccessOutcome::Render => {
                    AccessOutcome::Redirect(dashboard_redirect(session.role()))
                }
                denied => denied,
            },
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}
