//! Navigation surface and the protected/public route guard.

use crate::session::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Vehicles,
    Rentals,
    PersonalTransactions,
    Debts,
    Goals,
    Settings,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/",
            Self::Vehicles => "/vehicles",
            Self::Rentals => "/rental-transactions",
            Self::PersonalTransactions => "/personal-transactions",
            Self::Debts => "/debts",
            Self::Goals => "/goals",
            Self::Settings => "/settings",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Dashboard => "Dashboard",
            Self::Vehicles => "Vehicles",
            Self::Rentals => "Rentals",
            Self::PersonalTransactions => "Personal",
            Self::Debts => "Debts",
            Self::Goals => "Goals",
            Self::Settings => "Settings",
        }
    }

    /// Sidebar order. Login is not a navigation item.
    pub fn nav() -> &'static [Route] {
        &[
            Self::Dashboard,
            Self::Vehicles,
            Self::Rentals,
            Self::PersonalTransactions,
            Self::Debts,
            Self::Goals,
            Self::Settings,
        ]
    }

    /// Resolve a path; anything unknown lands on the dashboard.
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        std::iter::once(Self::Login)
            .chain(Self::nav().iter().copied())
            .find(|r| r.path() == normalized)
            .unwrap_or(Self::Dashboard)
    }

    pub fn is_protected(&self) -> bool {
        *self != Self::Login
    }

    /// Sidebar highlighting: `/` only on an exact match, everything else by
    /// prefix so nested paths keep their parent lit.
    pub fn is_active(&self, current_path: &str) -> bool {
        if *self == Self::Dashboard {
            current_path == "/"
        } else {
            current_path.starts_with(self.path())
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Loading,
    Render,
    Redirect(Route),
}

pub fn guard(route: Route, auth: &AuthState) -> Guard {
    match (auth, route.is_protected()) {
        (AuthState::Loading, _) => Guard::Loading,
        (AuthState::Authenticated(_), true) => Guard::Render,
        (AuthState::Authenticated(_), false) => Guard::Redirect(Route::Dashboard),
        (AuthState::Unauthenticated, true) => Guard::Redirect(Route::Login),
        (AuthState::Unauthenticated, false) => Guard::Render,
    }
}

/// Follow redirects to the route that will actually render. While loading
/// the requested route is kept so it can be re-checked once auth settles.
pub fn resolve(route: Route, auth: &AuthState) -> Route {
    match guard(route, auth) {
        Guard::Redirect(target) => target,
        Guard::Loading | Guard::Render => route,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::User;

    fn authed() -> AuthState {
        AuthState::Authenticated(User {
            id: "1".into(),
            name: "Administrador".into(),
            email: "admin@liberdadepro.com".into(),
            role: "admin".into(),
        })
    }

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/"), Route::Dashboard);
        assert_eq!(Route::parse("/vehicles"), Route::Vehicles);
        assert_eq!(Route::parse("/rental-transactions"), Route::Rentals);
        assert_eq!(
            Route::parse("/personal-transactions"),
            Route::PersonalTransactions
        );
        assert_eq!(Route::parse("/debts"), Route::Debts);
        assert_eq!(Route::parse("/goals/"), Route::Goals);
        assert_eq!(Route::parse("/settings"), Route::Settings);
    }

    #[test]
    fn test_parse_wildcard_goes_home() {
        assert_eq!(Route::parse("/nope"), Route::Dashboard);
        assert_eq!(Route::parse(""), Route::Dashboard);
        assert_eq!(Route::parse("vehicles"), Route::Dashboard);
    }

    #[test]
    fn test_path_roundtrip() {
        for route in Route::nav() {
            assert_eq!(Route::parse(route.path()), *route);
        }
    }

    #[test]
    fn test_unauthenticated_protected_redirects_to_login() {
        assert_eq!(
            guard(Route::Vehicles, &AuthState::Unauthenticated),
            Guard::Redirect(Route::Login)
        );
        assert_eq!(
            resolve(Route::Vehicles, &AuthState::Unauthenticated),
            Route::Login
        );
    }

    #[test]
    fn test_authenticated_login_redirects_home() {
        assert_eq!(
            guard(Route::Login, &authed()),
            Guard::Redirect(Route::Dashboard)
        );
        assert_eq!(resolve(Route::Login, &authed()), Route::Dashboard);
    }

    #[test]
    fn test_render_cases() {
        assert_eq!(guard(Route::Goals, &authed()), Guard::Render);
        assert_eq!(
            guard(Route::Login, &AuthState::Unauthenticated),
            Guard::Render
        );
    }

    #[test]
    fn test_loading_holds_every_route() {
        for route in [Route::Login, Route::Dashboard, Route::Debts] {
            assert_eq!(guard(route, &AuthState::Loading), Guard::Loading);
            assert_eq!(resolve(route, &AuthState::Loading), route);
        }
    }

    #[test]
    fn test_active_highlighting() {
        assert!(Route::Dashboard.is_active("/"));
        assert!(!Route::Dashboard.is_active("/vehicles"));
        assert!(Route::Vehicles.is_active("/vehicles"));
        assert!(Route::Vehicles.is_active("/vehicles/3"));
        assert!(!Route::Debts.is_active("/vehicles"));
    }
}
