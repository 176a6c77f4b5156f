//! # Routes and Guards
//!
//! The page table of the marketplace and the access rules in front of it.

use std::fmt;

use crate::session::SessionState;

/// Application pages
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Register,
    Items,
    ItemDetail(String),
    Dashboard,
    AddItem,
    Swaps,
    SwapDetail(String),
    MyListings,
    Admin,
    NotFound,
}

/// Who may enter a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

/// Result of checking a route against the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    /// Session still initializing; show a spinner
    Loading,
    RedirectToLogin,
    /// Logged in but lacking the role; show "access denied"
    AccessDenied,
}

impl Route {
    /// Parse a path such as `/items/abc` or `/swaps/42?tab=sent`
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Landing,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["items"] => Route::Items,
            ["items", id] => Route::ItemDetail((*id).to_string()),
            ["dashboard"] => Route::Dashboard,
            ["add-item"] => Route::AddItem,
            ["swaps"] => Route::Swaps,
            ["swaps", id] => Route::SwapDetail((*id).to_string()),
            ["my-listings"] => Route::MyListings,
            ["admin"] => Route::Admin,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Items => "/items".to_string(),
            Route::ItemDetail(id) => format!("/items/{}", id),
            Route::Dashboard => "/dashboard".to_string(),
            Route::AddItem => "/add-item".to_string(),
            Route::Swaps => "/swaps".to_string(),
            Route::SwapDetail(id) => format!("/swaps/{}", id),
            Route::MyListings => "/my-listings".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Landing
            | Route::Login
            | Route::Register
            | Route::Items
            | Route::ItemDetail(_)
            | Route::NotFound => Access::Public,
            Route::Dashboard
            | Route::AddItem
            | Route::Swaps
            | Route::SwapDetail(_)
            | Route::MyListings => Access::Authenticated,
            Route::Admin => Access::Admin,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Decide whether the session may enter `route`
pub fn guard(route: &Route, session: &SessionState) -> GuardOutcome {
    let access = route.access();
    if access == Access::Public {
        return GuardOutcome::Allow;
    }
    if session.is_loading {
        return GuardOutcome::Loading;
    }
    if !session.is_authenticated {
        return GuardOutcome::RedirectToLogin;
    }
    match access {
        Access::Admin if !session.user.as_ref().is_some_and(|u| u.is_admin()) => {
            GuardOutcome::AccessDenied
        }
        _ => GuardOutcome::Allow,
    }
}
