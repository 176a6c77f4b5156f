//! # Auth Handlers
//!
//! Session operations plus the navigation that follows them.

use shared::{LoginRequest, RegisterRequest, UserProfile};

use crate::app::routes::Route;
use crate::app::AppContext;
use crate::core::error::Result;
use crate::session::AuthService;

/// Log in, then go back to the page that asked for it or to the dashboard
pub(crate) async fn login(
    ctx: &AppContext,
    auth: &AuthService,
    request: &LoginRequest,
    return_to: Option<Route>,
) -> Result<UserProfile> {
    let user = auth.login(request).await?;
    ctx.notifier.navigate(return_to.unwrap_or(Route::Dashboard));
    Ok(user)
}

pub(crate) async fn register(
    ctx: &AppContext,
    auth: &AuthService,
    request: &RegisterRequest,
    confirm_password: &str,
) -> Result<UserProfile> {
    let user = auth.register(request, confirm_password).await?;
    ctx.notifier.navigate(Route::Dashboard);
    Ok(user)
}

/// End the session and forget every cached per-user query
pub(crate) fn logout(ctx: &AppContext, auth: &AuthService) {
    auth.logout();
    ctx.cache.clear();
}
