//! Login, restore and logout over the fake backend

mod common;

use std::sync::Arc;

use shared::{ItemFilters, LoginRequest, RegisterRequest};
use tempfile::TempDir;

use client::app::{App, AppEvent, GuardOutcome, Route, ToastLevel};
use client::core::error::{ApiError, AppError};
use client::session::{FileSessionStorage, SessionPersistence};

use common::{admin, app_as, user, FakeApi};

fn login_request() -> LoginRequest {
    LoginRequest {
        email: "alice@example.com".to_string(),
        password: "secret123".to_string(),
    }
}

#[tokio::test]
async fn test_login_persists_session_and_returns_to_page() {
    // Arrange
    let dir = TempDir::new().expect("tempdir should be created in test");
    let path = dir.path().join("session.json");
    let api = FakeApi::new();
    api.set_user(user("alice", 75));
    let app = App::with_api(api.clone(), Arc::new(FileSessionStorage::new(path.clone())));

    // Act
    let logged_in = app
        .login(&login_request(), Some(Route::Swaps))
        .await
        .expect("login should succeed in test");

    // Assert
    assert_eq!(logged_in.id, "alice");
    assert!(app.session().is_authenticated());
    assert!(!app.session().is_loading());
    assert_eq!(
        app.drain_events(),
        vec![
            AppEvent::toast(ToastLevel::Success, "Login successful!"),
            AppEvent::Navigate(Route::Swaps),
        ]
    );

    let stored = FileSessionStorage::new(path.clone())
        .load()
        .expect("session file should be readable")
        .expect("session should be stored");
    assert!(stored.is_authenticated);
    assert_eq!(stored.token.as_deref(), Some("token-alice@example.com"));
    assert_eq!(stored.user.map(|u| u.points), Some(75));

    // A fresh process picks the session back up
    let restarted = App::with_api(api.clone(), Arc::new(FileSessionStorage::new(path)));
    assert!(restarted.session().is_authenticated());
    assert_eq!(restarted.guard(&Route::Dashboard), GuardOutcome::Allow);
}

#[tokio::test]
async fn test_login_without_return_page_goes_to_dashboard() {
    let api = FakeApi::new();
    api.set_user(user("alice", 0));
    let app = app_as(&api, None);

    app.login(&login_request(), None)
        .await
        .expect("login should succeed in test");

    let events = app.drain_events();
    assert_eq!(events.last(), Some(&AppEvent::Navigate(Route::Dashboard)));
}

#[tokio::test]
async fn test_invalid_login_form_makes_no_call() {
    let api = FakeApi::new();
    let app = app_as(&api, None);
    let request = LoginRequest {
        email: "not-an-email".to_string(),
        password: "secret123".to_string(),
    };

    let result = app.login(&request, None).await;

    assert!(matches!(
        result,
        Err(AppError::Validation { ref field, .. }) if field == "email"
    ));
    assert!(api.calls().is_empty());
    assert!(app.drain_events().is_empty());
    assert!(!app.session().is_loading());
}

#[tokio::test]
async fn test_failed_login_clears_loading_flag() {
    let api = FakeApi::new();
    api.fail(
        "login",
        ApiError::Server {
            status: 400,
            message: Some("Invalid credentials".to_string()),
        },
    );
    let app = app_as(&api, None);

    let result = app.login(&login_request(), None).await;

    assert!(matches!(result, Err(AppError::Api(ApiError::Server { .. }))));
    assert!(!app.session().is_loading());
    assert!(!app.session().is_authenticated());
}

#[tokio::test]
async fn test_register_checks_password_confirmation_first() {
    let api = FakeApi::new();
    let app = app_as(&api, None);
    let request = RegisterRequest {
        first_name: "Alice".to_string(),
        last_name: "Liddell".to_string(),
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        password: "secret123".to_string(),
    };

    let result = app.register(&request, "secret124").await;

    assert!(matches!(
        result,
        Err(AppError::Validation { ref field, .. }) if field == "confirmPassword"
    ));
    assert_eq!(api.call_count("register"), 0);
}

#[tokio::test]
async fn test_register_logs_in_and_opens_dashboard() {
    let api = FakeApi::new();
    api.set_user(user("alice", 100));
    let app = app_as(&api, None);
    let request = RegisterRequest {
        first_name: "Alice".to_string(),
        last_name: "Liddell".to_string(),
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        password: "secret123".to_string(),
    };

    app.register(&request, "secret123")
        .await
        .expect("registration should succeed in test");

    assert!(app.session().is_authenticated());
    assert_eq!(
        app.drain_events(),
        vec![
            AppEvent::toast(ToastLevel::Success, "Registration successful!"),
            AppEvent::Navigate(Route::Dashboard),
        ]
    );
}

#[tokio::test]
async fn test_restored_session_dropped_when_profile_refresh_fails() {
    // Arrange
    let api = FakeApi::new();
    api.fail("current_user", ApiError::Network("connection refused".to_string()));
    let app = app_as(&api, Some(user("alice", 10)));
    assert!(app.session().is_authenticated());

    // Act
    let authenticated = app.initialize().await;

    // Assert
    assert!(!authenticated);
    assert!(!app.session().is_authenticated());
    assert!(!app.session().is_loading());
    assert_eq!(app.session().token(), None);
    assert_eq!(api.call_count("current_user"), 1);
    assert_eq!(app.guard(&Route::Swaps), GuardOutcome::RedirectToLogin);
}

#[tokio::test]
async fn test_initialize_without_token_skips_network() {
    let api = FakeApi::new();
    let app = app_as(&api, None);

    assert!(!app.initialize().await);

    assert!(api.calls().is_empty());
    assert!(!app.session().is_loading());
    assert_eq!(app.guard(&Route::Items), GuardOutcome::Allow);
}

#[tokio::test]
async fn test_logout_clears_session_and_cache() {
    let api = FakeApi::new();
    let app = app_as(&api, Some(user("alice", 10)));
    app.items(ItemFilters::default())
        .await
        .expect("listing should succeed in test");
    assert!(!app.cache().is_empty());

    app.logout();

    assert!(app.cache().is_empty());
    assert!(!app.session().is_authenticated());
    assert_eq!(
        app.drain_events(),
        vec![AppEvent::toast(ToastLevel::Success, "Logged out successfully")]
    );
    assert_eq!(app.guard(&Route::Dashboard), GuardOutcome::RedirectToLogin);
}

#[tokio::test]
async fn test_admin_page_denied_to_regular_user() {
    let api = FakeApi::new();

    let regular = app_as(&api, Some(user("alice", 10)));
    assert_eq!(regular.guard(&Route::Admin), GuardOutcome::AccessDenied);

    let moderator = app_as(&api, Some(admin("root")));
    assert_eq!(moderator.guard(&Route::Admin), GuardOutcome::Allow);
}
