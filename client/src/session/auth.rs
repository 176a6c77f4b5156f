//! # Authentication Service
//!
//! The only writer of [`SessionStore`] besides the gateway's forced logout.
//!
//! Every operation validates locally first, flips the session's loading flag for
//! the duration of the request, and returns the failure to the caller so a form
//! can show it inline. Network failures have already been toasted by the gateway.

use std::future::Future;
use std::sync::Arc;

use shared::{
    ChangePasswordRequest, ImageUpload, LoginRequest, RegisterRequest, UpdateProfileRequest,
    UserProfile,
};

use super::store::SessionStore;
use crate::core::error::{AppError, Result};
use crate::core::service::MarketplaceApi;
use crate::services::notifications::Notifier;
use crate::utils::validation::{
    validate_image, validate_login, validate_password, validate_password_confirmation,
    validate_registration,
};

/// Login, registration and profile operations over the session
#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn MarketplaceApi>,
    session: SessionStore,
    notifier: Notifier,
}

impl AuthService {
    pub fn new(api: Arc<dyn MarketplaceApi>, session: SessionStore, notifier: Notifier) -> Self {
        Self {
            api,
            session,
            notifier,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Run `fut` with the session's loading flag raised
    async fn loading<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        self.session.set_loading(true);
        let result = fut.await;
        self.session.set_loading(false);
        result
    }

    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<UserProfile> {
        validate_login(request)?;

        let response = self
            .loading(async { Ok(self.api.login(request).await?) })
            .await?;

        tracing::info!(user_id = %response.user.id, "Login successful");
        self.session
            .set_authenticated(response.user.clone(), response.token);
        self.notifier.success("Login successful!");
        Ok(response.user)
    }

    /// Create an account and log straight into it
    #[tracing::instrument(
        skip(self, request, confirm_password),
        fields(username = %request.username)
    )]
    pub async fn register(
        &self,
        request: &RegisterRequest,
        confirm_password: &str,
    ) -> Result<UserProfile> {
        validate_registration(request, confirm_password)?;

        let response = self
            .loading(async { Ok(self.api.register(request).await?) })
            .await?;

        tracing::info!(user_id = %response.user.id, "Registration successful");
        self.session
            .set_authenticated(response.user.clone(), response.token);
        self.notifier.success("Registration successful!");
        Ok(response.user)
    }

    /// Local only; the server keeps no session to end
    pub fn logout(&self) {
        self.session.logout();
    }

    /// Re-fetch the current user with the stored token
    ///
    /// Any failure, transient or not, ends the session.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_profile(&self) -> Result<UserProfile> {
        match self.api.current_user().await {
            Ok(response) => {
                self.session.set_user(response.user.clone());
                Ok(response.user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile refresh failed, ending session");
                // A 401 has already been logged out by the gateway
                if self.session.token().is_some() {
                    self.session.logout();
                }
                Err(e.into())
            }
        }
    }

    /// Startup check of a restored session
    ///
    /// Returns whether a user is logged in afterwards. The loading flag is always
    /// cleared on return.
    pub async fn initialize(&self) -> bool {
        if self.session.token().is_some() {
            self.session.set_loading(true);
            if let Err(e) = self.refresh_profile().await {
                tracing::info!(error = %e, "Restored session is no longer valid");
            }
        }
        self.session.set_loading(false);
        self.session.is_authenticated()
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<UserProfile> {
        self.require_session()?;

        let response = self
            .loading(async { Ok(self.api.update_profile(request).await?) })
            .await?;

        self.session.set_user(response.user.clone());
        self.notifier.success("Profile updated successfully!");
        Ok(response.user)
    }

    #[tracing::instrument(
        skip(self, image),
        fields(file = %image.file_name, bytes = image.bytes.len())
    )]
    pub async fn upload_avatar(&self, image: ImageUpload) -> Result<UserProfile> {
        self.require_session()?;
        validate_image(&image).for_field("image")?;

        let response = self
            .loading(async { Ok(self.api.upload_avatar(image).await?) })
            .await?;

        self.session.set_user(response.user.clone());
        self.notifier.success("Avatar uploaded successfully!");
        Ok(response.user)
    }

    #[tracing::instrument(skip_all)]
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
        confirm_password: &str,
    ) -> Result<()> {
        self.require_session()?;
        if request.current_password.is_empty() {
            return Err(AppError::validation(
                "currentPassword",
                "Current password is required",
            ));
        }
        validate_password(&request.new_password).for_field("newPassword")?;
        validate_password_confirmation(&request.new_password, confirm_password)
            .for_field("confirmPassword")?;

        self.loading(async { Ok(self.api.change_password(request).await?) })
            .await?;

        self.notifier.success("Password changed successfully!");
        Ok(())
    }

    fn require_session(&self) -> Result<()> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(AppError::NotAuthenticated)
        }
    }
}
