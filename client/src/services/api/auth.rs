//! # Authentication Endpoints
//!
//! Login, registration and profile management under `/auth`.

use reqwest::multipart::{Form, Part};
use shared::{
    AuthResponse, ChangePasswordRequest, ImageUpload, LoginRequest, MessageResponse,
    RegisterRequest, UpdateProfileRequest, UserResponse,
};

use super::client::ApiClient;
use crate::core::error::ApiError;

/// Login with email and password.
#[tracing::instrument(skip(client, request), fields(email = %request.email))]
pub async fn login(client: &ApiClient, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
    tracing::info!("Attempting login");
    client.post_json("/auth/login", request).await
}

/// Create an account; the backend logs the new user in.
#[tracing::instrument(skip(client, request), fields(username = %request.username))]
pub async fn register(
    client: &ApiClient,
    request: &RegisterRequest,
) -> Result<AuthResponse, ApiError> {
    client.post_json("/auth/register", request).await
}

pub async fn current_user(client: &ApiClient) -> Result<UserResponse, ApiError> {
    client.get("/auth/me").await
}

pub async fn update_profile(
    client: &ApiClient,
    request: &UpdateProfileRequest,
) -> Result<UserResponse, ApiError> {
    client.put_json("/auth/profile", request).await
}

/// Upload a new avatar as the multipart field `image`.
pub async fn upload_avatar(
    client: &ApiClient,
    image: ImageUpload,
) -> Result<UserResponse, ApiError> {
    let form = Form::new().part("image", image_part(image)?);
    client.post_multipart("/auth/avatar", form).await
}

#[tracing::instrument(skip_all)]
pub async fn change_password(
    client: &ApiClient,
    request: &ChangePasswordRequest,
) -> Result<MessageResponse, ApiError> {
    client.post_json("/auth/change-password", request).await
}

/// Multipart part for an image upload
pub(crate) fn image_part(image: ImageUpload) -> Result<Part, ApiError> {
    Part::bytes(image.bytes)
        .file_name(image.file_name)
        .mime_str(&image.content_type)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid content type: {}", e)))
}
