//! Validation utilities for user input
//!
//! Field validators return a [`ValidationResult`]; the form-level checks turn the
//! first failure into [`AppError::Validation`] naming the offending field, so the
//! caller can render it inline. None of these touch the network.

use shared::{ImageUpload, LoginRequest, NewItemFields, RegisterRequest};

use crate::core::error::AppError;

pub const MAX_ITEM_IMAGES: usize = 5;
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }

    /// Attach a field name, turning a failure into an inline validation error
    pub fn for_field(self, field: &str) -> Result<(), AppError> {
        match self.error {
            Some(message) if !self.is_valid => Err(AppError::validation(field, message)),
            _ => Ok(()),
        }
    }
}

/// Validate email format
pub fn validate_email(email: &str) -> ValidationResult {
    let email = email.trim();
    if email.is_empty() {
        return ValidationResult::err("Email is required");
    }

    let Some((local, domain)) = email.split_once('@') else {
        return ValidationResult::err("Invalid email address");
    };

    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return ValidationResult::err("Invalid email address");
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && tld.len() >= 2 => ValidationResult::ok(),
        _ => ValidationResult::err("Invalid email address"),
    }
}

/// Validate username
pub fn validate_username(username: &str) -> ValidationResult {
    let username = username.trim();
    if username.is_empty() {
        return ValidationResult::err("Username is required");
    }

    if username.chars().count() < 3 {
        return ValidationResult::err("Username must be at least 3 characters");
    }

    ValidationResult::ok()
}

/// Validate password length
pub fn validate_password(password: &str) -> ValidationResult {
    if password.is_empty() {
        return ValidationResult::err("Password is required");
    }

    if password.chars().count() < 6 {
        return ValidationResult::err("Password must be at least 6 characters");
    }

    ValidationResult::ok()
}

pub fn validate_password_confirmation(password: &str, confirmation: &str) -> ValidationResult {
    if confirmation.is_empty() {
        return ValidationResult::err("Please confirm your password");
    }

    if password != confirmation {
        return ValidationResult::err("Passwords do not match");
    }

    ValidationResult::ok()
}

/// First and last names: required, two characters minimum
pub fn validate_name(label: &str, value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return ValidationResult::err(format!("{} is required", label));
    }

    if value.chars().count() < 2 {
        return ValidationResult::err(format!("{} must be at least 2 characters", label));
    }

    ValidationResult::ok()
}

pub fn validate_login(request: &LoginRequest) -> Result<(), AppError> {
    validate_email(&request.email).for_field("email")?;
    validate_password(&request.password).for_field("password")
}

pub fn validate_registration(
    request: &RegisterRequest,
    confirmation: &str,
) -> Result<(), AppError> {
    validate_name("First name", &request.first_name).for_field("firstName")?;
    validate_name("Last name", &request.last_name).for_field("lastName")?;
    validate_username(&request.username).for_field("username")?;
    validate_email(&request.email).for_field("email")?;
    validate_password(&request.password).for_field("password")?;
    validate_password_confirmation(&request.password, confirmation).for_field("confirmPassword")
}

/// Validate one image before upload
pub fn validate_image(image: &ImageUpload) -> ValidationResult {
    if !image.content_type.starts_with("image/") {
        return ValidationResult::err(format!("{} is not an image", image.file_name));
    }

    if image.bytes.len() > MAX_IMAGE_BYTES {
        return ValidationResult::err(format!("{} is larger than 5MB", image.file_name));
    }

    ValidationResult::ok()
}

/// Validate the add-item form: required text, a positive price and 1 to 5 images
pub fn validate_item_form(fields: &NewItemFields, images: &[ImageUpload]) -> Result<(), AppError> {
    if fields.title.trim().is_empty() {
        return Err(AppError::validation("title", "Title is required"));
    }

    if fields.description.trim().is_empty() {
        return Err(AppError::validation("description", "Description is required"));
    }

    if fields.points_value < 1 {
        return Err(AppError::validation("pointsValue", "Points must be at least 1"));
    }

    if images.is_empty() {
        return Err(AppError::validation("images", "At least one image is required"));
    }

    if images.len() > MAX_ITEM_IMAGES {
        return Err(AppError::validation("images", "Maximum 5 images allowed"));
    }

    images
        .iter()
        .try_for_each(|image| validate_image(image).for_field("images"))
}

pub fn validate_reject_reason(reason: &str) -> ValidationResult {
    if reason.trim().is_empty() {
        return ValidationResult::err("Please provide a reason for rejection");
    }

    ValidationResult::ok()
}

pub fn validate_rating(rating: u8) -> ValidationResult {
    if !(1..=5).contains(&rating) {
        return ValidationResult::err("Rating must be between 1 and 5");
    }

    ValidationResult::ok()
}
