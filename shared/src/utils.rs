//! # Shared Utility Functions
//!
//! Image reference normalization used by every client that renders items or users.
//!
//! Images arrive in two shapes: legacy listings carry a direct URL, newer ones keep
//! the bytes in the backend and are served from `/images/...`. Anything that
//! cannot be resolved falls back to a static placeholder asset.
//!
//! - [`image_url`] - Resolve an item image reference
//! - [`item_image_url`] - Fetch URL of the Nth stored image of an item
//! - [`avatar_url`] - Resolve a user avatar
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::item::ImageRef;
//! use shared::utils::{image_url, PLACEHOLDER_ITEM};
//!
//! let stored = ImageRef::Binary { data: serde_json::json!("aGk="), content_type: None };
//! assert_eq!(image_url(Some(&stored), Some("i1"), 2, "/api"), "/api/images/item/i1?index=2");
//! assert_eq!(image_url(None, Some("i1"), 0, "/api"), PLACEHOLDER_ITEM);
//! ```

use crate::dto::item::ImageRef;
use crate::dto::user::AvatarRef;

/// Static asset shown when an item has no usable image
pub const PLACEHOLDER_ITEM: &str = "/placeholder-item.svg";

/// Static asset shown when a user has no usable avatar
pub const PLACEHOLDER_AVATAR: &str = "/placeholder-avatar.svg";

/// URL of the `index`-th stored image of an item
pub fn item_image_url(api_base: &str, item_id: &str, index: usize) -> String {
    format!(
        "{}/images/item/{}?index={}",
        api_base.trim_end_matches('/'),
        item_id,
        index
    )
}

/// URL of a user's stored avatar
pub fn user_avatar_url(api_base: &str, user_id: &str) -> String {
    format!("{}/images/avatar/{}", api_base.trim_end_matches('/'), user_id)
}

/// Resolve an item image reference to something a renderer can fetch
///
/// Stored images need the owning item's id; without it the placeholder is used.
pub fn image_url(
    image: Option<&ImageRef>,
    item_id: Option<&str>,
    index: usize,
    api_base: &str,
) -> String {
    match image {
        Some(ImageRef::Url { url }) if !url.is_empty() => url.clone(),
        Some(ImageRef::Binary { data, .. }) if !data.is_null() => match item_id {
            Some(id) if !id.is_empty() => item_image_url(api_base, id, index),
            _ => PLACEHOLDER_ITEM.to_string(),
        },
        _ => PLACEHOLDER_ITEM.to_string(),
    }
}

/// Resolve a user avatar; string avatars are used verbatim
pub fn avatar_url(avatar: Option<&AvatarRef>, user_id: &str, api_base: &str) -> String {
    match avatar {
        Some(AvatarRef::Url(url)) => url.clone(),
        Some(AvatarRef::Binary { data, .. }) if !data.is_null() && !user_id.is_empty() => {
            user_avatar_url(api_base, user_id)
        }
        _ => PLACEHOLDER_AVATAR.to_string(),
    }
}

/// True when the image is stored in the backend with a known content type
pub fn is_binary_image(image: &ImageRef) -> bool {
    matches!(
        image,
        ImageRef::Binary { data, content_type: Some(_) } if !data.is_null()
    )
}
