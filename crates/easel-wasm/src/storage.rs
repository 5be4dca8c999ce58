//! Browser-storage-backed preferences: theme and profile.
//!
//! Two concerns the shell persists across visits — the color theme and
//! the profile name/username — live in localStorage. Every accessor
//! degrades to defaults when storage is unavailable (private browsing,
//! non-browser targets), with a logged warning.

use serde::{Deserialize, Serialize};
use web_sys::Storage;

pub const THEME_KEY: &str = "theme";
pub const PROFILE_NAME_KEY: &str = "userProfileName";
pub const PROFILE_USERNAME_KEY: &str = "userProfileUsername";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn name(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_name(name: &str) -> Option<Theme> {
        match name {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// Profile fields edited in the profile dialog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub username: String,
}

fn local_storage() -> Option<Storage> {
    let storage = web_sys::window()?.local_storage().ok().flatten();
    if storage.is_none() {
        log::warn!("localStorage unavailable; preferences will not persist");
    }
    storage
}

/// Read the saved theme; light when absent or unreadable.
pub fn load_theme() -> Theme {
    local_storage()
        .and_then(|s| s.get_item(THEME_KEY).ok().flatten())
        .and_then(|v| Theme::from_name(&v))
        .unwrap_or_default()
}

/// Persist the theme and toggle the `dark` class on `<html>`.
pub fn save_theme(theme: Theme) {
    if let Some(storage) = local_storage()
        && storage.set_item(THEME_KEY, theme.name()).is_err()
    {
        log::warn!("failed to persist theme");
    }
    apply_theme(theme);
}

/// Toggle the document-level `dark` class without persisting.
pub fn apply_theme(theme: Theme) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    let class_list = root.class_list();
    let result = match theme {
        Theme::Dark => class_list.add_1("dark"),
        Theme::Light => class_list.remove_1("dark"),
    };
    if result.is_err() {
        log::warn!("failed to toggle dark class");
    }
}

/// Read the saved profile; empty fields when absent.
pub fn load_profile() -> Profile {
    let Some(storage) = local_storage() else {
        return Profile::default();
    };
    Profile {
        name: storage.get_item(PROFILE_NAME_KEY).ok().flatten().unwrap_or_default(),
        username: storage
            .get_item(PROFILE_USERNAME_KEY)
            .ok()
            .flatten()
            .unwrap_or_default(),
    }
}

/// Persist both profile fields.
pub fn save_profile(profile: &Profile) {
    let Some(storage) = local_storage() else {
        return;
    };
    if storage.set_item(PROFILE_NAME_KEY, &profile.name).is_err()
        || storage
            .set_item(PROFILE_USERNAME_KEY, &profile.username)
            .is_err()
    {
        log::warn!("failed to persist profile");
    }
}
