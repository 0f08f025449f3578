//! Build-time and storage configuration of the console.

/// Backend origin baked in at compile time.
///
/// Unset means "same origin as the page", resolved by [`api_base`].
pub const API_BASE_OVERRIDE: Option<&str> = option_env!("CPAB_API_BASE");

/// `localStorage` key of the admin bearer token.
pub const TOKEN_KEY_ADMIN: &str = "admin_token";
/// `localStorage` key of the cached admin profile.
pub const USER_KEY_ADMIN: &str = "admin_user";
/// Where a 401 on an admin call sends the user.
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

/// Base URL for API requests, without a trailing slash.
pub fn api_base() -> String {
    if let Some(base) = API_BASE_OVERRIDE.map(str::trim).filter(|base| !base.is_empty()) {
        return base.trim_end_matches('/').to_string();
    }
    web_sys::window()
        .and_then(|win| win.location().origin().ok())
        .unwrap_or_default()
}
