use cpab_shared::{
    api_error::ApiRequestError,
    auth_flow::{
        normalize_auth_status_response, normalize_token_start_response, AuthStatusResponse,
        TokenStartResponse,
    },
    provider_catalog::{AdminProviderCatalogItem, AdminProviderCatalogResponse},
    provider_import::{AuthGroup, ProviderImportPayload, ProviderImportResponse},
    request_log::RequestLogData,
    transactions::{transactions_query, TransactionsPage},
    version::VersionInfo,
};
use gloo_net::http::{Request, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::JsValue;

use crate::config::{api_base, ADMIN_LOGIN_PATH, TOKEN_KEY_ADMIN, USER_KEY_ADMIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuthGroupsResponse {
    groups: Vec<AuthGroup>,
}

fn stored_admin_token() -> Option<String> {
    web_sys::window()
        .and_then(|win| win.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(TOKEN_KEY_ADMIN).ok().flatten())
        .filter(|token| !token.trim().is_empty())
}

/// Drop the stored admin session and bounce to the login page.
fn handle_unauthorized() {
    if let Some(win) = web_sys::window() {
        if let Ok(Some(storage)) = win.local_storage() {
            let _ = storage.remove_item(TOKEN_KEY_ADMIN);
            let _ = storage.remove_item(USER_KEY_ADMIN);
        }
        let _ = win.location().set_href(ADMIN_LOGIN_PATH);
    }
}

fn build_request(method: Method, url: &str) -> RequestBuilder {
    let builder = match method {
        Method::Get => Request::get(url),
        Method::Post => Request::post(url),
    }
    .header("Content-Type", "application/json");

    match stored_admin_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
        None => builder,
    }
}

/// Authenticated JSON request against the admin API.
///
/// 401 clears the session and redirects; other failures resolve to the
/// backend's message through [`ApiRequestError`]. Empty bodies yield
/// `T::default()`.
async fn api_fetch_admin<T, B>(
    method: Method,
    endpoint: &str,
    body: Option<&B>,
) -> Result<T, String>
where
    T: DeserializeOwned + Default,
    B: Serialize + ?Sized,
{
    let url = format!("{}{}", api_base(), endpoint);
    let builder = build_request(method, &url);
    let request = match body {
        Some(body) => builder
            .json(body)
            .map_err(|e| format!("Serialize error: {:?}", e))?,
        None => builder
            .build()
            .map_err(|e| format!("Request error: {:?}", e))?,
    };

    let response = request
        .send()
        .await
        .map_err(|e| format!("Network error: {:?}", e))?;

    if response.status() == 401 {
        handle_unauthorized();
        return Err("Unauthorized".to_string());
    }

    if !response.ok() {
        let payload = response
            .json::<Value>()
            .await
            .unwrap_or_else(|_| Value::Object(Default::default()));
        let err = ApiRequestError::from_response(response.status(), payload);
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "{} {} failed: {} ({:?})",
            response.status(),
            endpoint,
            err,
            err.code
        )));
        return Err(err.to_string());
    }

    let empty_body = response
        .headers()
        .get("content-length")
        .is_some_and(|len| len.trim() == "0");
    if response.status() == 204 || empty_body {
        return Ok(T::default());
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {:?}", e))
}

async fn admin_get<T: DeserializeOwned + Default>(endpoint: &str) -> Result<T, String> {
    api_fetch_admin::<T, Value>(Method::Get, endpoint, None).await
}

async fn admin_post<T, B>(endpoint: &str, body: Option<&B>) -> Result<T, String>
where
    T: DeserializeOwned + Default,
    B: Serialize + ?Sized,
{
    api_fetch_admin(Method::Post, endpoint, body).await
}

pub async fn fetch_admin_transactions(
    page: usize,
    page_size: usize,
) -> Result<TransactionsPage, String> {
    admin_get(&format!(
        "/v0/admin/dashboard/transactions?{}",
        transactions_query(page, page_size)
    ))
    .await
}

pub async fn fetch_admin_request_log(transaction_id: &str) -> Result<RequestLogData, String> {
    admin_get(&format!(
        "/v0/admin/dashboard/transactions/{}/request-log",
        urlencoding::encode(transaction_id)
    ))
    .await
}

pub async fn fetch_admin_provider_catalog() -> Result<Vec<AdminProviderCatalogItem>, String> {
    let response: AdminProviderCatalogResponse = admin_get("/v0/admin/providers/catalog").await?;
    Ok(response.providers)
}

pub async fn fetch_admin_auth_groups() -> Result<Vec<AuthGroup>, String> {
    let response: AuthGroupsResponse = admin_get("/v0/admin/auth-groups").await?;
    Ok(response.groups)
}

pub async fn import_auth_files_by_provider(
    payload: &ProviderImportPayload,
) -> Result<ProviderImportResponse, String> {
    admin_post("/v0/admin/auth-files/import-by-provider", Some(payload)).await
}

pub async fn start_admin_token_flow(provider: &str) -> Result<TokenStartResponse, String> {
    let raw: Value = admin_post::<Value, Value>(
        &format!("/v0/admin/tokens/{}", urlencoding::encode(provider)),
        None,
    )
    .await?;
    normalize_token_start_response(&raw).map_err(|e| e.to_string())
}

pub async fn fetch_admin_auth_status(state: &str) -> Result<AuthStatusResponse, String> {
    let raw: Value = admin_get(&format!(
        "/v0/admin/tokens/get-auth-status?state={}",
        urlencoding::encode(state)
    ))
    .await?;
    normalize_auth_status_response(&raw).map_err(|e| e.to_string())
}

/// Unauthenticated; a failed check just hides the update button.
pub async fn fetch_version() -> Result<VersionInfo, String> {
    let url = format!("{}/v0/version", api_base());
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Network error: {:?}", e))?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {:?}", e))
}
