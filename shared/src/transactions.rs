//! Admin dashboard transaction list: wire models and cell formatting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Page sizes offered by the "rows per page" selector.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [10, 15, 30, 50, 100];

/// Page size used before the user picks one, and for unparsable input.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Transaction id as sent by the backend, which uses numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionId {
    /// Numeric primary key.
    Number(i64),
    /// Opaque string key.
    Text(String),
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl TransactionId {
    /// `true` for zero or blank ids, which the backend sends for rows it
    /// could not key.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Number(value) => *value == 0,
            Self::Text(value) => value.trim().is_empty(),
        }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Success or error flag of one transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusType {
    /// Upstream call succeeded.
    Success,
    /// Anything else.
    #[default]
    #[serde(other)]
    Error,
}

/// One row of the transactions table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    /// Row key, also used by the request-log endpoint.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub id: TransactionId,
    /// Upstream request id.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub request_id: String,
    /// Calling user.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub username: String,
    /// Human readable status.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub status: String,
    /// Status flag driving the badge colour.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub status_type: StatusType,
    /// Pre-formatted timestamp.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub timestamp: String,
    /// Upstream provider.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub provider: String,
    /// Model name.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub model: String,
    /// Thinking variant requested by the client.
    pub variant_origin: Option<String>,
    /// Thinking variant actually sent upstream.
    pub variant: Option<String>,
    /// End-to-end latency.
    pub request_time_ms: Option<f64>,
    /// Prompt tokens, cached ones included.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub input_tokens: u64,
    /// Prompt tokens served from cache.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub cached_tokens: u64,
    /// Completion tokens.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub output_tokens: u64,
    /// Cost in millionths of a dollar.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub cost_micros: i64,
}

impl Transaction {
    /// Stable key for list rendering.
    pub fn row_key(&self, index: usize) -> String {
        if self.id.is_empty() {
            format!("{}-{}", self.request_id, index)
        } else {
            self.id.to_string()
        }
    }

    /// Prompt tokens that were not served from cache.
    pub fn uncached_input_tokens(&self) -> u64 {
        self.input_tokens.saturating_sub(self.cached_tokens)
    }
}

/// Response of `GET /v0/admin/dashboard/transactions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionsPage {
    /// Rows of the requested page.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub transactions: Vec<Transaction>,
    /// Total number of rows across pages.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub total: usize,
    /// Echoed page number.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub page: usize,
    /// Echoed page size.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub page_size: usize,
}

/// Render the requested/real thinking variant pair.
///
/// Both blank gives `-`; equal values collapse to one; differing values
/// render as `origin => real`.
pub fn format_thinking_variant_display(variant_origin: Option<&str>, variant: Option<&str>) -> String {
    let origin = variant_origin.unwrap_or_default().trim();
    let real = variant.unwrap_or_default().trim();
    match (origin.is_empty(), real.is_empty()) {
        (true, true) => "-".to_string(),
        (false, false) if origin == real => real.to_string(),
        (false, false) => format!("{origin} => {real}"),
        (true, false) => real.to_string(),
        (false, true) => origin.to_string(),
    }
}

/// Token count with `,` thousands separators.
pub fn format_tokens(tokens: u64) -> String {
    let digits = tokens.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Latency in seconds with two decimals, treating missing or non-finite
/// values as zero.
pub fn format_seconds_from_ms(ms: Option<f64>) -> String {
    let value = ms.filter(|value| value.is_finite()).unwrap_or(0.0);
    format!("{:.2} s", value / 1000.0)
}

/// Dollar cost with three decimals.
pub fn format_cost_micros(cost_micros: i64) -> String {
    format!("${:.3}", cost_micros as f64 / 1_000_000.0)
}

/// Number of pages for `total` rows, never less than one.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    let per_page = page_size.max(1);
    total.div_ceil(per_page).max(1)
}

/// One-based inclusive row range shown on `page`, `(0, 0)` when empty.
pub fn showing_range(page: usize, page_size: usize, total: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    let page = page.max(1);
    let from = (page - 1) * page_size + 1;
    let to = (page * page_size).min(total);
    (from, to)
}

/// Parse the page size selector value, falling back to
/// [`DEFAULT_PAGE_SIZE`].
pub fn parse_page_size(raw: &str) -> usize {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// Query string for the transaction list endpoint.
pub fn transactions_query(page: usize, page_size: usize) -> String {
    format!("page={}&page_size={}", page.max(1), page_size.max(1))
}
