//! Request-log viewer of the admin transactions table.
//!
//! Rapid clicks on different rows start overlapping fetches; the embedded
//! [`RequestFence`] makes sure only the latest click's response is shown.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fence::{RequestFence, RequestTicket};

/// Response of `GET /v0/admin/dashboard/transactions/{id}/request-log`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestLogData {
    /// Raw upstream request, a string or any JSON value.
    pub api_request_raw: Option<Value>,
    /// Raw upstream response, a string or any JSON value.
    pub api_response_raw: Option<Value>,
}

/// Render a raw log value for a `<pre>` block.
///
/// Strings are shown verbatim, null or missing as `-`, everything else as
/// pretty-printed JSON.
pub fn format_raw_log(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(text)) if text.is_empty() => "-".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Modal state plus the fence guarding it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestLogViewer {
    fence: RequestFence,
    open: bool,
    transaction_id: Option<String>,
    request: String,
    response: String,
    error: String,
}

impl RequestLogViewer {
    /// Open the modal for `transaction_id` and start a new request.
    ///
    /// Any previously shown log or error is cleared right away.
    pub fn open(&mut self, transaction_id: impl Into<String>) -> RequestTicket {
        let ticket = self.fence.begin();
        self.open = true;
        self.transaction_id = Some(transaction_id.into());
        self.clear_content();
        ticket
    }

    /// Apply the outcome of the fetch started with `ticket`.
    ///
    /// Returns `false`, leaving the state untouched, when `ticket` has been
    /// superseded by a newer [`open`](Self::open) or by [`close`](Self::close).
    pub fn resolve(&mut self, ticket: RequestTicket, result: Result<RequestLogData, String>) -> bool {
        if !self.fence.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.generation(),
                current = self.fence.generation(),
                "dropping stale request-log response"
            );
            return false;
        }

        match result {
            Ok(data) => {
                self.request = format_raw_log(data.api_request_raw.as_ref());
                self.response = format_raw_log(data.api_response_raw.as_ref());
                self.error.clear();
            },
            Err(message) => {
                self.error = message;
            },
        }
        true
    }

    /// Hide the modal and retire any fetch still in flight.
    pub fn close(&mut self) {
        self.open = false;
        self.fence.invalidate();
        self.transaction_id = None;
        self.clear_content();
    }

    /// Whether the modal is shown.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Transaction whose log is being shown.
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    /// Formatted request text, empty while loading.
    pub fn request(&self) -> &str {
        &self.request
    }

    /// Formatted response text, empty while loading.
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Error of the current fetch, if it failed.
    pub fn error(&self) -> Option<&str> {
        if self.error.is_empty() {
            None
        } else {
            Some(&self.error)
        }
    }

    fn clear_content(&mut self) {
        self.request.clear();
        self.response.clear();
        self.error.clear();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn log(request: &str, response: &str) -> RequestLogData {
        RequestLogData {
            api_request_raw: Some(Value::String(request.to_string())),
            api_response_raw: Some(Value::String(response.to_string())),
        }
    }

    #[test]
    fn raw_log_formatting() {
        assert_eq!(format_raw_log(None), "-");
        assert_eq!(format_raw_log(Some(&Value::Null)), "-");
        assert_eq!(format_raw_log(Some(&json!(""))), "-");
        assert_eq!(format_raw_log(Some(&json!("raw body"))), "raw body");
        assert_eq!(format_raw_log(Some(&json!({"foo": "bar"}))), "{\n  \"foo\": \"bar\"\n}");
    }

    #[test]
    fn shows_result_of_single_request() {
        let mut viewer = RequestLogViewer::default();
        let ticket = viewer.open("1");

        assert!(viewer.resolve(ticket, Ok(log("req", "resp"))));
        assert!(viewer.is_open());
        assert_eq!(viewer.transaction_id(), Some("1"));
        assert_eq!(viewer.request(), "req");
        assert_eq!(viewer.response(), "resp");
        assert_eq!(viewer.error(), None);
    }

    #[test]
    fn shows_error_of_current_request() {
        let mut viewer = RequestLogViewer::default();
        let ticket = viewer.open("1");
        assert!(viewer.resolve(ticket, Err("mock request log failed".to_string())));
        assert_eq!(viewer.error(), Some("mock request log failed"));
    }

    #[test]
    fn late_first_response_is_discarded() {
        let mut viewer = RequestLogViewer::default();
        let first = viewer.open("1");
        let second = viewer.open("2");

        assert!(viewer.resolve(second, Ok(log("second request", "second response"))));
        assert!(!viewer.resolve(first, Ok(log("first request", "first response"))));

        assert_eq!(viewer.transaction_id(), Some("2"));
        assert_eq!(viewer.request(), "second request");
        assert_eq!(viewer.response(), "second response");
    }

    #[test]
    fn stale_error_is_never_surfaced() {
        let mut viewer = RequestLogViewer::default();
        let first = viewer.open("1");
        let second = viewer.open("2");

        assert!(!viewer.resolve(first, Err("boom".to_string())));
        assert_eq!(viewer.error(), None);
        assert!(viewer.resolve(second, Ok(log("ok", "ok"))));
    }

    #[test]
    fn reopening_clears_previous_content() {
        let mut viewer = RequestLogViewer::default();
        let first = viewer.open("1");
        viewer.resolve(first, Err("failed".to_string()));

        viewer.open("2");
        assert_eq!(viewer.error(), None);
        assert_eq!(viewer.request(), "");
    }

    #[test]
    fn close_retires_in_flight_request() {
        let mut viewer = RequestLogViewer::default();
        let pending = viewer.open("1");
        viewer.close();

        assert!(!viewer.resolve(pending, Ok(log("late", "late"))));
        assert!(!viewer.is_open());
        assert_eq!(viewer.request(), "");
        assert_eq!(viewer.response(), "");
    }
}
