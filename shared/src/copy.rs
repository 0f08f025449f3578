//! Three-tier text copy: async clipboard API, then selection based copy,
//! then a hand-off to the manual copy dialog through the fallback bus.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::copy_bus::{CopyFallbackBus, ManualCopyPayload};

/// Overall outcome of one copy attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyStatus {
    /// Text is on the system clipboard.
    Success,
    /// Text was handed to the manual copy dialog.
    Fallback,
    /// Nothing was attempted.
    Failed,
}

/// Mechanism that produced the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyMethod {
    /// `navigator.clipboard.writeText`.
    #[serde(rename = "clipboard")]
    Clipboard,
    /// Hidden textarea plus `document.execCommand("copy")`.
    #[serde(rename = "execCommand")]
    ExecCommand,
    /// The user copies by hand.
    #[serde(rename = "manual")]
    Manual,
}

/// Why the automatic tiers did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyReason {
    /// The page is not a secure context.
    InsecureContext,
    /// Secure context, but the write was rejected.
    PermissionDenied,
    /// Nothing usable to copy.
    ApiUnavailable,
    /// Anything else.
    Unknown,
}

/// Value returned to the caller of [`copy_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyResult {
    /// Overall outcome.
    pub status: CopyStatus,
    /// Tier that produced the outcome.
    pub method: CopyMethod,
    /// Failure reason, absent on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<CopyReason>,
}

impl CopyResult {
    /// Successful copy through `method`.
    pub const fn success(method: CopyMethod) -> Self {
        Self {
            status: CopyStatus::Success,
            method,
            reason: None,
        }
    }

    /// Handed off to the manual dialog.
    pub const fn fallback(reason: CopyReason) -> Self {
        Self {
            status: CopyStatus::Fallback,
            method: CopyMethod::Manual,
            reason: Some(reason),
        }
    }

    /// Nothing attempted.
    pub const fn failed(reason: CopyReason) -> Self {
        Self {
            status: CopyStatus::Failed,
            method: CopyMethod::Manual,
            reason: Some(reason),
        }
    }

    /// `true` when the text reached the clipboard automatically.
    pub fn is_success(&self) -> bool {
        self.status == CopyStatus::Success
    }

    /// `true` when the user ends up with the text either way.
    pub fn is_delivered(&self) -> bool {
        matches!(self.status, CopyStatus::Success | CopyStatus::Fallback)
    }
}

/// Per-call options for [`copy_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOptions {
    /// Diagnostic tag of the call site.
    pub source: String,
}

impl CopyOptions {
    /// Options tagged with `source`.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Options for a user-triggered retry of a copy that came from `source`.
    pub fn retry_of(source: &str) -> Self {
        Self::new(format!("{source}.retry"))
    }
}

/// Failure of the async clipboard tier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CopyError {
    /// The platform refused the write.
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
    /// The capability vanished between lookup and use.
    #[error("clipboard api unavailable")]
    Unavailable,
}

/// Asynchronous "write text to the system clipboard" capability.
#[async_trait(?Send)]
pub trait ClipboardWriter {
    /// Place `text` on the clipboard.
    async fn write_text(&self, text: &str) -> Result<(), CopyError>;
}

/// Synchronous "copy via the current selection" capability.
///
/// Implementations must not panic and must leave no helper state behind.
pub trait SelectionCopier {
    /// Returns `true` when the platform reported a successful copy.
    fn copy_via_selection(&self, text: &str) -> bool;
}

/// Selection copier for targets without a document model.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSelectionCopy;

impl SelectionCopier for NoSelectionCopy {
    fn copy_via_selection(&self, _text: &str) -> bool {
        false
    }
}

/// Everything [`copy_text`] needs from the platform.
pub trait CopyEnvironment {
    /// The async clipboard writer, when the platform exposes one.
    fn clipboard(&self) -> Option<&dyn ClipboardWriter>;
    /// The legacy selection copier.
    fn selection(&self) -> &dyn SelectionCopier;
    /// Whether the page runs in a secure context.
    fn is_secure_context(&self) -> bool;
}

/// Copy `text` to the clipboard, degrading tier by tier.
///
/// The text is trimmed first; blank input fails immediately with
/// [`CopyReason::ApiUnavailable`]. When both automatic tiers fail, the trimmed
/// text is published on `bus` and a [`CopyStatus::Fallback`] result is
/// returned. Never retries on its own and never panics on platform errors.
pub async fn copy_text<E>(
    text: &str,
    options: &CopyOptions,
    env: &E,
    bus: &CopyFallbackBus,
) -> CopyResult
where
    E: CopyEnvironment + ?Sized,
{
    let value = text.trim();
    if value.is_empty() {
        tracing::debug!(source = %options.source, "nothing to copy");
        return CopyResult::failed(CopyReason::ApiUnavailable);
    }

    if let Some(clipboard) = env.clipboard() {
        match clipboard.write_text(value).await {
            Ok(()) => {
                tracing::debug!(source = %options.source, "copied via clipboard api");
                return CopyResult::success(CopyMethod::Clipboard);
            },
            Err(err) => {
                tracing::debug!(
                    source = %options.source,
                    error = %err,
                    "clipboard api failed, trying selection copy"
                );
            },
        }
    }

    if env.selection().copy_via_selection(value) {
        tracing::debug!(source = %options.source, "copied via selection");
        return CopyResult::success(CopyMethod::ExecCommand);
    }

    let reason = if env.is_secure_context() {
        CopyReason::PermissionDenied
    } else {
        CopyReason::InsecureContext
    };
    tracing::warn!(
        source = %options.source,
        ?reason,
        "automatic copy failed, switching to manual copy"
    );

    bus.emit(ManualCopyPayload {
        text: value.to_string(),
        source: options.source.clone(),
    });

    CopyResult::fallback(reason)
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    use super::*;

    struct FakeClipboard {
        accept: bool,
        writes: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl ClipboardWriter for FakeClipboard {
        async fn write_text(&self, text: &str) -> Result<(), CopyError> {
            self.writes.borrow_mut().push(text.to_string());
            if self.accept {
                Ok(())
            } else {
                Err(CopyError::Rejected("clipboard denied".to_string()))
            }
        }
    }

    struct FakeSelection {
        result: bool,
        calls: Cell<usize>,
    }

    impl SelectionCopier for FakeSelection {
        fn copy_via_selection(&self, _text: &str) -> bool {
            self.calls.set(self.calls.get() + 1);
            self.result
        }
    }

    struct FakeEnv {
        clipboard: Option<FakeClipboard>,
        selection: FakeSelection,
        secure: bool,
    }

    impl FakeEnv {
        fn new(clipboard: Option<bool>, selection: bool, secure: bool) -> Self {
            Self {
                clipboard: clipboard.map(|accept| FakeClipboard {
                    accept,
                    writes: RefCell::new(Vec::new()),
                }),
                selection: FakeSelection {
                    result: selection,
                    calls: Cell::new(0),
                },
                secure,
            }
        }

        fn clipboard_writes(&self) -> Vec<String> {
            self.clipboard
                .as_ref()
                .map(|c| c.writes.borrow().clone())
                .unwrap_or_default()
        }
    }

    impl CopyEnvironment for FakeEnv {
        fn clipboard(&self) -> Option<&dyn ClipboardWriter> {
            self.clipboard.as_ref().map(|c| c as &dyn ClipboardWriter)
        }

        fn selection(&self) -> &dyn SelectionCopier {
            &self.selection
        }

        fn is_secure_context(&self) -> bool {
            self.secure
        }
    }

    fn capture(bus: &CopyFallbackBus) -> (Rc<RefCell<Vec<ManualCopyPayload>>>, crate::CopySubscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = bus.subscribe(move |p| sink.borrow_mut().push(p.clone()));
        (seen, sub)
    }

    #[tokio::test]
    async fn uses_clipboard_api_when_available() {
        let env = FakeEnv::new(Some(true), true, true);
        let bus = CopyFallbackBus::new();
        let (emitted, _sub) = capture(&bus);

        let result = copy_text("hello", &CopyOptions::new("test.clipboard"), &env, &bus).await;

        assert_eq!(result, CopyResult::success(CopyMethod::Clipboard));
        assert_eq!(env.clipboard_writes(), vec!["hello".to_string()]);
        assert_eq!(env.selection.calls.get(), 0);
        assert!(emitted.borrow().is_empty());
    }

    #[tokio::test]
    async fn falls_back_to_selection_when_clipboard_rejects() {
        let env = FakeEnv::new(Some(false), true, true);
        let bus = CopyFallbackBus::new();
        let (emitted, _sub) = capture(&bus);

        let result = copy_text(" hello ", &CopyOptions::new("test.exec"), &env, &bus).await;

        assert_eq!(result, CopyResult::success(CopyMethod::ExecCommand));
        assert_eq!(env.clipboard_writes(), vec!["hello".to_string()]);
        assert_eq!(env.selection.calls.get(), 1);
        assert!(emitted.borrow().is_empty());
    }

    #[tokio::test]
    async fn skips_missing_clipboard_api() {
        let env = FakeEnv::new(None, true, false);
        let bus = CopyFallbackBus::new();

        let result = copy_text("hello", &CopyOptions::new("test.no_api"), &env, &bus).await;

        assert_eq!(result.method, CopyMethod::ExecCommand);
    }

    #[tokio::test]
    async fn manual_fallback_in_insecure_context() {
        let env = FakeEnv::new(Some(false), false, false);
        let bus = CopyFallbackBus::new();
        let (emitted, _sub) = capture(&bus);

        let result = copy_text("  hello\n", &CopyOptions::new("test.manual"), &env, &bus).await;

        assert_eq!(result, CopyResult::fallback(CopyReason::InsecureContext));
        assert_eq!(
            *emitted.borrow(),
            vec![ManualCopyPayload {
                text: "hello".to_string(),
                source: "test.manual".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn manual_fallback_in_secure_context_is_permission_denied() {
        let env = FakeEnv::new(None, false, true);
        let bus = CopyFallbackBus::new();
        let (emitted, _sub) = capture(&bus);

        let result = copy_text("hello", &CopyOptions::new("test.denied"), &env, &bus).await;

        assert_eq!(result.status, CopyStatus::Fallback);
        assert_eq!(result.reason, Some(CopyReason::PermissionDenied));
        assert_eq!(emitted.borrow().len(), 1);
    }

    #[tokio::test]
    async fn blank_text_touches_nothing() {
        let env = FakeEnv::new(Some(true), true, true);
        let bus = CopyFallbackBus::new();
        let (emitted, _sub) = capture(&bus);

        let result = copy_text("   ", &CopyOptions::new("test.blank"), &env, &bus).await;

        assert_eq!(result, CopyResult::failed(CopyReason::ApiUnavailable));
        assert!(env.clipboard_writes().is_empty());
        assert_eq!(env.selection.calls.get(), 0);
        assert!(emitted.borrow().is_empty());
    }

    #[test]
    fn retry_source_is_suffixed() {
        assert_eq!(CopyOptions::retry_of("Modal.copy").source, "Modal.copy.retry");
    }

    #[test]
    fn result_serializes_with_wire_names() {
        let json = serde_json::to_value(CopyResult::success(CopyMethod::ExecCommand))
            .expect("serialize");
        assert_eq!(json, serde_json::json!({"status": "success", "method": "execCommand"}));

        let json = serde_json::to_value(CopyResult::fallback(CopyReason::InsecureContext))
            .expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"status": "fallback", "method": "manual", "reason": "insecure_context"})
        );
    }
}
