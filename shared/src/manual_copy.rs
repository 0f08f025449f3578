//! State machine behind the manual copy dialog.

use crate::{copy::CopyResult, copy_bus::ManualCopyPayload};

/// Whether the dialog is showing, and what.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ManualCopyDialogState {
    /// No payload, nothing rendered.
    #[default]
    Hidden,
    /// Showing `payload` for manual copy.
    Visible(ManualCopyPayload),
}

/// Inputs to [`ManualCopyDialogState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualCopyAction {
    /// A fallback payload arrived on the bus.
    Show(ManualCopyPayload),
    /// The user dismissed the dialog.
    Close,
    /// A "retry automatic copy" attempt finished.
    RetryFinished(CopyResult),
}

impl ManualCopyDialogState {
    /// Next state after `action`.
    ///
    /// A new payload replaces the current one outright; there is no queue.
    /// Only a successful retry closes the dialog.
    pub fn apply(self, action: ManualCopyAction) -> Self {
        match (self, action) {
            (_, ManualCopyAction::Show(payload)) => Self::Visible(payload),
            (_, ManualCopyAction::Close) => Self::Hidden,
            (Self::Visible(_), ManualCopyAction::RetryFinished(result)) if result.is_success() => {
                Self::Hidden
            },
            (state, ManualCopyAction::RetryFinished(_)) => state,
        }
    }

    /// Payload being shown, if any.
    pub fn payload(&self) -> Option<&ManualCopyPayload> {
        match self {
            Self::Hidden => None,
            Self::Visible(payload) => Some(payload),
        }
    }

    /// Whether the dialog is on screen.
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible(_))
    }
}

/// Copy shortcut to advertise for a `navigator.platform` value.
pub fn copy_shortcut_hint(platform: &str) -> &'static str {
    if platform.to_ascii_lowercase().contains("mac") {
        "Cmd+C"
    } else {
        "Ctrl+C"
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        copy::{
            copy_text, ClipboardWriter, CopyEnvironment, CopyMethod, CopyOptions, CopyReason,
            CopyStatus, SelectionCopier,
        },
        copy_bus::CopyFallbackBus,
    };

    fn payload(text: &str) -> ManualCopyPayload {
        ManualCopyPayload {
            text: text.to_string(),
            source: "test.case".to_string(),
        }
    }

    #[test]
    fn starts_hidden() {
        let state = ManualCopyDialogState::default();
        assert!(!state.is_visible());
        assert!(state.payload().is_none());
    }

    #[test]
    fn show_then_close() {
        let state = ManualCopyDialogState::default().apply(ManualCopyAction::Show(payload("abc-123")));
        assert_eq!(state.payload().map(|p| p.text.as_str()), Some("abc-123"));

        let state = state.apply(ManualCopyAction::Close);
        assert_eq!(state, ManualCopyDialogState::Hidden);
        assert!(state.payload().is_none());
    }

    #[test]
    fn second_payload_replaces_first() {
        let state = ManualCopyDialogState::default()
            .apply(ManualCopyAction::Show(payload("first")))
            .apply(ManualCopyAction::Show(payload("second")));

        assert_eq!(state, ManualCopyDialogState::Visible(payload("second")));
    }

    #[test]
    fn successful_retry_closes() {
        let state = ManualCopyDialogState::Visible(payload("abc"))
            .apply(ManualCopyAction::RetryFinished(CopyResult::success(CopyMethod::Clipboard)));
        assert!(!state.is_visible());
    }

    #[test]
    fn failed_retry_keeps_dialog_open() {
        let state = ManualCopyDialogState::Visible(payload("abc")).apply(
            ManualCopyAction::RetryFinished(CopyResult::fallback(CopyReason::PermissionDenied)),
        );
        assert_eq!(state, ManualCopyDialogState::Visible(payload("abc")));
    }

    #[test]
    fn retry_result_while_hidden_is_ignored() {
        let state = ManualCopyDialogState::Hidden
            .apply(ManualCopyAction::RetryFinished(CopyResult::success(CopyMethod::ExecCommand)));
        assert_eq!(state, ManualCopyDialogState::Hidden);
    }

    #[test]
    fn shortcut_hint_follows_platform() {
        assert_eq!(copy_shortcut_hint("MacIntel"), "Cmd+C");
        assert_eq!(copy_shortcut_hint("Win32"), "Ctrl+C");
        assert_eq!(copy_shortcut_hint(""), "Ctrl+C");
    }

    struct NoCopyEnv;

    struct RefusingSelection;

    impl SelectionCopier for RefusingSelection {
        fn copy_via_selection(&self, _text: &str) -> bool {
            false
        }
    }

    impl CopyEnvironment for NoCopyEnv {
        fn clipboard(&self) -> Option<&dyn ClipboardWriter> {
            None
        }

        fn selection(&self) -> &dyn SelectionCopier {
            &RefusingSelection
        }

        fn is_secure_context(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn fallback_copies_drive_the_dialog_through_the_bus() {
        let bus = CopyFallbackBus::new();
        let state = Rc::new(RefCell::new(ManualCopyDialogState::default()));
        let sink = Rc::clone(&state);
        let _sub = bus.subscribe(move |payload| {
            sink.replace_with(|current| current.clone().apply(ManualCopyAction::Show(payload.clone())));
        });

        let first = copy_text("  first-key ", &CopyOptions::new("Keys.first"), &NoCopyEnv, &bus).await;
        assert_eq!(first.status, CopyStatus::Fallback);
        assert_eq!(
            state.borrow().payload(),
            Some(&ManualCopyPayload {
                text: "first-key".to_string(),
                source: "Keys.first".to_string(),
            })
        );

        copy_text("second-key", &CopyOptions::new("Keys.second"), &NoCopyEnv, &bus).await;
        let shown = state.borrow().payload().cloned();
        assert_eq!(
            shown.map(|p| (p.text, p.source)),
            Some(("second-key".to_string(), "Keys.second".to_string()))
        );
    }
}
