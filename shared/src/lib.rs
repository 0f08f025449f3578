//! Platform-agnostic core of the cpab admin console.
//!
//! Holds the copy fallback chain, the manual copy bus, stale-response fencing
//! and the wire models of the admin pages. Browser bindings live in the
//! frontend crate; everything here runs and is tested natively.

pub mod api_error;
pub mod auth_flow;
pub mod copy;
pub mod copy_bus;
pub mod fence;
pub mod manual_copy;
pub mod provider_catalog;
pub mod provider_import;
pub mod request_log;
pub mod selection;
pub mod transactions;
pub mod version;
pub mod wire;

pub use api_error::ApiRequestError;
pub use copy::{
    copy_text, ClipboardWriter, CopyEnvironment, CopyError, CopyMethod, CopyOptions, CopyReason,
    CopyResult, CopyStatus, SelectionCopier,
};
pub use copy_bus::{CopyFallbackBus, CopySubscription, ManualCopyPayload};
pub use fence::{RequestFence, RequestTicket};
pub use manual_copy::{ManualCopyAction, ManualCopyDialogState};
pub use request_log::{RequestLogData, RequestLogViewer};
pub use selection::{LegacySelectionCopier, SelectionHost};
