//! Browser side of the copy pipeline.
//!
//! `navigator.clipboard` is looked up through `Reflect` because insecure
//! contexts do not define it at all.

use std::fmt;

use async_trait::async_trait;
use cpab_shared::{
    copy::{self, ClipboardWriter, CopyEnvironment, CopyError, CopyOptions, CopyResult, SelectionCopier},
    copy_bus::CopyFallbackBus,
    selection::{LegacySelectionCopier, SelectionHost},
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlDocument, HtmlTextAreaElement};

fn describe_js(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// `navigator.clipboard.writeText`, bound to its receiver.
pub struct BrowserClipboard {
    clipboard: JsValue,
    write_text: js_sys::Function,
}

impl BrowserClipboard {
    /// `None` when the page has no async clipboard API.
    pub fn detect() -> Option<Self> {
        let navigator = web_sys::window()?.navigator();
        let clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard")).ok()?;
        if clipboard.is_undefined() || clipboard.is_null() {
            return None;
        }
        let write_text = js_sys::Reflect::get(&clipboard, &JsValue::from_str("writeText"))
            .ok()?
            .dyn_into::<js_sys::Function>()
            .ok()?;
        Some(Self {
            clipboard,
            write_text,
        })
    }
}

#[async_trait(?Send)]
impl ClipboardWriter for BrowserClipboard {
    async fn write_text(&self, text: &str) -> Result<(), CopyError> {
        let promise = self
            .write_text
            .call1(&self.clipboard, &JsValue::from_str(text))
            .map_err(|err| CopyError::Rejected(describe_js(&err)))?
            .dyn_into::<js_sys::Promise>()
            .map_err(|_| CopyError::Unavailable)?;

        wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|err| CopyError::Rejected(describe_js(&err)))
    }
}

/// DOM failure inside the selection copy.
#[derive(Debug)]
pub struct DomError(String);

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        Self(describe_js(&value))
    }
}

/// Hidden `<textarea>` + `document.execCommand("copy")`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentSelectionHost;

const HIDDEN_TEXTAREA_STYLE: [(&str, &str); 6] = [
    ("position", "fixed"),
    ("top", "0"),
    ("left", "-9999px"),
    ("opacity", "0"),
    ("pointer-events", "none"),
    ("z-index", "-1"),
];

fn document() -> Result<web_sys::Document, DomError> {
    web_sys::window()
        .and_then(|win| win.document())
        .ok_or_else(|| DomError("document unavailable".to_string()))
}

impl SelectionHost for DocumentSelectionHost {
    type Element = HtmlTextAreaElement;
    type Error = DomError;

    fn insert_hidden_text(&self, text: &str) -> Result<Self::Element, Self::Error> {
        let document = document()?;
        let body = document
            .body()
            .ok_or_else(|| DomError("document has no body".to_string()))?;
        let textarea = document
            .create_element("textarea")?
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(|_| DomError("created element is not a textarea".to_string()))?;

        textarea.set_value(text);
        textarea.set_read_only(true);
        textarea.set_attribute("aria-hidden", "true")?;
        let style = textarea.style();
        for (property, value) in HIDDEN_TEXTAREA_STYLE {
            style.set_property(property, value)?;
        }
        body.append_child(&textarea)?;
        Ok(textarea)
    }

    fn focus_and_select(&self, element: &Self::Element) -> Result<(), Self::Error> {
        element.focus()?;
        element.select();
        let len = element.value().encode_utf16().count();
        element.set_selection_range(0, u32::try_from(len).unwrap_or(u32::MAX))?;
        Ok(())
    }

    fn exec_copy(&self) -> Result<bool, Self::Error> {
        let document = document()?
            .dyn_into::<HtmlDocument>()
            .map_err(|_| DomError("not an html document".to_string()))?;
        Ok(document.exec_command("copy")?)
    }

    fn remove(&self, element: &Self::Element) {
        element.remove();
    }
}

/// Live browser capabilities, probed once per copy.
pub struct BrowserCopyEnv {
    clipboard: Option<BrowserClipboard>,
    selection: LegacySelectionCopier<DocumentSelectionHost>,
    secure: bool,
}

impl BrowserCopyEnv {
    pub fn detect() -> Self {
        Self {
            clipboard: BrowserClipboard::detect(),
            selection: LegacySelectionCopier::new(DocumentSelectionHost),
            secure: web_sys::window().is_some_and(|win| win.is_secure_context()),
        }
    }
}

impl CopyEnvironment for BrowserCopyEnv {
    fn clipboard(&self) -> Option<&dyn ClipboardWriter> {
        self.clipboard
            .as_ref()
            .map(|clipboard| clipboard as &dyn ClipboardWriter)
    }

    fn selection(&self) -> &dyn SelectionCopier {
        &self.selection
    }

    fn is_secure_context(&self) -> bool {
        self.secure
    }
}

/// Copy `text` from the call site tagged `source`.
///
/// On total failure the text lands in the manual copy dialog through `bus`.
pub async fn copy_text(text: &str, source: &str, bus: &CopyFallbackBus) -> CopyResult {
    copy_with_options(text, &CopyOptions::new(source), bus).await
}

pub async fn copy_with_options(text: &str, options: &CopyOptions, bus: &CopyFallbackBus) -> CopyResult {
    let env = BrowserCopyEnv::detect();
    let result = copy::copy_text(text, options, &env, bus).await;
    if !result.is_success() {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "copy from {} fell back: {:?}",
            options.source, result.reason
        )));
    }
    result
}

/// `navigator.platform`, empty when unavailable.
pub fn navigator_platform() -> String {
    web_sys::window()
        .and_then(|win| win.navigator().platform().ok())
        .unwrap_or_default()
}
