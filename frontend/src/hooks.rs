use cpab_shared::{copy_bus::CopyFallbackBus, version::VersionInfo};
use yew::prelude::*;

use crate::api::fetch_version;

/// The fallback bus provided by `App`.
///
/// Outside the provider a private bus is returned, so copies still run but
/// their manual fallback has no dialog to land in.
#[hook]
pub fn use_copy_bus() -> CopyFallbackBus {
    let provided = use_context::<CopyFallbackBus>();
    let detached = use_memo((), |_| CopyFallbackBus::new());
    match provided {
        Some(bus) => bus,
        None => {
            web_sys::console::warn_1(&"use_copy_bus called outside the bus provider".into());
            (*detached).clone()
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VersionState {
    pub loading: bool,
    pub data: Option<VersionInfo>,
}

impl Default for VersionState {
    fn default() -> Self {
        Self {
            loading: true,
            data: None,
        }
    }
}

/// Query `/v0/version` once on mount. Failures are logged and leave `data`
/// empty.
#[hook]
pub fn use_version_check() -> VersionState {
    let state = use_state(VersionState::default);

    {
        let state = state.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match fetch_version().await {
                    Ok(info) => state.set(VersionState {
                        loading: false,
                        data: Some(info),
                    }),
                    Err(err) => {
                        web_sys::console::warn_1(&format!("version check failed: {err}").into());
                        state.set(VersionState {
                            loading: false,
                            data: None,
                        });
                    },
                }
            });
            || ()
        });
    }

    (*state).clone()
}
