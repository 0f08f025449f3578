//! Admin console for the cpab proxy.
//!
//! `App` owns the copy fallback bus, hands it to every page through a
//! [`ContextProvider`] and mounts the manual copy dialog exactly once.

mod api;
mod clipboard;
mod components;
mod config;
mod hooks;
mod i18n;
mod pages;
mod router;

use cpab_shared::copy_bus::CopyFallbackBus;
use yew::prelude::*;

use crate::components::manual_copy_dialog::ManualCopyDialogHost;

#[function_component(App)]
fn app() -> Html {
    let bus = use_memo((), |_| CopyFallbackBus::new());

    html! {
        <ContextProvider<CopyFallbackBus> context={(*bus).clone()}>
            <router::AppRouter />
            <ManualCopyDialogHost />
        </ContextProvider<CopyFallbackBus>>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
