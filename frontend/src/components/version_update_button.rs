use yew::prelude::*;

use crate::{hooks::use_version_check, i18n::current::version_update as t};

/// Shown only when the backend reports a newer release.
#[function_component(VersionUpdateButton)]
pub fn version_update_button() -> Html {
    let version = use_version_check();

    let Some(info) = version.data.filter(|info| !version.loading && info.has_update) else {
        return Html::default();
    };

    let release_url = info.update_url().map(str::to_string);
    let onclick = Callback::from(move |_: MouseEvent| {
        if let (Some(url), Some(win)) = (release_url.as_deref(), web_sys::window()) {
            let _ = win.open_with_url_and_target_and_features(url, "_blank", "noopener,noreferrer");
        }
    });

    html! {
        <button
            type="button"
            onclick={onclick}
            class={classes!(
                "inline-flex",
                "h-9",
                "w-9",
                "items-center",
                "justify-center",
                "rounded-md",
                "border",
                "border-green-500",
                "bg-green-500/10",
                "text-green-600",
                "hover:bg-green-500/20"
            )}
            aria-label={t::NEW_VERSION}
            title={format!("{}: {}", t::NEW_VERSION, info.latest_version)}
        >
            <i class={classes!("fas", "fa-download")} aria-hidden="true"></i>
        </button>
    }
}
