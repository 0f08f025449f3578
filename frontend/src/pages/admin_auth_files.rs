use cpab_shared::{
    provider_catalog::{to_provider_dropdown_options, ProviderDropdownOption},
    provider_import::AuthGroup,
};
use yew::prelude::*;

use crate::{
    api::{fetch_admin_auth_groups, fetch_admin_provider_catalog},
    components::{
        error_banner::{BannerTone, ErrorBanner},
        loading_spinner::LoadingSpinner,
    },
    i18n::{current::auth_files as t, fill_one},
    pages::{admin_auth_flow::AuthFlowPanel, admin_provider_import::ProviderImportModal},
};

#[function_component(AdminAuthFilesPage)]
pub fn admin_auth_files_page() -> Html {
    let providers = use_state(Vec::<ProviderDropdownOption>::new);
    let catalog_loading = use_state(|| true);
    let load_error = use_state(|| None::<String>);
    let auth_groups = use_state(Vec::<AuthGroup>::new);
    let can_list_groups = use_state(|| false);
    let import_open = use_state(|| false);
    let imported_total = use_state(|| 0_usize);
    let toast = use_state(|| None::<String>);

    {
        let providers = providers.clone();
        let catalog_loading = catalog_loading.clone();
        let load_error = load_error.clone();
        let auth_groups = auth_groups.clone();
        let can_list_groups = can_list_groups.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match fetch_admin_provider_catalog().await {
                    Ok(items) => {
                        providers.set(to_provider_dropdown_options(&items, str::to_string));
                    },
                    Err(err) => {
                        web_sys::console::error_1(&format!("load provider catalog failed: {err}").into());
                        load_error.set(Some(err));
                    },
                }
                catalog_loading.set(false);
            });
            wasm_bindgen_futures::spawn_local(async move {
                match fetch_admin_auth_groups().await {
                    Ok(groups) => {
                        auth_groups.set(groups);
                        can_list_groups.set(true);
                    },
                    Err(err) => {
                        web_sys::console::warn_1(&format!("load auth groups failed: {err}").into());
                    },
                }
            });
            || ()
        });
    }

    let on_toast = {
        let toast = toast.clone();
        Callback::from(move |message: String| toast.set(Some(message)))
    };

    let open_import = {
        let import_open = import_open.clone();
        Callback::from(move |_: MouseEvent| import_open.set(true))
    };

    let close_import = {
        let import_open = import_open.clone();
        Callback::from(move |_: ()| import_open.set(false))
    };

    let on_imported = {
        let imported_total = imported_total.clone();
        Callback::from(move |count: usize| imported_total.set(*imported_total + count))
    };

    let on_flow_completed = {
        let toast = toast.clone();
        Callback::from(move |_provider: String| toast.set(Some(t::COMPLETED.to_string())))
    };

    let dismiss_error = {
        let load_error = load_error.clone();
        Callback::from(move |_: ()| load_error.set(None))
    };

    let dismiss_toast = {
        let toast = toast.clone();
        Callback::from(move |_: ()| toast.set(None))
    };

    html! {
        <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-6 space-y-6">
            <div class="fixed top-16 right-4 z-[90] flex flex-col gap-2">
                if let Some(message) = (*load_error).clone() {
                    <ErrorBanner message={message} on_close={dismiss_error} />
                }
                if let Some(message) = (*toast).clone() {
                    <ErrorBanner message={message} tone={BannerTone::Notice} on_close={dismiss_toast} />
                }
            </div>

            <div class="flex flex-wrap items-start justify-between gap-4">
                <div>
                    <h1 class="m-0 text-2xl font-bold">{ t::TITLE }</h1>
                    <p class="m-0 mt-1 text-sm text-[var(--muted)]">{ t::SUBTITLE }</p>
                    if *imported_total > 0 {
                        <p class="m-0 mt-1 text-sm text-green-600">
                            { fill_one(t::LAST_IMPORT_TEMPLATE, *imported_total) }
                        </p>
                    }
                </div>
                <button type="button" class="btn-fluent-primary" onclick={open_import}>
                    <i class="fas fa-file-import mr-2" aria-hidden="true"></i>
                    { t::IMPORT_BUTTON }
                </button>
            </div>

            if *catalog_loading {
                <LoadingSpinner />
            } else {
                <AuthFlowPanel
                    providers={(*providers).clone()}
                    on_toast={on_toast.clone()}
                    on_completed={on_flow_completed}
                />
            }

            <ProviderImportModal
                open={*import_open}
                auth_groups={(*auth_groups).clone()}
                can_list_groups={*can_list_groups}
                on_close={close_import}
                on_imported={on_imported}
                on_toast={on_toast}
            />
        </main>
    }
}
