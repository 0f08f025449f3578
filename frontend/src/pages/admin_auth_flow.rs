use std::{cell::RefCell, rc::Rc};

use cpab_shared::{
    auth_flow::{AuthFlowPhase, AuthFlowProgress, AUTH_POLL_INTERVAL_MS},
    copy_bus::CopyFallbackBus,
    fence::{RequestFence, RequestTicket},
    provider_catalog::ProviderDropdownOption,
};
use gloo_timers::future::TimeoutFuture;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::{
    api::{fetch_admin_auth_status, start_admin_token_flow},
    clipboard::copy_text,
    components::loading_spinner::{LoadingSpinner, SpinnerSize},
    hooks::use_copy_bus,
    i18n::current::{auth_files as t, common},
};

#[derive(Properties, PartialEq)]
pub struct AuthFlowPanelProps {
    pub providers: Vec<ProviderDropdownOption>,
    pub on_toast: Callback<String>,
    #[prop_or_default]
    pub on_completed: Callback<String>,
}

fn copy_callback(
    text: String,
    source: &'static str,
    bus: CopyFallbackBus,
    on_toast: Callback<String>,
) -> Callback<MouseEvent> {
    Callback::from(move |_: MouseEvent| {
        let text = text.clone();
        let bus = bus.clone();
        let on_toast = on_toast.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if copy_text(&text, source, &bus).await.is_delivered() {
                on_toast.emit(common::COPIED.to_string());
            }
        });
    })
}

/// Poll `get-auth-status` until the flow settles or `ticket` goes stale.
async fn poll_auth_status(
    mut current: AuthFlowProgress,
    ticket: RequestTicket,
    fence: Rc<RefCell<RequestFence>>,
    progress: UseStateHandle<Option<AuthFlowProgress>>,
    on_completed: Callback<String>,
) {
    loop {
        TimeoutFuture::new(AUTH_POLL_INTERVAL_MS).await;
        if !fence.borrow().is_current(ticket) {
            return;
        }

        let status = fetch_admin_auth_status(&current.state).await;
        if !fence.borrow().is_current(ticket) {
            return;
        }

        match status {
            Ok(status) => current.apply_status(&status),
            Err(err) => {
                web_sys::console::error_1(
                    &format!("auth status for {} failed: {err}", current.provider).into(),
                );
                current.phase = AuthFlowPhase::Failed(err);
            },
        }
        progress.set(Some(current.clone()));

        if !current.should_poll() {
            if current.phase == AuthFlowPhase::Completed {
                on_completed.emit(current.provider.clone());
            }
            return;
        }
    }
}

/// OAuth / device-code sign-in for one upstream provider.
///
/// A new start, a cancel, or unmounting supersedes the running poll loop
/// through the panel's [`RequestFence`].
#[function_component(AuthFlowPanel)]
pub fn auth_flow_panel(props: &AuthFlowPanelProps) -> Html {
    let bus = use_copy_bus();
    let selected = use_state(String::new);
    let starting = use_state(|| false);
    let start_error = use_state(|| None::<String>);
    let progress = use_state(|| None::<AuthFlowProgress>);
    let fence = use_mut_ref(RequestFence::new);

    {
        let selected = selected.clone();
        use_effect_with(props.providers.clone(), move |providers| {
            let known = providers.iter().any(|option| option.value == *selected);
            if !known {
                selected.set(
                    providers
                        .first()
                        .map(|option| option.value.clone())
                        .unwrap_or_default(),
                );
            }
            || ()
        });
    }

    {
        let fence = fence.clone();
        use_effect_with((), move |_| move || fence.borrow_mut().invalidate());
    }

    let on_provider_change = {
        let selected = selected.clone();
        Callback::from(move |event: Event| {
            if let Some(select) = event.target_dyn_into::<HtmlSelectElement>() {
                selected.set(select.value());
            }
        })
    };

    let on_start = {
        let selected = selected.clone();
        let starting = starting.clone();
        let start_error = start_error.clone();
        let progress = progress.clone();
        let fence = fence.clone();
        let on_completed = props.on_completed.clone();
        Callback::from(move |_: MouseEvent| {
            let provider = (*selected).clone();
            if provider.is_empty() {
                return;
            }
            let ticket = fence.borrow_mut().begin();
            starting.set(true);
            start_error.set(None);
            progress.set(None);

            let starting = starting.clone();
            let start_error = start_error.clone();
            let progress = progress.clone();
            let fence = fence.clone();
            let on_completed = on_completed.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let started = start_admin_token_flow(&provider).await;
                if !fence.borrow().is_current(ticket) {
                    return;
                }
                starting.set(false);
                match started {
                    Ok(response) => {
                        let current = AuthFlowProgress::started(provider, response);
                        progress.set(Some(current.clone()));
                        poll_auth_status(current, ticket, fence, progress, on_completed).await;
                    },
                    Err(err) => {
                        web_sys::console::error_1(&format!("start sign-in for {provider} failed: {err}").into());
                        start_error.set(Some(err));
                    },
                }
            });
        })
    };

    let on_cancel = {
        let fence = fence.clone();
        let starting = starting.clone();
        let progress = progress.clone();
        Callback::from(move |_: MouseEvent| {
            fence.borrow_mut().invalidate();
            starting.set(false);
            progress.set(None);
        })
    };

    let busy = *starting || (*progress).as_ref().is_some_and(AuthFlowProgress::should_poll);

    let flow_body = match (*progress).clone() {
        None => Html::default(),
        Some(current) => {
            let auth_url_block = match current.auth_url.clone() {
                Some(url) if !current.has_device_code() => {
                    let on_copy = copy_callback(
                        url.clone(),
                        "AdminAuthFiles.authUrl",
                        bus.clone(),
                        props.on_toast.clone(),
                    );
                    html! {
                        <div class="space-y-2">
                            <p class="m-0 text-sm text-[var(--muted)]">{ t::OPEN_URL_HINT }</p>
                            <div class="flex items-center gap-2">
                                <input
                                    readonly=true
                                    value={url.clone()}
                                    class="flex-1 min-w-0 rounded-lg border border-[var(--border)] bg-[var(--surface-alt)] px-3 py-2 text-xs font-mono"
                                />
                                <a
                                    href={url}
                                    target="_blank"
                                    rel="noopener noreferrer"
                                    class="btn-fluent-secondary"
                                >
                                    { t::OPEN }
                                </a>
                                <button type="button" class="btn-fluent-secondary" onclick={on_copy}>
                                    { t::COPY_URL }
                                </button>
                            </div>
                        </div>
                    }
                },
                _ => Html::default(),
            };

            let device_code_block = if current.has_device_code() {
                let verification_url = current.verification_url.clone().unwrap_or_default();
                let user_code = current.user_code.clone().unwrap_or_default();
                let on_copy_url = copy_callback(
                    verification_url.clone(),
                    "AdminAuthFiles.verificationUrl",
                    bus.clone(),
                    props.on_toast.clone(),
                );
                let on_copy_code = copy_callback(
                    user_code.clone(),
                    "AdminAuthFiles.userCode",
                    bus.clone(),
                    props.on_toast.clone(),
                );
                html! {
                    <div class="space-y-3">
                        <p class="m-0 text-sm text-[var(--muted)]">{ t::DEVICE_CODE_HINT }</p>
                        if !verification_url.is_empty() {
                            <div class="flex items-center gap-2">
                                <span class="w-32 shrink-0 text-xs font-semibold">{ t::VERIFICATION_URL }</span>
                                <a
                                    href={verification_url.clone()}
                                    target="_blank"
                                    rel="noopener noreferrer"
                                    class="flex-1 min-w-0 truncate text-sm text-[var(--primary)]"
                                >
                                    { verification_url.clone() }
                                </a>
                                <button type="button" class="btn-fluent-secondary" onclick={on_copy_url}>
                                    { t::COPY_URL }
                                </button>
                            </div>
                        }
                        if !user_code.is_empty() {
                            <div class="flex items-center gap-2">
                                <span class="w-32 shrink-0 text-xs font-semibold">{ t::USER_CODE }</span>
                                <code class="flex-1 text-lg font-mono tracking-widest">{ user_code.clone() }</code>
                                <button type="button" class="btn-fluent-secondary" onclick={on_copy_code}>
                                    { t::COPY_CODE }
                                </button>
                            </div>
                        }
                    </div>
                }
            } else {
                Html::default()
            };

            let phase_line = match &current.phase {
                AuthFlowPhase::Idle => Html::default(),
                AuthFlowPhase::Polling => html! {
                    <LoadingSpinner size={SpinnerSize::Small} label={AttrValue::from(t::WAITING)} />
                },
                AuthFlowPhase::Completed => html! {
                    <div class="rounded-lg border border-green-200 bg-green-50 text-green-700 px-4 py-3 text-sm">
                        { t::COMPLETED }
                    </div>
                },
                AuthFlowPhase::Failed(message) => html! {
                    <div class="rounded-lg border border-red-200 bg-red-50 text-red-700 px-4 py-3 text-sm">
                        { message.clone() }
                    </div>
                },
            };

            html! {
                <div class="space-y-4 border-t border-[var(--border)] pt-4">
                    { auth_url_block }
                    { device_code_block }
                    { phase_line }
                </div>
            }
        },
    };

    html! {
        <section class="rounded-xl border border-[var(--border)] bg-[var(--surface)] shadow-sm p-6 space-y-4">
            <h3 class="m-0 text-lg font-bold">{ t::FLOW_TITLE }</h3>
            <div class="flex flex-wrap items-end gap-3">
                <label class="flex flex-col gap-2 text-sm font-medium">
                    { t::PROVIDER }
                    <select
                        class="min-w-[14rem] rounded-lg border border-[var(--border)] bg-[var(--surface-alt)] p-2.5 text-sm"
                        onchange={on_provider_change}
                        disabled={busy || props.providers.is_empty()}
                    >
                        if props.providers.is_empty() {
                            <option value="">{ t::NO_PROVIDERS }</option>
                        }
                        { for props.providers.iter().map(|option| html! {
                            <option
                                key={option.value.clone()}
                                value={option.value.clone()}
                                selected={option.value == *selected}
                            >
                                { option.label.clone() }
                            </option>
                        }) }
                    </select>
                </label>
                <button
                    type="button"
                    class="btn-fluent-primary"
                    onclick={on_start}
                    disabled={busy || selected.is_empty()}
                >
                    { if *starting { t::STARTING } else { t::START } }
                </button>
                if busy {
                    <button type="button" class="btn-fluent-secondary" onclick={on_cancel}>
                        { t::CANCEL }
                    </button>
                }
            </div>
            if let Some(err) = (*start_error).clone() {
                <div class="rounded-lg border border-red-200 bg-red-50 text-red-700 px-4 py-3 text-sm">
                    { err }
                </div>
            }
            { flow_body }
        </section>
    }
}
