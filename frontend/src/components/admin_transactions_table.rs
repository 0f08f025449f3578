use cpab_shared::{
    fence::RequestFence,
    request_log::RequestLogViewer,
    transactions::{
        format_cost_micros, format_seconds_from_ms, format_thinking_variant_display, format_tokens,
        parse_page_size, showing_range, total_pages, StatusType, Transaction, DEFAULT_PAGE_SIZE,
        PAGE_SIZE_OPTIONS,
    },
};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, HtmlElement, HtmlSelectElement, KeyboardEvent};
use yew::prelude::*;

use crate::{
    api::{fetch_admin_request_log, fetch_admin_transactions},
    components::pagination::Pagination,
    i18n::{current::transactions as t, fill_three},
};

const COLUMN_COUNT: usize = 11;
const REQUEST_LOG_TITLE_ID: &str = "admin-transactions-request-log-title";

fn status_badge_class(status_type: StatusType) -> Classes {
    let base = classes!(
        "inline-flex",
        "items-center",
        "px-2.5",
        "py-0.5",
        "rounded-full",
        "text-xs",
        "font-medium",
        "border"
    );
    match status_type {
        StatusType::Success => {
            classes!(base, "bg-emerald-500/10", "text-emerald-700", "dark:text-emerald-300", "border-emerald-500/20")
        },
        StatusType::Error => classes!(base, "bg-red-500/10", "text-red-700", "dark:text-red-300", "border-red-500/20"),
    }
}

/// Defer `element.focus()` past the current render.
fn focus_later(element: HtmlElement) {
    wasm_bindgen_futures::spawn_local(async move {
        TimeoutFuture::new(0).await;
        let _ = element.focus();
    });
}

#[function_component(AdminTransactionsTable)]
pub fn admin_transactions_table() -> Html {
    let transactions = use_state(Vec::<Transaction>::new);
    let total = use_state(|| 0_usize);
    let page = use_state(|| 1_usize);
    let page_size = use_state(|| DEFAULT_PAGE_SIZE);
    let loading = use_state(|| true);
    let list_error = use_state(|| None::<String>);
    // Page changes can outrun each other; only the newest listing is applied.
    let list_fence = use_mut_ref(RequestFence::new);
    let viewer = use_mut_ref(RequestLogViewer::default);
    let trigger_button = use_mut_ref(|| None::<HtmlElement>);
    let close_button_ref = use_node_ref();
    let rerender = use_force_update();

    let pages = total_pages(*total, *page_size);

    {
        let transactions = transactions.clone();
        let total = total.clone();
        let loading = loading.clone();
        let list_error = list_error.clone();
        let list_fence = list_fence.clone();
        use_effect_with((*page, *page_size), move |(page, page_size)| {
            let (page, page_size) = (*page, *page_size);
            let ticket = list_fence.borrow_mut().begin();
            loading.set(true);
            list_error.set(None);
            wasm_bindgen_futures::spawn_local(async move {
                let result = fetch_admin_transactions(page, page_size).await;
                if !list_fence.borrow().is_current(ticket) {
                    return;
                }
                match result {
                    Ok(resp) => {
                        transactions.set(resp.transactions);
                        total.set(resp.total);
                    },
                    Err(err) => {
                        web_sys::console::error_1(&format!("load transactions failed: {err}").into());
                        list_error.set(Some(err));
                        transactions.set(Vec::new());
                        total.set(0);
                    },
                }
                loading.set(false);
            });
            || ()
        });
    }

    {
        let page = page.clone();
        use_effect_with((*page, pages), move |(current, pages)| {
            if *current > *pages {
                page.set(*pages);
            }
            || ()
        });
    }

    let close_request_log = {
        let viewer = viewer.clone();
        let trigger_button = trigger_button.clone();
        let rerender = rerender.clone();
        Callback::from(move |_: ()| {
            viewer.borrow_mut().close();
            rerender.force_update();
            if let Some(trigger) = trigger_button.borrow().clone() {
                focus_later(trigger);
            }
        })
    };

    let is_open = viewer.borrow().is_open();

    {
        let close_button_ref = close_button_ref.clone();
        use_effect_with(is_open, move |open| {
            if *open {
                if let Some(button) = close_button_ref.cast::<HtmlElement>() {
                    focus_later(button);
                }
            }
            || ()
        });
    }

    {
        let close_request_log = close_request_log.clone();
        use_effect_with(is_open, move |open| {
            let keydown_listener_opt = if *open {
                let listener = Closure::wrap(Box::new(move |event: KeyboardEvent| {
                    if event.key() == "Escape" {
                        event.prevent_default();
                        close_request_log.emit(());
                    }
                }) as Box<dyn FnMut(_)>);
                if let Some(win) = window() {
                    let _ = win
                        .add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref());
                }
                Some(listener)
            } else {
                None
            };

            move || {
                if let Some(listener) = keydown_listener_opt {
                    if let Some(win) = window() {
                        let _ = win.remove_event_listener_with_callback(
                            "keydown",
                            listener.as_ref().unchecked_ref(),
                        );
                    }
                }
            }
        });
    }

    let open_request_log = {
        let viewer = viewer.clone();
        let trigger_button = trigger_button.clone();
        let rerender = rerender.clone();
        Callback::from(move |(transaction_id, trigger): (String, Option<HtmlElement>)| {
            *trigger_button.borrow_mut() = trigger;
            let ticket = viewer.borrow_mut().open(transaction_id.clone());
            rerender.force_update();

            let viewer = viewer.clone();
            let rerender = rerender.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = fetch_admin_request_log(&transaction_id).await;
                let failure = result.as_ref().err().cloned();
                if !viewer.borrow_mut().resolve(ticket, result) {
                    return;
                }
                if let Some(err) = failure {
                    web_sys::console::error_1(&format!("load request log {transaction_id} failed: {err}").into());
                }
                rerender.force_update();
            });
        })
    };

    let on_page_size_change = {
        let page_size = page_size.clone();
        let page = page.clone();
        Callback::from(move |event: Event| {
            if let Some(select) = event.target_dyn_into::<HtmlSelectElement>() {
                page_size.set(parse_page_size(&select.value()));
                page.set(1);
            }
        })
    };

    let on_page_change = {
        let page = page.clone();
        Callback::from(move |next: usize| page.set(next))
    };

    let (from, to) = showing_range(*page, *page_size, *total);

    let rows = if *loading {
        (0..5)
            .map(|index| {
                html! {
                    <tr key={format!("skeleton-{index}")}>
                        <td colspan={COLUMN_COUNT.to_string()} class="px-6 py-4">
                            <div class="animate-pulse h-4 rounded bg-[var(--surface-alt)]"></div>
                        </td>
                    </tr>
                }
            })
            .collect::<Html>()
    } else if transactions.is_empty() {
        html! {
            <tr>
                <td colspan={COLUMN_COUNT.to_string()} class="px-6 py-8 text-center text-[var(--muted)]">
                    { t::EMPTY }
                </td>
            </tr>
        }
    } else {
        transactions
            .iter()
            .enumerate()
            .map(|(index, tx)| {
                let onclick = {
                    let open_request_log = open_request_log.clone();
                    let transaction_id = tx.id.to_string();
                    Callback::from(move |event: MouseEvent| {
                        let trigger = event
                            .current_target()
                            .and_then(|target| target.dyn_into::<HtmlElement>().ok());
                        open_request_log.emit((transaction_id.clone(), trigger));
                    })
                };
                let username = if tx.username.is_empty() { "-" } else { tx.username.as_str() };
                let provider = if tx.provider.is_empty() { "-" } else { tx.provider.as_str() };

                html! {
                    <tr key={tx.row_key(index)} class="hover:bg-[var(--surface-alt)] transition-colors">
                        <td class="px-6 py-4 whitespace-nowrap">{ username }</td>
                        <td class="px-6 py-4 whitespace-nowrap">
                            <span class={status_badge_class(tx.status_type)}>{ tx.status.clone() }</span>
                        </td>
                        <td class="px-6 py-4 whitespace-nowrap font-mono text-xs text-[var(--muted)]">{ tx.timestamp.clone() }</td>
                        <td class="px-6 py-4 whitespace-nowrap text-[var(--muted)]">{ provider }</td>
                        <td class="px-6 py-4 whitespace-nowrap font-medium">
                            <div class="inline-flex items-center gap-2">
                                <span>{ tx.model.clone() }</span>
                                <span class="inline-flex items-center px-2 py-0.5 rounded border border-[var(--border)] text-[11px] font-mono text-[var(--muted)]">
                                    { format_thinking_variant_display(tx.variant_origin.as_deref(), tx.variant.as_deref()) }
                                </span>
                            </div>
                        </td>
                        <td class="px-6 py-4 whitespace-nowrap font-mono text-[var(--muted)]">
                            { format_seconds_from_ms(tx.request_time_ms) }
                        </td>
                        <td class="px-6 py-4 whitespace-nowrap text-right font-mono">{ format_tokens(tx.uncached_input_tokens()) }</td>
                        <td class="px-6 py-4 whitespace-nowrap text-right font-mono">{ format_tokens(tx.cached_tokens) }</td>
                        <td class="px-6 py-4 whitespace-nowrap text-right font-mono">{ format_tokens(tx.output_tokens) }</td>
                        <td class="px-6 py-4 whitespace-nowrap font-mono">{ format_cost_micros(tx.cost_micros) }</td>
                        <td class="px-6 py-4 whitespace-nowrap text-center">
                            <button
                                type="button"
                                class={classes!("btn-fluent-secondary", "!p-2")}
                                aria-label={t::REQUEST_LOG}
                                onclick={onclick}
                            >
                                <i class={classes!("far", "fa-file-lines")} aria-hidden="true"></i>
                            </button>
                        </td>
                    </tr>
                }
            })
            .collect::<Html>()
    };

    let request_log_modal = {
        let viewer = viewer.borrow();
        if viewer.is_open() {
            let on_close_click = {
                let close_request_log = close_request_log.clone();
                Callback::from(move |_: MouseEvent| close_request_log.emit(()))
            };
            let pre_classes = classes!(
                "min-h-48",
                "max-h-96",
                "overflow-auto",
                "rounded-lg",
                "border",
                "border-[var(--border)]",
                "bg-[var(--surface-alt)]",
                "p-3",
                "text-xs",
                "whitespace-pre-wrap",
                "break-all"
            );
            let or_dash = |text: &str| if text.is_empty() { "-".to_string() } else { text.to_string() };

            html! {
                <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/50 p-4">
                    <div
                        class="w-full max-w-5xl rounded-xl border border-[var(--border)] bg-[var(--surface)] shadow-xl"
                        role="dialog"
                        aria-modal="true"
                        aria-labelledby={REQUEST_LOG_TITLE_ID}
                    >
                        <div class="flex items-center justify-between px-6 py-4 border-b border-[var(--border)]">
                            <h4 id={REQUEST_LOG_TITLE_ID} class="m-0 text-base font-semibold">{ t::REQUEST_LOG }</h4>
                            <button
                                ref={close_button_ref.clone()}
                                type="button"
                                class={classes!("btn-fluent-secondary", "!p-2")}
                                aria-label={t::CLOSE}
                                onclick={on_close_click}
                            >
                                {"×"}
                            </button>
                        </div>
                        <div class="p-6 space-y-4">
                            if let Some(err) = viewer.error() {
                                <div class="rounded-lg border border-red-200 bg-red-50 text-red-700 px-4 py-3 text-sm">
                                    { err.to_string() }
                                </div>
                            }
                            <div class="grid grid-cols-1 gap-4 md:grid-cols-2">
                                <div>
                                    <div class="mb-2 text-sm font-semibold">{ t::REQUEST }</div>
                                    <pre class={pre_classes.clone()}>{ or_dash(viewer.request()) }</pre>
                                </div>
                                <div>
                                    <div class="mb-2 text-sm font-semibold">{ t::RESPONSE }</div>
                                    <pre class={pre_classes}>{ or_dash(viewer.response()) }</pre>
                                </div>
                            </div>
                        </div>
                    </div>
                </div>
            }
        } else {
            Html::default()
        }
    };

    html! {
        <div class="rounded-xl border border-[var(--border)] bg-[var(--surface)] shadow-sm overflow-hidden">
            <div class="px-6 py-5 border-b border-[var(--border)]">
                <h3 class="m-0 text-lg font-bold">{ t::TITLE }</h3>
            </div>
            if let Some(err) = (*list_error).clone() {
                <div class="mx-6 mt-4 rounded-lg border border-red-200 bg-red-50 text-red-700 px-4 py-3 text-sm">
                    { err }
                </div>
            }
            <div class="overflow-x-auto">
                <table class="w-full text-left text-sm">
                    <thead class="uppercase text-xs font-semibold text-[var(--muted)] bg-[var(--surface-alt)]">
                        <tr>
                            <th class="px-6 py-4">{ t::COL_USERNAME }</th>
                            <th class="px-6 py-4">{ t::COL_STATUS }</th>
                            <th class="px-6 py-4">{ t::COL_TIMESTAMP }</th>
                            <th class="px-6 py-4">{ t::COL_PROVIDER }</th>
                            <th class="px-6 py-4">{ t::COL_MODEL }</th>
                            <th class="px-6 py-4">{ t::COL_REQUEST_TIME }</th>
                            <th class="px-6 py-4 text-right">{ t::COL_INPUT }</th>
                            <th class="px-6 py-4 text-right">{ t::COL_CACHED }</th>
                            <th class="px-6 py-4 text-right">{ t::COL_OUTPUT }</th>
                            <th class="px-6 py-4">{ t::COL_COST }</th>
                            <th class="px-6 py-4 text-center">{ t::REQUEST_LOG }</th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-[var(--border)]">
                        { rows }
                    </tbody>
                </table>
            </div>

            <div class="px-6 py-4 border-t border-[var(--border)] flex flex-col gap-3 md:flex-row md:items-center md:justify-between">
                <div class="flex flex-col gap-2 md:flex-row md:items-center md:gap-4">
                    <label class="flex items-center gap-2 text-sm text-[var(--muted)]">
                        { t::ROWS_PER_PAGE }
                        <select class="h-9 px-3 text-sm rounded-lg border border-[var(--border)] bg-[var(--surface)]" onchange={on_page_size_change}>
                            { for PAGE_SIZE_OPTIONS.iter().map(|size| html! {
                                <option value={size.to_string()} selected={*size == *page_size}>{ size }</option>
                            }) }
                        </select>
                    </label>
                    <span class="text-sm text-[var(--muted)]">
                        { fill_three(t::SHOWING_TEMPLATE, from, to, *total) }
                    </span>
                </div>
                <Pagination
                    current_page={*page}
                    total_pages={pages}
                    on_page_change={on_page_change}
                    disabled={*loading}
                />
            </div>

            { request_log_modal }
        </div>
    }
}
