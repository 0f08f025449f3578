use cpab_shared::provider_import::{
    build_provider_import_payload, default_auth_group_id, format_entries_text, is_json_file_name,
    parse_entries_from_json_text, AuthGroup, ImportEntry, ImportSource, ProviderImportKey,
    ProviderImportResponse,
};
use wasm_bindgen_futures::JsFuture;
use web_sys::{DragEvent, File, FileList, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::{
    api::import_auth_files_by_provider,
    clipboard::copy_text,
    hooks::use_copy_bus,
    i18n::{
        current::{common, provider_import as t},
        fill_one,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ImportTab {
    File,
    Text,
    Example,
}

#[derive(Properties, PartialEq)]
pub struct ProviderImportModalProps {
    pub open: bool,
    pub auth_groups: Vec<AuthGroup>,
    pub can_list_groups: bool,
    pub on_close: Callback<()>,
    /// Called with the number of stored entries after a partially or fully
    /// successful import.
    pub on_imported: Callback<usize>,
    pub on_toast: Callback<String>,
}

fn same_file(left: &File, right: &File) -> bool {
    left.name() == right.name() && left.size() == right.size()
}

async fn read_file_text(file: &File) -> Result<String, String> {
    let value = JsFuture::from(file.text())
        .await
        .map_err(|err| format!("{:?}", err))?;
    value
        .as_string()
        .ok_or_else(|| "file content is not text".to_string())
}

/// Read every file and concatenate their entries; the first failing file
/// aborts with `"{name}: {reason}"`.
async fn parse_entries_from_files(files: &[File]) -> Result<Vec<ImportEntry>, String> {
    let mut entries = Vec::new();
    for file in files {
        let text = read_file_text(file)
            .await
            .map_err(|err| format!("{}: {}", file.name(), err))?;
        let parsed =
            parse_entries_from_json_text(&text).map_err(|err| format!("{}: {}", file.name(), err))?;
        entries.extend(parsed);
    }
    Ok(entries)
}

#[function_component(ProviderImportModal)]
pub fn provider_import_modal(props: &ProviderImportModalProps) -> Html {
    let bus = use_copy_bus();
    let active_tab = use_state(|| ImportTab::File);
    let provider = use_state(|| ProviderImportKey::Codex);
    let selected_group = use_state(|| None::<i64>);
    let files = use_state(Vec::<File>::new);
    let dragging = use_state(|| false);
    let text_input = use_state(String::new);
    let submitting = use_state(|| false);
    let error = use_state(|| None::<String>);
    let result = use_state(|| None::<ProviderImportResponse>);
    let template_text = use_memo(*provider, |provider| provider.template_text());
    let file_input_ref = use_node_ref();

    {
        let active_tab = active_tab.clone();
        let provider = provider.clone();
        let selected_group = selected_group.clone();
        let files = files.clone();
        let dragging = dragging.clone();
        let text_input = text_input.clone();
        let submitting = submitting.clone();
        let error = error.clone();
        let result = result.clone();
        use_effect_with((props.open, props.auth_groups.clone()), move |(open, groups)| {
            if *open {
                active_tab.set(ImportTab::File);
                provider.set(ProviderImportKey::Codex);
                files.set(Vec::new());
                dragging.set(false);
                text_input.set(String::new());
                submitting.set(false);
                error.set(None);
                result.set(None);
                selected_group.set(default_auth_group_id(groups));
            }
            || ()
        });
    }

    if !props.open {
        return Html::default();
    }

    let add_files = {
        let files = files.clone();
        let error = error.clone();
        Callback::from(move |incoming: FileList| {
            let accepted: Vec<File> = (0..incoming.length())
                .filter_map(|index| incoming.get(index))
                .filter(|file| is_json_file_name(&file.name()))
                .collect();
            if accepted.is_empty() {
                error.set(Some(t::ERR_JSON_ONLY.to_string()));
                return;
            }
            error.set(None);

            let mut next = (*files).clone();
            for file in accepted {
                match next.iter_mut().find(|existing| same_file(existing, &file)) {
                    Some(slot) => *slot = file,
                    None => next.push(file),
                }
            }
            files.set(next);
        })
    };

    let on_provider_change = {
        let provider = provider.clone();
        let result = result.clone();
        let error = error.clone();
        Callback::from(move |event: Event| {
            let Some(select) = event.target_dyn_into::<HtmlSelectElement>() else {
                return;
            };
            if let Ok(next) = select.value().parse::<ProviderImportKey>() {
                provider.set(next);
                result.set(None);
                error.set(None);
            }
        })
    };

    let on_group_change = {
        let selected_group = selected_group.clone();
        Callback::from(move |event: Event| {
            if let Some(select) = event.target_dyn_into::<HtmlSelectElement>() {
                selected_group.set(select.value().parse::<i64>().ok());
            }
        })
    };

    let tab_button = |tab: ImportTab, label: &'static str| {
        let active_tab = active_tab.clone();
        let setter = active_tab.clone();
        let onclick = Callback::from(move |_: MouseEvent| setter.set(tab));
        let class = if *active_tab == tab {
            classes!("px-3", "py-2", "text-sm", "rounded-lg", "border", "bg-[var(--primary)]", "text-white", "border-[var(--primary)]")
        } else {
            classes!("px-3", "py-2", "text-sm", "rounded-lg", "border", "border-[var(--border)]", "bg-[var(--surface-alt)]")
        };
        html! {
            <button type="button" class={class} onclick={onclick}>{ label }</button>
        }
    };

    let on_drag_over = {
        let dragging = dragging.clone();
        Callback::from(move |event: DragEvent| {
            event.prevent_default();
            dragging.set(true);
        })
    };

    let on_drag_leave = {
        let dragging = dragging.clone();
        Callback::from(move |_: DragEvent| dragging.set(false))
    };

    let on_drop = {
        let dragging = dragging.clone();
        let add_files = add_files.clone();
        Callback::from(move |event: DragEvent| {
            event.prevent_default();
            dragging.set(false);
            if let Some(list) = event.data_transfer().and_then(|transfer| transfer.files()) {
                add_files.emit(list);
            }
        })
    };

    let on_browse = {
        let file_input_ref = file_input_ref.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(input) = file_input_ref.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };

    let on_file_input = {
        let add_files = add_files.clone();
        Callback::from(move |event: Event| {
            let Some(input) = event.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            if let Some(list) = input.files() {
                add_files.emit(list);
            }
            input.set_value("");
        })
    };

    let on_text_input = {
        let text_input = text_input.clone();
        let error = error.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(area) = event.target_dyn_into::<HtmlTextAreaElement>() {
                text_input.set(area.value());
                error.set(None);
            }
        })
    };

    let on_format = {
        let text_input = text_input.clone();
        let error = error.clone();
        Callback::from(move |_: MouseEvent| match parse_entries_from_json_text(&text_input) {
            Ok(entries) => text_input.set(format_entries_text(&entries)),
            Err(err) => error.set(Some(err.to_string())),
        })
    };

    let on_clear = {
        let text_input = text_input.clone();
        Callback::from(move |_: MouseEvent| text_input.set(String::new()))
    };

    let on_fill_text = {
        let text_input = text_input.clone();
        let active_tab = active_tab.clone();
        let error = error.clone();
        let template_text = template_text.clone();
        Callback::from(move |_: MouseEvent| {
            text_input.set((*template_text).clone());
            active_tab.set(ImportTab::Text);
            error.set(None);
        })
    };

    let on_copy_template = {
        let template_text = template_text.clone();
        let bus = bus.clone();
        let on_toast = props.on_toast.clone();
        Callback::from(move |_: MouseEvent| {
            let text = (*template_text).clone();
            let bus = bus.clone();
            let on_toast = on_toast.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let copied = copy_text(&text, "AuthFilesProviderImportModal.copyTemplate", &bus).await;
                if copied.is_delivered() {
                    on_toast.emit(common::COPIED.to_string());
                }
            });
        })
    };

    let on_import = {
        let active_tab = active_tab.clone();
        let provider = provider.clone();
        let selected_group = selected_group.clone();
        let files = files.clone();
        let text_input = text_input.clone();
        let submitting = submitting.clone();
        let error = error.clone();
        let result = result.clone();
        let on_close = props.on_close.clone();
        let on_imported = props.on_imported.clone();
        Callback::from(move |_: MouseEvent| {
            if *submitting {
                return;
            }
            error.set(None);
            result.set(None);

            let tab = *active_tab;
            let provider = *provider;
            let group_ids: Vec<i64> = (*selected_group).into_iter().collect();
            let files = (*files).clone();
            let text = (*text_input).clone();
            let submitting = submitting.clone();
            let error = error.clone();
            let result = result.clone();
            let on_close = on_close.clone();
            let on_imported = on_imported.clone();

            wasm_bindgen_futures::spawn_local(async move {
                let (source, parsed) = match tab {
                    ImportTab::File => {
                        if files.is_empty() {
                            error.set(Some(t::ERR_NO_FILES.to_string()));
                            return;
                        }
                        (ImportSource::File, parse_entries_from_files(&files).await)
                    },
                    ImportTab::Text => (
                        ImportSource::Text,
                        parse_entries_from_json_text(&text).map_err(|err| err.to_string()),
                    ),
                    ImportTab::Example => {
                        error.set(Some(t::ERR_EXAMPLE_TAB.to_string()));
                        return;
                    },
                };

                let entries = match parsed {
                    Ok(entries) => entries,
                    Err(err) => {
                        error.set(Some(err));
                        return;
                    },
                };
                if entries.is_empty() {
                    error.set(Some(t::ERR_NO_ENTRIES.to_string()));
                    return;
                }

                let payload = build_provider_import_payload(provider, source, group_ids, &entries);
                submitting.set(true);
                match import_auth_files_by_provider(&payload).await {
                    Ok(response) => {
                        let imported = response.imported;
                        let clean = response.failed.is_empty();
                        result.set(Some(response));
                        if imported > 0 {
                            on_imported.emit(imported);
                            if clean {
                                on_close.emit(());
                            }
                        }
                    },
                    Err(err) => {
                        web_sys::console::error_1(&format!("provider import failed: {err}").into());
                        let message = if err.trim().is_empty() {
                            t::ERR_IMPORT_FAILED.to_string()
                        } else {
                            err
                        };
                        error.set(Some(message));
                    },
                }
                submitting.set(false);
            });
        })
    };

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let field_class = classes!(
        "block",
        "w-full",
        "p-2.5",
        "text-sm",
        "rounded-lg",
        "border",
        "border-[var(--border)]",
        "bg-[var(--surface-alt)]"
    );
    let small_button = classes!("btn-fluent-secondary", "text-sm");

    let tab_body = match *active_tab {
        ImportTab::File => html! {
            <div class="space-y-3">
                <div
                    ondragover={on_drag_over}
                    ondragleave={on_drag_leave}
                    ondrop={on_drop}
                    class={classes!(
                        "border-2", "border-dashed", "rounded-xl", "p-6", "transition-colors",
                        if *dragging { "border-[var(--primary)] bg-[var(--primary)]/5" } else { "border-[var(--border)] bg-[var(--surface-alt)]" }
                    )}
                >
                    <div class="flex flex-col items-center gap-2 text-center">
                        <i class="fas fa-file-arrow-up text-2xl text-[var(--muted)]" aria-hidden="true"></i>
                        <p class="m-0 text-sm">{ t::DROP_HINT }</p>
                        <button type="button" class={small_button.clone()} onclick={on_browse}>
                            { t::BROWSE }
                        </button>
                        <input
                            ref={file_input_ref.clone()}
                            type="file"
                            multiple=true
                            accept=".json,application/json"
                            class="hidden"
                            onchange={on_file_input}
                        />
                    </div>
                </div>
                <div class="max-h-40 overflow-y-auto divide-y divide-[var(--border)] border border-[var(--border)] rounded-lg">
                    if files.is_empty() {
                        <div class="px-3 py-2 text-sm text-[var(--muted)]">{ t::NO_FILES }</div>
                    } else {
                        { for files.iter().map(|file| {
                            let name = file.name();
                            let on_remove = {
                                let files = files.clone();
                                let target = file.clone();
                                Callback::from(move |_: MouseEvent| {
                                    let next: Vec<File> = files
                                        .iter()
                                        .filter(|item| !same_file(item, &target))
                                        .cloned()
                                        .collect();
                                    files.set(next);
                                })
                            };
                            html! {
                                <div key={format!("{}-{}", name, file.size())} class="flex items-center justify-between px-3 py-2">
                                    <div class="text-sm truncate" title={name.clone()}>{ name.clone() }</div>
                                    <button
                                        type="button"
                                        class="inline-flex h-8 w-8 items-center justify-center rounded-lg text-[var(--muted)] hover:text-red-500"
                                        aria-label={t::REMOVE_FILE_ARIA}
                                        onclick={on_remove}
                                    >
                                        {"×"}
                                    </button>
                                </div>
                            }
                        }) }
                    }
                </div>
            </div>
        },
        ImportTab::Text => html! {
            <div class="space-y-3">
                <textarea
                    value={(*text_input).clone()}
                    oninput={on_text_input}
                    placeholder={t::TEXT_PLACEHOLDER}
                    class={classes!(field_class.clone(), "h-72", "font-mono")}
                />
                <div class="flex items-center gap-2">
                    <button type="button" class={small_button.clone()} onclick={on_format}>{ t::FORMAT_JSON }</button>
                    <button type="button" class={small_button.clone()} onclick={on_clear}>{ t::CLEAR }</button>
                </div>
            </div>
        },
        ImportTab::Example => html! {
            <div class="space-y-3">
                <pre class="w-full h-72 overflow-auto p-3 text-xs rounded-lg border border-[var(--border)] bg-[var(--surface-alt)]">
                    { (*template_text).clone() }
                </pre>
                <div class="flex items-center gap-2">
                    <button type="button" class="btn-fluent-primary text-sm" onclick={on_fill_text}>{ t::FILL_TO_TEXT }</button>
                    <button type="button" class={small_button.clone()} onclick={on_copy_template}>{ t::COPY_EXAMPLE }</button>
                </div>
            </div>
        },
    };

    let result_panel = match (*result).clone() {
        Some(response) => html! {
            <div class="space-y-2 text-sm border border-[var(--border)] rounded-lg p-3">
                <div>{ fill_one(t::IMPORTED_TEMPLATE, response.imported) }</div>
                if !response.failed.is_empty() {
                    <div class="border border-red-200 bg-red-50 rounded-lg p-3">
                        <div class="text-xs font-medium text-red-600">{ t::SOME_FAILED }</div>
                        <div class="mt-2 space-y-1 max-h-32 overflow-y-auto">
                            { for response.failed.iter().map(|failure| html! {
                                <div key={format!("{}-{}", failure.index, failure.error)} class="text-xs text-red-600">
                                    { failure.summary() }
                                </div>
                            }) }
                        </div>
                    </div>
                }
            </div>
        },
        None => Html::default(),
    };

    html! {
        <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/50">
            <div
                class="w-full max-w-3xl mx-4 max-h-[90vh] flex flex-col overflow-hidden rounded-xl border border-[var(--border)] bg-[var(--surface)] shadow-xl"
                role="dialog"
                aria-modal="true"
            >
                <div class="flex items-center justify-between px-6 py-4 border-b border-[var(--border)] shrink-0">
                    <h2 class="m-0 text-lg font-semibold">{ t::TITLE }</h2>
                    <button
                        type="button"
                        class="inline-flex h-8 w-8 items-center justify-center rounded text-[var(--muted)] disabled:opacity-50"
                        aria-label={t::CLOSE_ARIA}
                        disabled={*submitting}
                        onclick={close.clone()}
                    >
                        {"×"}
                    </button>
                </div>

                <div class="p-6 space-y-4 flex-1 overflow-y-auto">
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-3">
                        <label class="block text-sm font-medium">
                            <span class="block mb-2">{ t::PROVIDER }</span>
                            <select class={field_class.clone()} onchange={on_provider_change}>
                                { for ProviderImportKey::ALL.iter().map(|key| html! {
                                    <option key={key.as_str()} value={key.as_str()} selected={*key == *provider}>
                                        { key.label() }
                                    </option>
                                }) }
                            </select>
                        </label>
                        if props.can_list_groups {
                            <label class="block text-sm font-medium">
                                <span class="block mb-2">{ t::AUTH_GROUP }</span>
                                <select class={field_class.clone()} onchange={on_group_change}>
                                    <option value="" selected={selected_group.is_none()}>{ t::DEFAULT_GROUP }</option>
                                    { for props.auth_groups.iter().map(|group| html! {
                                        <option
                                            key={group.id.to_string()}
                                            value={group.id.to_string()}
                                            selected={*selected_group == Some(group.id)}
                                        >
                                            { group.name.clone() }
                                        </option>
                                    }) }
                                </select>
                            </label>
                        }
                    </div>

                    <div class="flex items-center gap-2">
                        { tab_button(ImportTab::File, t::TAB_FILE) }
                        { tab_button(ImportTab::Text, t::TAB_TEXT) }
                        { tab_button(ImportTab::Example, t::TAB_EXAMPLE) }
                    </div>

                    { tab_body }

                    if let Some(err) = (*error).clone() {
                        <div class="text-sm text-red-600">{ err }</div>
                    }

                    { result_panel }
                </div>

                <div class="flex gap-3 px-6 py-4 border-t border-[var(--border)] shrink-0">
                    <button type="button" class="btn-fluent-secondary flex-1" disabled={*submitting} onclick={close}>
                        { t::CANCEL }
                    </button>
                    <button
                        type="button"
                        class="btn-fluent-primary flex-1"
                        disabled={*submitting || *active_tab == ImportTab::Example}
                        onclick={on_import}
                    >
                        { if *submitting { t::IMPORTING } else { t::IMPORT } }
                    </button>
                </div>
            </div>
        </div>
    }
}
