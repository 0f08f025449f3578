use std::rc::Rc;

use cpab_shared::{
    copy::CopyOptions,
    copy_bus::ManualCopyPayload,
    manual_copy::{copy_shortcut_hint, ManualCopyAction, ManualCopyDialogState},
};
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

use crate::{
    clipboard::{copy_with_options, navigator_platform},
    hooks::use_copy_bus,
    i18n::current::manual_copy as t,
};

#[derive(Debug, Clone, Default, PartialEq)]
struct DialogModel(ManualCopyDialogState);

impl Reducible for DialogModel {
    type Action = ManualCopyAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = self.0.clone().apply(action);
        if next == self.0 {
            return self;
        }
        Rc::new(Self(next))
    }
}

/// Modal that takes over when every automatic copy tier failed.
///
/// Listens on the [`CopyFallbackBus`](cpab_shared::CopyFallbackBus) from
/// context. Mount it exactly once, next to the router in `App`; each mounted
/// instance opens its own dialog for the same payload.
#[function_component(ManualCopyDialogHost)]
pub fn manual_copy_dialog_host() -> Html {
    let bus = use_copy_bus();
    let dialog = use_reducer(DialogModel::default);
    let textarea_ref = use_node_ref();
    let shortcut = use_memo((), |_| copy_shortcut_hint(&navigator_platform()));

    {
        let dispatcher = dialog.dispatcher();
        use_effect_with(bus.clone(), move |bus| {
            let subscription = bus.subscribe(move |payload: &ManualCopyPayload| {
                dispatcher.dispatch(ManualCopyAction::Show(payload.clone()));
            });
            move || subscription.unsubscribe()
        });
    }

    {
        let textarea_ref = textarea_ref.clone();
        use_effect_with(dialog.0.payload().cloned(), move |payload| {
            if payload.is_some() {
                if let Some(textarea) = textarea_ref.cast::<HtmlTextAreaElement>() {
                    let _ = textarea.focus();
                    textarea.select();
                }
            }
            || ()
        });
    }

    let Some(payload) = dialog.0.payload().cloned() else {
        return Html::default();
    };

    let close = {
        let dispatcher = dialog.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(ManualCopyAction::Close))
    };

    let retry = {
        let dispatcher = dialog.dispatcher();
        let bus = bus.clone();
        let payload = payload.clone();
        Callback::from(move |_: MouseEvent| {
            let dispatcher = dispatcher.clone();
            let bus = bus.clone();
            let payload = payload.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let options = CopyOptions::retry_of(&payload.source);
                let result = copy_with_options(&payload.text, &options, &bus).await;
                dispatcher.dispatch(ManualCopyAction::RetryFinished(result));
            });
        })
    };

    html! {
        <div class={classes!("fixed", "inset-0", "z-[10000]", "flex", "items-center", "justify-center", "bg-black/50")}>
            <div
                class={classes!(
                    "w-full",
                    "max-w-xl",
                    "mx-4",
                    "rounded-xl",
                    "border",
                    "border-[var(--border)]",
                    "bg-[var(--surface)]",
                    "shadow-xl",
                    "overflow-hidden"
                )}
                role="dialog"
                aria-modal="true"
            >
                <div class={classes!("flex", "items-center", "justify-between", "px-6", "py-4", "border-b", "border-[var(--border)]")}>
                    <h2 class={classes!("m-0", "text-lg", "font-semibold", "text-[var(--text)]")}>{ t::TITLE }</h2>
                    <button
                        type="button"
                        class={classes!("inline-flex", "h-8", "w-8", "items-center", "justify-center", "rounded", "text-[var(--muted)]")}
                        aria-label={t::CLOSE}
                        onclick={close.clone()}
                    >
                        {"×"}
                    </button>
                </div>
                <div class={classes!("p-6", "space-y-4")}>
                    <p class={classes!("m-0", "text-sm", "text-[var(--muted)]")}>
                        { format!("{} ({})", t::SHORTCUT_HINT, *shortcut) }
                    </p>
                    <textarea
                        ref={textarea_ref}
                        readonly=true
                        rows="5"
                        value={payload.text.clone()}
                        class={classes!(
                            "w-full",
                            "rounded-lg",
                            "border",
                            "border-[var(--border)]",
                            "bg-[var(--surface-alt)]",
                            "px-3",
                            "py-2",
                            "text-sm",
                            "font-mono"
                        )}
                    />
                </div>
                <div class={classes!("flex", "justify-end", "gap-3", "px-6", "py-4", "border-t", "border-[var(--border)]")}>
                    <button type="button" class={classes!("btn-fluent-secondary")} onclick={close}>
                        { t::CLOSE }
                    </button>
                    <button type="button" class={classes!("btn-fluent-primary")} onclick={retry}>
                        { t::RETRY }
                    </button>
                </div>
            </div>
        </div>
    }
}
