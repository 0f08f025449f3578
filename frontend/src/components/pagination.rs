use yew::prelude::*;

use crate::i18n::{current::pagination as t, fill_two};

#[derive(Properties, PartialEq)]
pub struct PaginationProps {
    pub current_page: usize,
    pub total_pages: usize,
    pub on_page_change: Callback<usize>,
    /// Locks both arrows, e.g. while a page is loading.
    #[prop_or(false)]
    pub disabled: bool,
}

/// Previous / "Page x of y" / next.
#[function_component(Pagination)]
pub fn pagination(props: &PaginationProps) -> Html {
    let total_pages = props.total_pages.max(1);
    let current_page = props.current_page.clamp(1, total_pages);

    let step = |target: Option<usize>| {
        let on_page_change = props.on_page_change.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(target) = target {
                on_page_change.emit(target);
            }
        })
    };
    let prev = current_page.checked_sub(1).filter(|page| *page >= 1);
    let next = Some(current_page + 1).filter(|page| *page <= total_pages);

    let arrow_classes = classes!(
        "inline-flex",
        "h-9",
        "w-9",
        "items-center",
        "justify-center",
        "rounded-lg",
        "border",
        "border-[var(--border)]",
        "bg-[var(--surface)]",
        "transition-colors",
        "hover:border-[var(--primary)]",
        "hover:text-[var(--primary)]",
        "disabled:opacity-50",
        "disabled:cursor-not-allowed"
    );

    html! {
        <nav class="flex items-center gap-3" aria-label={t::ARIA_NAV}>
            <button
                type="button"
                class={arrow_classes.clone()}
                disabled={props.disabled || prev.is_none()}
                onclick={step(prev)}
                aria-label={t::ARIA_PREV}
            >
                <i class="fas fa-chevron-left text-xs" aria-hidden="true"></i>
            </button>
            <span class="text-sm text-[var(--muted)] tabular-nums" aria-current="page">
                { fill_two(t::PAGE_OF_TEMPLATE, current_page, total_pages) }
            </span>
            <button
                type="button"
                class={arrow_classes}
                disabled={props.disabled || next.is_none()}
                onclick={step(next)}
                aria-label={t::ARIA_NEXT}
            >
                <i class="fas fa-chevron-right text-xs" aria-hidden="true"></i>
            </button>
        </nav>
    }
}
