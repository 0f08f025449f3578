use yew::prelude::*;

use crate::i18n::current::{common, loading_spinner as t};

#[derive(Clone, PartialEq)]
pub enum SpinnerSize {
    Small,
    Medium,
}

impl SpinnerSize {
    fn dimension(&self) -> u32 {
        match self {
            SpinnerSize::Small => 18,
            SpinnerSize::Medium => 40,
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct LoadingSpinnerProps {
    #[prop_or(SpinnerSize::Medium)]
    pub size: SpinnerSize,
    /// Text rendered next to the spinner; screen readers get a generic label
    /// when absent.
    #[prop_or_default]
    pub label: Option<AttrValue>,
}

#[function_component(LoadingSpinner)]
pub fn loading_spinner(props: &LoadingSpinnerProps) -> Html {
    let spinner_style = format!("--spinner-size:{}px;", props.size.dimension());
    let padding = match props.size {
        SpinnerSize::Small => "p-0",
        SpinnerSize::Medium => "p-6",
    };

    html! {
        <div
            class={classes!("inline-flex", "items-center", "justify-center", "gap-2", padding)}
            role="status"
            aria-live="polite"
            aria-busy="true"
            aria-label={t::ARIA_LABEL}
        >
            <div
                style={spinner_style}
                class={classes!(
                    "w-[var(--spinner-size)]",
                    "h-[var(--spinner-size)]",
                    "rounded-full",
                    "border-[3px]",
                    "border-transparent",
                    "bg-[conic-gradient(var(--primary),transparent)]",
                    "[mask:radial-gradient(farthest-side,transparent_calc(100%-4px),#000_calc(100%-3px))]",
                    "animate-[spin_0.9s_linear_infinite]"
                )}
            />
            if let Some(label) = props.label.clone() {
                <span class={classes!("text-sm", "text-[var(--muted)]")}>{ label }</span>
            } else {
                <span class={classes!("sr-only")}>{ common::LOADING }</span>
            }
        </div>
    }
}
