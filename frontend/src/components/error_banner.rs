use yew::prelude::*;
use yew_hooks::prelude::use_timeout;

use crate::i18n::current::error_banner as t;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BannerTone {
    #[default]
    Error,
    Notice,
}

impl BannerTone {
    fn title(self) -> &'static str {
        match self {
            Self::Error => t::TITLE,
            Self::Notice => t::NOTICE_TITLE,
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Error => "fa-triangle-exclamation",
            Self::Notice => "fa-circle-check",
        }
    }

    fn palette(self) -> &'static str {
        match self {
            Self::Error => "border-red-200 bg-red-50 text-red-700",
            Self::Notice => "border-green-200 bg-green-50 text-green-700",
        }
    }

    /// Notices fade by themselves; errors stay until dismissed.
    fn auto_dismiss_ms(self) -> u32 {
        match self {
            Self::Error => 0,
            Self::Notice => 3000,
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ErrorBannerProps {
    pub message: String,
    #[prop_or_default]
    pub tone: BannerTone,
    /// The parent owns visibility and drops the banner on close.
    pub on_close: Callback<()>,
}

#[function_component(ErrorBanner)]
pub fn error_banner(props: &ErrorBannerProps) -> Html {
    let auto_ms = props.tone.auto_dismiss_ms();
    let timeout = {
        let on_close = props.on_close.clone();
        use_timeout(move || on_close.emit(()), auto_ms)
    };

    {
        let timeout = timeout.clone();
        use_effect_with(props.message.clone(), move |_| {
            if auto_ms > 0 {
                timeout.reset();
            } else {
                timeout.cancel();
            }
            || ()
        });
    }

    if props.message.trim().is_empty() {
        return Html::default();
    }

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let role = match props.tone {
        BannerTone::Error => "alert",
        BannerTone::Notice => "status",
    };

    html! {
        <div
            class={classes!(
                "flex", "items-start", "gap-3", "w-80", "max-w-full",
                "rounded-xl", "border", "px-4", "py-3", "text-sm", "shadow-lg",
                props.tone.palette()
            )}
            role={role}
        >
            <i class={classes!("fas", props.tone.icon(), "mt-0.5")} aria-hidden="true"></i>
            <div class="flex-1 min-w-0">
                <p class="m-0 font-semibold">{ props.tone.title() }</p>
                <p class="m-0 break-words">{ props.message.clone() }</p>
            </div>
            <button
                type="button"
                class="inline-flex h-6 w-6 items-center justify-center rounded-full hover:bg-black/10"
                aria-label={t::CLOSE_ARIA}
                onclick={close}
            >
                {"×"}
            </button>
        </div>
    }
}
