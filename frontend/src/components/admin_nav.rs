use yew::prelude::*;
use yew_router::prelude::*;

use crate::{
    components::version_update_button::VersionUpdateButton, i18n::current::nav as t, router::Route,
};

/// Sticky top bar shared by every admin page.
#[function_component(AdminNav)]
pub fn admin_nav() -> Html {
    let route = use_route::<Route>();

    let nav_items = [
        (t::DASHBOARD, Route::Admin, "fa-gauge"),
        (t::AUTH_FILES, Route::AuthFiles, "fa-key"),
    ];

    html! {
        <header class={classes!(
            "sticky", "top-0", "left-0", "right-0", "z-[80]", "w-full",
            "border-b", "border-[var(--border)]", "bg-[var(--surface)]"
        )}>
            <div class={classes!(
                "flex", "items-center", "gap-4", "h-14",
                "max-w-7xl", "mx-auto", "px-4", "sm:px-6", "lg:px-8"
            )}>
                <Link<Route> to={Route::Admin} classes="brand-logo font-bold text-lg">
                    { t::BRAND_NAME }
                </Link<Route>>

                <nav class={classes!("flex", "items-center", "gap-1")} aria-label={t::NAV_ARIA}>
                    { for nav_items.iter().map(|(label, target, icon)| {
                        let active = route.as_ref() == Some(target);
                        html! {
                            <Link<Route> to={target.clone()} classes={classes!(
                                "inline-flex", "items-center", "gap-2",
                                "h-9", "px-3", "rounded-lg", "text-sm",
                                "transition-colors", "duration-200",
                                "hover:text-[var(--primary)]",
                                "hover:bg-[var(--surface-alt)]",
                                if active { "text-[var(--primary)] bg-[var(--surface-alt)]" } else { "text-[var(--muted)]" }
                            )}>
                                <i class={classes!("fas", *icon)} aria-hidden="true"></i>
                                <span>{ *label }</span>
                            </Link<Route>>
                        }
                    }) }
                </nav>

                <div class={classes!("ml-auto", "flex", "items-center", "gap-2")}>
                    <VersionUpdateButton />
                </div>
            </div>
        </header>
    }
}
