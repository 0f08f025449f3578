use yew::prelude::*;
use yew_router::prelude::*;

use crate::{i18n::current::not_found as t, router::Route};

#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
    html! {
        <main class="max-w-7xl mx-auto px-4 py-16 text-center space-y-4">
            <h2 class="m-0 text-2xl font-bold">{ t::TITLE }</h2>
            <p class="m-0 text-[var(--muted)]">{ t::BODY }</p>
            <Link<Route> to={Route::Admin} classes="btn-fluent-secondary">{ t::BACK }</Link<Route>>
        </main>
    }
}
