use yew::prelude::*;

use crate::{
    components::admin_transactions_table::AdminTransactionsTable,
    i18n::current::dashboard as t,
};

#[function_component(AdminDashboardPage)]
pub fn admin_dashboard_page() -> Html {
    html! {
        <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-6 space-y-6">
            <div>
                <h1 class="m-0 text-2xl font-bold">{ t::TITLE }</h1>
                <p class="m-0 mt-1 text-sm text-[var(--muted)]">{ t::SUBTITLE }</p>
            </div>
            <AdminTransactionsTable />
        </main>
    }
}
