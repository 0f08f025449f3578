use yew::prelude::*;
use yew_router::prelude::*;

use crate::{components::admin_nav::AdminNav, pages};

#[derive(Routable, Clone, PartialEq, Debug)]
pub enum Route {
    #[at("/")]
    Root,
    #[at("/admin")]
    Admin,
    #[at("/admin/auth-files")]
    AuthFiles,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(route: Route) -> Html {
    match route {
        Route::Root => html! { <Redirect<Route> to={Route::Admin} /> },
        Route::Admin => html! { <pages::admin_dashboard::AdminDashboardPage /> },
        Route::AuthFiles => html! { <pages::admin_auth_files::AdminAuthFilesPage /> },
        Route::NotFound => html! { <pages::not_found::NotFoundPage /> },
    }
}

#[function_component(AppRouter)]
pub fn app_router() -> Html {
    html! {
        <BrowserRouter>
            <div class="flex flex-col bg-[var(--bg)]" style="min-height: 100vh; min-height: 100svh;">
                <AdminNav />
                <div class="flex-1">
                    <Switch<Route> render={switch} />
                </div>
            </div>
        </BrowserRouter>
    }
}
