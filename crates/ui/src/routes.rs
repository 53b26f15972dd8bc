use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{AccountPanel, HistoryView, HomeView, SessionView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/practice/:module/:test_id", SessionView)] Practice { module: String, test_id: String },
        #[route("/history", HistoryView)] History {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "IELTS Practice" }
            ul {
                li { Link { to: Route::Home {}, "Tests" } }
                li { Link { to: Route::History {}, "My results" } }
            }
            AccountPanel {}
        }
    }
}
