use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;
use crate::views::ViewError;

const APP_TITLE: &str = "IELTS Practice";

#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "{APP_TITLE}" }
        document::Meta {
            name: "description",
            content: "Timed IELTS listening, reading, writing and speaking practice tests.",
        }

        div { class: "app-root",
            PracticeErrorBoundary {
                Router::<Route> {}
            }
        }
    }
}

/// Catches render failures anywhere below it. The router lives inside, so
/// the way back is a plain link to the test list.
#[component]
fn PracticeErrorBoundary(children: Element) -> Element {
    rsx! {
        ErrorBoundary {
            handle_error: |errors: ErrorContext| rsx! {
                div { class: "fatal",
                    h1 { "{APP_TITLE}" }
                    p { class: "error", "{ViewError::Unknown.message()}" }
                    p { "Any test in progress was not submitted." }
                    a { href: "/", "Back to tests" }
                    details {
                        summary { "Details" }
                        pre { "{errors:?}" }
                    }
                }
            },
            {children}
        }
    }
}
