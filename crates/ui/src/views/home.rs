use dioxus::prelude::*;
use dioxus_router::Link;
use ielts_core::model::{ModuleDescriptor, ModuleKind};

use crate::routes::Route;

const DEFAULT_TEST_ID: &str = "1";

#[component]
pub fn HomeView() -> Element {
    let mut test_id = use_signal(|| DEFAULT_TEST_ID.to_string());

    rsx! {
        div { class: "page",
            h2 { "Practice tests" }
            label {
                "Test number "
                input {
                    value: "{test_id}",
                    oninput: move |evt: FormEvent| test_id.set(evt.value()),
                }
            }
            div { class: "module-grid",
                for kind in ModuleKind::ALL {
                    ModuleCard { key: "{kind}", kind, test_id: test_id() }
                }
            }
        }
    }
}

#[component]
fn ModuleCard(kind: ModuleKind, test_id: String) -> Element {
    let descriptor = ModuleDescriptor::for_kind(kind);
    let minutes = descriptor.duration_secs() / 60;
    let test_id = if test_id.trim().is_empty() {
        DEFAULT_TEST_ID.to_string()
    } else {
        test_id.trim().to_string()
    };

    rsx! {
        div { class: "module-card",
            h3 { "{kind.title()}" }
            p { class: "duration", "{minutes} minutes" }
            p { "{descriptor.instructions()}" }
            Link {
                to: Route::Practice { module: kind.slug().to_string(), test_id },
                "Start"
            }
        }
    }
}
