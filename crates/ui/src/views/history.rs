use dioxus::prelude::*;
use services::{DEFAULT_HISTORY_LIMIT, HistoryError};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ResultCardVm, map_result_cards};

#[derive(Clone, Debug, PartialEq)]
struct HistoryData {
    cards: Vec<ResultCardVm>,
}

#[component]
pub fn HistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let history = ctx.history();

    let resource = use_resource(move || {
        let history = history.clone();
        async move {
            let rows = history
                .recent(DEFAULT_HISTORY_LIMIT)
                .await
                .map_err(|err| match err {
                    HistoryError::SignedOut => ViewError::SignedOut,
                    _ => ViewError::Unknown,
                })?;
            Ok(HistoryData {
                cards: map_result_cards(&rows),
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "My results" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.cards.is_empty() {
                        p { "No results yet." }
                    } else {
                        ul { class: "results",
                            for card in data.cards {
                                ResultCard { card }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn ResultCard(card: ResultCardVm) -> Element {
    rsx! {
        li {
            p {
                strong { "{card.module_title}" }
                span { class: "result-test", " · test {card.test_id}" }
            }
            p {
                span { class: "result-band", "{card.band_label}" }
                span { class: "result-score", " ({card.score_label})" }
            }
            p { class: "result-date", "{card.completed_at_str}" }
        }
    }
}
