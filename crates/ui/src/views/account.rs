use dioxus::prelude::*;
use storage::repository::UserProfile;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn AccountPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let accounts = ctx.accounts();

    let loader = accounts.clone();
    let mut resource = use_resource(move || {
        let accounts = loader.clone();
        async move {
            accounts
                .load()
                .await
                .map_err(|_| ViewError::Unknown)
        }
    });

    let sign_out = use_callback(move |()| {
        let accounts = accounts.clone();
        spawn(async move {
            // local state is cleared even when the backend call fails
            let _ = accounts.logout().await;
            resource.restart();
        });
    });

    let state: ViewState<Option<UserProfile>> = view_state_from_resource(&resource);

    rsx! {
        div { class: "account",
            match state {
                ViewState::Ready(Some(user)) => rsx! {
                    p { "Signed in as {user.name}" }
                    button { onclick: move |_| sign_out.call(()), "Sign out" }
                },
                ViewState::Ready(None) | ViewState::Error(_) => rsx! {
                    p { "Not signed in" }
                },
                ViewState::Idle | ViewState::Loading => rsx! {},
            }
        }
    }
}
