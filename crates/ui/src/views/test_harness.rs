use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use ielts_core::time::fixed_now;
use services::{
    AccountService, AppServices, Clock, ResultHistoryService, SessionLoopService,
};
use storage::repository::{InMemoryRepository, Storage};

use crate::context::{UiApp, build_app_context};
use crate::vm::SessionIntent;
use crate::views::session::SessionTestHandles;
use crate::views::{AccountPanel, HistoryView, HomeView, SessionView};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn session_loop(&self) -> Arc<SessionLoopService> {
        self.services.session_loop()
    }

    fn accounts(&self) -> Arc<AccountService> {
        self.services.accounts()
    }

    fn history(&self) -> Arc<ResultHistoryService> {
        self.services.history()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    History,
    Account,
    Session { module: String, test_id: String },
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    session_handles: SessionTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    use_context_provider(|| props.session_handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::History => rsx! { HistoryView {} },
        ViewKind::Account => rsx! { AccountPanel {} },
        ViewKind::Session { module, test_id } => rsx! { SessionView { module, test_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub repo: InMemoryRepository,
    pub session: SessionTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let pending resources settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    /// Let `secs` seconds of (paused) tokio time pass, driving the dom after each.
    pub async fn advance_secs(&mut self, secs: u64) {
        for _ in 0..secs {
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            self.drive_async().await;
        }
    }

    /// Send an intent through the mounted session view.
    pub async fn send(&mut self, intent: SessionIntent) {
        let dispatch = self.session.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        self.drive_async().await;
    }

    pub async fn retry_session(&mut self) {
        let retry = self.session.retry();
        self.dom.in_runtime(|| retry.call(()));
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.dom.in_runtime(|| self.session.is_ticking())
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_repo(view, InMemoryRepository::new())
}

pub fn setup_view_harness_with_repo(view: ViewKind, repo: InMemoryRepository) -> ViewHarness {
    let storage = Storage::from_in_memory(repo.clone());
    let services = AppServices::from_storage(&storage, Clock::fixed(fixed_now()));
    let app = Arc::new(TestApp { services });
    let session = SessionTestHandles::default();
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            session_handles: session.clone(),
        },
    );
    ViewHarness { dom, repo, session }
}
