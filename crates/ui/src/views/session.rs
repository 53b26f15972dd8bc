#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;
use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::Link;
use ielts_core::model::{GroupContent, ModuleKind, TestId};
use services::SessionPhase;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    AnswerInputVm, PaletteItemVm, QuestionVm, ResultVm, SessionIntent, SessionOutcome, SessionVm,
    TimerVm,
};

const TICK: Duration = Duration::from_secs(1);

/// Everything the page renders, copied out of the session so no signal
/// borrow is held while building the tree.
#[derive(Clone, Debug, PartialEq)]
struct SessionSnapshot {
    phase: SessionPhase,
    title: String,
    instructions: &'static str,
    notice: Option<&'static str>,
    question_count: usize,
    duration_label: String,
    timer: TimerVm,
    progress: String,
    group_label: Option<String>,
    content: Option<GroupContent>,
    questions: Vec<QuestionVm>,
    palette: Vec<PaletteItemVm>,
    can_prev: bool,
    can_next: bool,
    result: Option<ResultVm>,
}

impl SessionSnapshot {
    fn from_vm(vm: &SessionVm) -> Self {
        Self {
            phase: vm.phase(),
            title: vm.title().to_string(),
            instructions: vm.instructions(),
            notice: vm.fallback_notice(),
            question_count: vm.question_count(),
            duration_label: vm.duration_label(),
            timer: vm.timer(),
            progress: vm.progress_label(),
            group_label: vm.group_label(),
            content: vm.group_content(),
            questions: vm.visible_questions(),
            palette: vm.palette(),
            can_prev: vm.can_prev(),
            can_next: vm.can_next(),
            result: vm.result(),
        }
    }
}

#[component]
pub fn SessionView(module: String, test_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let session_loop = ctx.session_loop();
    let module = module.parse::<ModuleKind>().ok();
    let test_id = TestId::new(test_id);

    let vm = use_signal(|| None::<SessionVm>);
    let error = use_signal(|| None::<ViewError>);

    let loader = session_loop.clone();
    let mut resource = use_resource(move || {
        let session_loop = loader.clone();
        let test_id = test_id.clone();
        let mut vm = vm;
        async move {
            let module = module.ok_or(ViewError::UnknownModule)?;
            let session = session_loop.prepare(module, &test_id).await;
            vm.set(Some(SessionVm::new(session)));
            Ok::<_, ViewError>(())
        }
    });

    // Cancelled on unmount and on submit; ticks before Start are no-ops.
    let ticker = session_loop.clone();
    let mut timer = use_future(move || {
        let session_loop = ticker.clone();
        let mut vm = vm;
        async move {
            loop {
                tokio::time::sleep(TICK).await;
                let mut guard = vm.write();
                let Some(current) = guard.as_mut() else {
                    continue;
                };
                if current.tick(&session_loop) == SessionOutcome::Submitted {
                    break;
                }
            }
        }
    });

    let dispatch = {
        let session_loop = session_loop.clone();
        use_callback(move |intent: SessionIntent| {
            let mut vm = vm;
            let mut error = error;
            let applied = vm
                .write()
                .as_mut()
                .map(|current| current.apply(&session_loop, intent));
            match applied {
                Some(Ok(SessionOutcome::Submitted)) => {
                    error.set(None);
                    timer.cancel();
                }
                Some(Ok(SessionOutcome::Continue)) => error.set(None),
                Some(Err(err)) => error.set(Some(err)),
                None => {}
            }
        })
    };

    let retry = use_callback(move |()| {
        let mut vm = vm;
        vm.set(None);
        resource.restart();
        timer.restart();
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<SessionTestHandles>() {
                handles.register(dispatch, retry, timer);
            }
        }
    }

    let state = view_state_from_resource(&resource);
    let snapshot = vm.read().as_ref().map(SessionSnapshot::from_vm);

    rsx! {
        div { class: "page session",
            match (state, snapshot) {
                (ViewState::Error(err), _) => rsx! {
                    p { class: "error", "{err.message()}" }
                    Link { to: Route::Home {}, "Back to tests" }
                },
                (ViewState::Ready(()), Some(snapshot)) => rsx! {
                    if let Some(err) = error() {
                        p { class: "error", "{err.message()}" }
                    }
                    if snapshot.phase == SessionPhase::NotStarted {
                        StartPanel { snapshot, on_intent: dispatch }
                    } else {
                        SessionBody { snapshot, on_intent: dispatch, on_retry: retry }
                    }
                },
                (ViewState::Idle, _) => rsx! {},
                _ => rsx! {
                    p { "Loading questions..." }
                },
            }
        }
    }
}

#[component]
fn StartPanel(snapshot: SessionSnapshot, on_intent: Callback<SessionIntent>) -> Element {
    rsx! {
        div { class: "start-panel",
            h2 { "{snapshot.title}" }
            if let Some(notice) = snapshot.notice {
                p { class: "notice", "{notice}" }
            }
            ul { class: "test-facts",
                li { "{snapshot.question_count} questions" }
                li { "Time allowed: {snapshot.duration_label}" }
            }
            p { class: "instructions", "{snapshot.instructions}" }
            p { "The timer starts when you press Start and the test is submitted automatically when it runs out." }
            button {
                class: "start",
                onclick: move |_| on_intent.call(SessionIntent::Start),
                "Start test"
            }
        }
    }
}

#[component]
fn SessionBody(
    snapshot: SessionSnapshot,
    on_intent: Callback<SessionIntent>,
    on_retry: Callback<()>,
) -> Element {
    if let Some(result) = snapshot.result.clone() {
        return rsx! {
            ResultPanel { title: snapshot.title.clone(), result, on_retry }
        };
    }
    let in_progress = snapshot.phase == SessionPhase::InProgress;
    let timer_class = if snapshot.timer.is_low_time {
        "timer low-time"
    } else {
        "timer"
    };

    rsx! {
        header { class: "session-header",
            h2 { "{snapshot.title}" }
            span { class: "{timer_class}", "{snapshot.timer.label}" }
        }
        p { class: "instructions", "{snapshot.instructions}" }
        if let Some(notice) = snapshot.notice {
            p { class: "notice", "{notice}" }
        }
        p { class: "progress", "{snapshot.progress}" }

        if let Some(label) = snapshot.group_label.clone() {
            h3 { "{label}" }
        }
        if let Some(content) = snapshot.content.clone() {
            GroupContentPanel { content }
        }

        for question in snapshot.questions.clone() {
            QuestionCard { key: "{question.id}", question, on_intent, enabled: in_progress }
        }

        div { class: "palette",
            for item in snapshot.palette.clone() {
                button {
                    key: "{item.index}",
                    class: palette_class(&item),
                    disabled: !in_progress,
                    onclick: move |_| on_intent.call(SessionIntent::Jump(item.index)),
                    "{item.label}"
                }
            }
        }

        div { class: "nav-row",
            button {
                disabled: !snapshot.can_prev,
                onclick: move |_| on_intent.call(SessionIntent::Prev),
                "Previous"
            }
            button {
                disabled: !snapshot.can_next,
                onclick: move |_| on_intent.call(SessionIntent::Next),
                "Next"
            }
            button {
                class: "submit",
                disabled: !in_progress,
                onclick: move |_| on_intent.call(SessionIntent::Submit),
                "Submit test"
            }
        }
    }
}

fn palette_class(item: &PaletteItemVm) -> &'static str {
    if item.current {
        "current"
    } else if item.answered {
        "answered"
    } else {
        ""
    }
}

#[component]
fn GroupContentPanel(content: GroupContent) -> Element {
    match content {
        GroupContent::Audio { url } => rsx! {
            audio { controls: true, src: "{url}" }
        },
        GroupContent::Passage { title, body } => rsx! {
            article { class: "passage",
                h4 { "{title}" }
                p { "{body}" }
            }
        },
        GroupContent::CueCard { topic, prompts } => rsx! {
            div { class: "cue-card",
                h4 { "{topic}" }
                p { "You should say:" }
                ul {
                    for prompt in prompts {
                        li { "{prompt}" }
                    }
                }
            }
        },
    }
}

#[component]
fn QuestionCard(question: QuestionVm, on_intent: Callback<SessionIntent>, enabled: bool) -> Element {
    let QuestionVm {
        id,
        number,
        text,
        value,
        input,
    } = question;

    let field = match input {
        AnswerInputVm::Choice(options) => {
            let buttons = options.into_iter().map(|option| {
                let id = id.clone();
                let key = option.key.clone();
                rsx! {
                    button {
                        key: "{option.key}",
                        class: if option.selected { "option selected" } else { "option" },
                        disabled: !enabled,
                        onclick: move |_| {
                            on_intent.call(SessionIntent::Answer {
                                id: id.clone(),
                                value: key.clone(),
                            });
                        },
                        "{option.key}. {option.text}"
                    }
                }
            });
            rsx! { div { class: "options", {buttons} } }
        }
        AnswerInputVm::Essay { min_words, words } => {
            let id = id.clone();
            rsx! {
                textarea {
                    value: "{value}",
                    disabled: !enabled,
                    oninput: move |evt: FormEvent| {
                        on_intent.call(SessionIntent::Answer {
                            id: id.clone(),
                            value: evt.value(),
                        });
                    },
                }
                p { class: "word-count", "{words} words (minimum {min_words})" }
            }
        }
        AnswerInputVm::Text => {
            let id = id.clone();
            rsx! {
                input {
                    value: "{value}",
                    disabled: !enabled,
                    oninput: move |evt: FormEvent| {
                        on_intent.call(SessionIntent::Answer {
                            id: id.clone(),
                            value: evt.value(),
                        });
                    },
                }
            }
        }
    };

    rsx! {
        section { class: "question",
            p { strong { "{number}. " } "{text}" }
            {field}
        }
    }
}

#[component]
fn ResultPanel(title: String, result: ResultVm, on_retry: Callback<()>) -> Element {
    rsx! {
        div { class: "result",
            h2 { "{title}: submitted" }
            p { "Band" }
            p { class: "band", "{result.band_label}" }
            if let Some(score) = result.score_label.clone() {
                p { class: "score", "{score}" }
            }
            ul {
                for task in result.task_labels.clone() {
                    li { "{task}" }
                }
            }
            p { class: "completed-at", "Completed {result.completed_at}" }
            div { class: "nav-row",
                button { onclick: move |_| on_retry.call(()), "Try again" }
                Link { to: Route::History {}, "My results" }
                Link { to: Route::Home {}, "All tests" }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SessionTestHandles {
    dispatch: Rc<RefCell<Option<Callback<SessionIntent>>>>,
    retry: Rc<RefCell<Option<Callback<()>>>>,
    timer: Rc<RefCell<Option<UseFuture>>>,
}

#[cfg(test)]
impl SessionTestHandles {
    fn register(&self, dispatch: Callback<SessionIntent>, retry: Callback<()>, timer: UseFuture) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.retry.borrow_mut() = Some(retry);
        *self.timer.borrow_mut() = Some(timer);
    }

    pub(crate) fn dispatch(&self) -> Callback<SessionIntent> {
        (*self.dispatch.borrow()).expect("session dispatch registered")
    }

    pub(crate) fn retry(&self) -> Callback<()> {
        (*self.retry.borrow()).expect("session retry registered")
    }

    /// Whether the ticker future is still scheduled.
    pub(crate) fn is_ticking(&self) -> bool {
        let timer = (*self.timer.borrow()).expect("session timer registered");
        matches!(timer.state().cloned(), UseFutureState::Pending)
    }
}
