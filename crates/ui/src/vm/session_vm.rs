use ielts_core::countdown::format_clock;
use ielts_core::model::{GroupContent, NavigationTopology, Question, QuestionId, ScoringRule};
use ielts_core::scoring::word_count;
use services::{
    AssessmentSession, QuestionOrigin, SessionError, SessionLoopService, SessionPhase,
};

use crate::views::ViewError;
use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionIntent {
    /// Leave the start panel and begin the countdown.
    Start,
    Answer { id: QuestionId, value: String },
    Next,
    Prev,
    /// Flat question index, or part index for part-based modules.
    Jump(usize),
    Submit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    Continue,
    Submitted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub key: String,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerInputVm {
    Choice(Vec<OptionVm>),
    Essay { min_words: u32, words: u32 },
    Text,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub id: QuestionId,
    pub number: usize,
    pub text: String,
    pub value: String,
    pub input: AnswerInputVm,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteItemVm {
    pub index: usize,
    pub label: String,
    pub answered: bool,
    pub current: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerVm {
    pub label: String,
    pub is_low_time: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultVm {
    pub band_label: String,
    pub score_label: Option<String>,
    pub task_labels: Vec<String>,
    pub completed_at: String,
}

/// UI wrapper around a running assessment session.
pub struct SessionVm {
    session: AssessmentSession,
}

impl SessionVm {
    #[must_use]
    pub fn new(session: AssessmentSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &AssessmentSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut AssessmentSession {
        &mut self.session
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.session.question_set().title()
    }

    #[must_use]
    pub fn instructions(&self) -> &'static str {
        self.session.descriptor().instructions()
    }

    #[must_use]
    pub fn fallback_notice(&self) -> Option<&'static str> {
        (self.session.origin() == QuestionOrigin::Fallback)
            .then_some("This test could not be loaded, so you are practising with sample questions.")
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.session.question_set().total_questions()
    }

    /// Full allowance, shown before the countdown begins.
    #[must_use]
    pub fn duration_label(&self) -> String {
        format_clock(self.session.descriptor().duration_secs())
    }

    #[must_use]
    pub fn timer(&self) -> TimerVm {
        let progress = self.session.progress();
        TimerVm {
            label: format_clock(progress.remaining_secs),
            is_low_time: progress.is_low_time,
        }
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        let progress = self.session.progress();
        format!("{} of {} answered", progress.answered, progress.total)
    }

    #[must_use]
    pub fn group_label(&self) -> Option<String> {
        self.session.current_group().and_then(|group| group.label.clone())
    }

    #[must_use]
    pub fn group_content(&self) -> Option<GroupContent> {
        self.session.current_group().and_then(|group| group.content.clone())
    }

    fn is_part_based(&self) -> bool {
        self.session.descriptor().topology() == NavigationTopology::Parts
    }

    /// Questions shown at the cursor: one question, or a whole part.
    #[must_use]
    pub fn visible_questions(&self) -> Vec<QuestionVm> {
        if self.is_part_based() {
            let cursor = self.session.cursor();
            let offset: usize = self.session.question_set().group_sizes()[..cursor.group]
                .iter()
                .sum();
            return self
                .session
                .current_group()
                .map(|group| {
                    group
                        .questions
                        .iter()
                        .enumerate()
                        .map(|(index, question)| self.question_vm(question, offset + index + 1))
                        .collect()
                })
                .unwrap_or_default();
        }
        self.session
            .current_question()
            .map(|question| vec![self.question_vm(question, self.session.position() + 1)])
            .unwrap_or_default()
    }

    fn question_vm(&self, question: &Question, number: usize) -> QuestionVm {
        let value = self.session.answer(question.id()).unwrap_or_default().to_string();
        let input = if !question.options().is_empty() {
            AnswerInputVm::Choice(
                question
                    .options()
                    .iter()
                    .map(|option| OptionVm {
                        key: option.key.clone(),
                        text: option.text.clone(),
                        selected: value == option.key,
                    })
                    .collect(),
            )
        } else if let Some(min_words) = question.min_words() {
            AnswerInputVm::Essay {
                min_words,
                words: word_count(&value),
            }
        } else {
            AnswerInputVm::Text
        };
        QuestionVm {
            id: question.id().clone(),
            number,
            text: question.text().to_string(),
            value,
            input,
        }
    }

    /// Jump targets: every question, or every part for part-based modules.
    #[must_use]
    pub fn palette(&self) -> Vec<PaletteItemVm> {
        let set = self.session.question_set();
        let cursor = self.session.cursor();
        if self.is_part_based() {
            return set
                .groups()
                .iter()
                .enumerate()
                .map(|(index, group)| PaletteItemVm {
                    index,
                    label: group
                        .label
                        .clone()
                        .unwrap_or_else(|| format!("Part {}", index + 1)),
                    answered: group
                        .questions
                        .iter()
                        .any(|question| self.session.is_answered(question.id())),
                    current: index == cursor.group,
                })
                .collect();
        }
        let position = self.session.position();
        set.questions()
            .enumerate()
            .map(|(index, question)| PaletteItemVm {
                index,
                label: (index + 1).to_string(),
                answered: self.session.is_answered(question.id()),
                current: index == position,
            })
            .collect()
    }

    #[must_use]
    pub fn can_prev(&self) -> bool {
        self.session.is_in_progress() && !self.session.is_first()
    }

    #[must_use]
    pub fn can_next(&self) -> bool {
        self.session.is_in_progress() && !self.session.is_last()
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when an answer is rejected or the session
    /// cannot start.
    pub fn apply(
        &mut self,
        session_loop: &SessionLoopService,
        intent: SessionIntent,
    ) -> Result<SessionOutcome, ViewError> {
        match intent {
            SessionIntent::Start => match session_loop.start(&mut self.session) {
                Ok(()) | Err(SessionError::AlreadyStarted) => {}
                Err(_) => return Err(ViewError::Unknown),
            },
            SessionIntent::Answer { id, value } => {
                self.session
                    .set_answer(&id, value)
                    .map_err(|_| ViewError::Unknown)?;
            }
            SessionIntent::Next => {
                self.session.next();
            }
            SessionIntent::Prev => {
                self.session.prev();
            }
            SessionIntent::Jump(index) => {
                if self.is_part_based() {
                    self.session.jump_to(index, 0);
                } else {
                    self.session.jump_to_index(index);
                }
            }
            SessionIntent::Submit => {
                // the delivery task is detached; it logs its own outcome
                drop(session_loop.submit(&mut self.session));
            }
        }
        Ok(self.outcome())
    }

    /// One second elapsed.
    pub fn tick(&mut self, session_loop: &SessionLoopService) -> SessionOutcome {
        drop(session_loop.tick(&mut self.session));
        self.outcome()
    }

    fn outcome(&self) -> SessionOutcome {
        if self.session.is_submitted() {
            SessionOutcome::Submitted
        } else {
            SessionOutcome::Continue
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<ResultVm> {
        let result = self.session.result()?;
        let score_label = match self.session.descriptor().scoring() {
            ScoringRule::Objective => {
                Some(format!("{} / {} correct", result.correct(), result.total()))
            }
            ScoringRule::WordCount | ScoringRule::PartCoverage => None,
        };
        let task_labels = result
            .task_scores()
            .iter()
            .enumerate()
            .map(|(index, task)| {
                format!(
                    "Task {}: {} words (minimum {}) · band {:.1}",
                    index + 1,
                    task.words,
                    task.min_words,
                    task.band
                )
            })
            .collect();
        Some(ResultVm {
            band_label: format!("{:.1}", result.band()),
            score_label,
            task_labels,
            completed_at: format_datetime(result.completed_at()),
        })
    }
}
