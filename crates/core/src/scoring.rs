//! Turning answers into a band.
//!
//! All rules are pure functions of the question set and the answer record.
//! Bands are always clamped to `[0, 9]`.

use serde::{Deserialize, Serialize};

use crate::model::{AnswerRecord, QuestionId, QuestionSet, ScoringRule};

pub const MAX_BAND: f32 = 9.0;

/// Band credited for a writing task that exactly meets its minimum length.
const WRITING_BAND_AT_MINIMUM: f64 = 6.0;
/// Extra band available for exceeding the minimum.
const WRITING_LENGTH_BONUS: f64 = 1.5;
/// Ratio over the minimum at which the full bonus is reached.
const WRITING_BONUS_SPAN: f64 = 0.5;

pub const TASK_1_MIN_WORDS: u32 = 150;
pub const TASK_2_MIN_WORDS: u32 = 250;

/// Minimum length of the n-th writing task (zero based) when the test does
/// not state one. Task 1 asks for 150 words, every later task for 250.
#[must_use]
pub fn default_min_words(task_index: usize) -> u32 {
    if task_index == 0 {
        TASK_1_MIN_WORDS
    } else {
        TASK_2_MIN_WORDS
    }
}

/// Per-task band for word-count scored modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBand {
    pub question_id: QuestionId,
    pub words: u32,
    pub min_words: u32,
    pub band: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub correct: u32,
    pub total: u32,
    pub band: f32,
    pub tasks: Vec<TaskBand>,
}

/// Score a session according to the module's rule.
#[must_use]
pub fn score(rule: ScoringRule, set: &QuestionSet, answers: &AnswerRecord) -> ScoreBreakdown {
    let total = count_u32(set.total_questions());
    match rule {
        ScoringRule::Objective => {
            let correct = count_correct(set, answers);
            ScoreBreakdown {
                correct,
                total,
                band: ratio_band(correct, total),
                tasks: Vec::new(),
            }
        }
        ScoringRule::WordCount => {
            let tasks = writing_tasks(set, answers);
            let band = if tasks.is_empty() {
                0.0
            } else {
                let sum: f64 = tasks.iter().map(|task| f64::from(task.band)).sum();
                round_half(sum / tasks.len() as f64)
            };
            ScoreBreakdown {
                correct: 0,
                total,
                band: clamp_band(band),
                tasks,
            }
        }
        ScoringRule::PartCoverage => {
            let parts = count_u32(set.groups().len());
            let covered = count_u32(
                set.groups()
                    .iter()
                    .filter(|group| {
                        group.questions.iter().any(|question| {
                            answers
                                .get(question.id())
                                .is_some_and(|note| !note.trim().is_empty())
                        })
                    })
                    .count(),
            );
            ScoreBreakdown {
                correct: 0,
                total,
                band: ratio_band(covered, parts),
                tasks: Vec::new(),
            }
        }
    }
}

/// Questions whose recorded answer equals their correct option key.
///
/// Questions without a correct answer never count.
#[must_use]
pub fn count_correct(set: &QuestionSet, answers: &AnswerRecord) -> u32 {
    let correct = set
        .questions()
        .filter(|question| match question.correct_answer() {
            Some(expected) => answers.get(question.id()) == Some(expected),
            None => false,
        })
        .count();
    count_u32(correct)
}

/// `round(hits / total * 9, 1 decimal)`; zero when `total` is zero.
#[must_use]
pub fn ratio_band(hits: u32, total: u32) -> f32 {
    if total == 0 {
        return 0.0;
    }
    let raw = f64::from(hits) / f64::from(total) * f64::from(MAX_BAND);
    clamp_band((raw * 10.0).round() / 10.0)
}

/// Deterministic length heuristic for one writing task.
///
/// Below the minimum the band grows linearly up to 6.0; above it a bonus of up
/// to 1.5 is earned by the time the answer is 50% longer than required.
#[must_use]
pub fn writing_task_band(words: u32, min_words: u32) -> f32 {
    if words == 0 {
        return 0.0;
    }
    if min_words == 0 {
        return clamp_band(WRITING_BAND_AT_MINIMUM + WRITING_LENGTH_BONUS);
    }
    let ratio = f64::from(words) / f64::from(min_words);
    let raw = if ratio >= 1.0 {
        let bonus = ((ratio - 1.0) / WRITING_BONUS_SPAN).min(1.0);
        WRITING_BAND_AT_MINIMUM + WRITING_LENGTH_BONUS * bonus
    } else {
        WRITING_BAND_AT_MINIMUM * ratio
    };
    clamp_band(round_half(raw))
}

#[must_use]
pub fn word_count(text: &str) -> u32 {
    count_u32(text.split_whitespace().count())
}

fn writing_tasks(set: &QuestionSet, answers: &AnswerRecord) -> Vec<TaskBand> {
    set.questions()
        .filter_map(|question| {
            let min_words = question.min_words()?;
            let words = answers.get(question.id()).map_or(0, word_count);
            Some(TaskBand {
                question_id: question.id().clone(),
                words,
                min_words,
                band: writing_task_band(words, min_words),
            })
        })
        .collect()
}

fn round_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

#[allow(clippy::cast_possible_truncation)]
fn clamp_band(value: f64) -> f32 {
    value.clamp(0.0, f64::from(MAX_BAND)) as f32
}

fn count_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerOption, ModuleKind, Question, QuestionGroup, TestId};

    fn choice(id: &str, correct: &str) -> Question {
        Question::choice(
            QuestionId::new(id),
            "?",
            vec![AnswerOption::new("a", "A"), AnswerOption::new("b", "B")],
            correct,
        )
    }

    fn listening_2x2() -> QuestionSet {
        QuestionSet::new(
            ModuleKind::Listening,
            TestId::new("l1"),
            "Listening",
            None,
            vec![
                QuestionGroup::new("Section 1", vec![choice("1", "a"), choice("2", "b")]),
                QuestionGroup::new("Section 2", vec![choice("3", "a"), choice("4", "b")]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn listening_half_correct_is_band_four_and_a_half() {
        let set = listening_2x2();
        let mut answers = AnswerRecord::new();
        answers.insert(QuestionId::new("1"), "a");
        answers.insert(QuestionId::new("2"), "a");
        answers.insert(QuestionId::new("3"), "a");
        answers.insert(QuestionId::new("4"), "a");

        let score = score(ScoringRule::Objective, &set, &answers);
        assert_eq!(score.correct, 2);
        assert_eq!(score.total, 4);
        assert!((score.band - 4.5).abs() < f32::EPSILON);
    }

    #[test]
    fn unanswered_session_scores_zero() {
        let set = listening_2x2();
        let score = score(ScoringRule::Objective, &set, &AnswerRecord::new());
        assert_eq!(score.correct, 0);
        assert_eq!(score.total, 4);
        assert!(score.band.abs() < f32::EPSILON);
    }

    #[test]
    fn zero_total_does_not_divide() {
        assert!(ratio_band(0, 0).abs() < f32::EPSILON);
        assert!(ratio_band(5, 0).abs() < f32::EPSILON);
    }

    #[test]
    fn ratio_band_stays_in_range() {
        for total in 1..=40 {
            for hits in 0..=total {
                let band = ratio_band(hits, total);
                assert!((0.0..=MAX_BAND).contains(&band), "{hits}/{total} -> {band}");
            }
        }
        assert!((ratio_band(1, 3) - 3.0).abs() < f32::EPSILON);
        assert!((ratio_band(2, 3) - 6.0).abs() < f32::EPSILON);
        assert!((ratio_band(1, 7) - 1.3).abs() < 1e-6);
    }

    #[test]
    fn open_questions_never_count_as_correct() {
        let set = QuestionSet::new(
            ModuleKind::Generic,
            TestId::new("g"),
            "G",
            None,
            vec![QuestionGroup::new(
                "All",
                vec![Question::open(QuestionId::new("free"), "Say something"), choice("c", "a")],
            )],
        )
        .unwrap();
        let mut answers = AnswerRecord::new();
        answers.insert(QuestionId::new("free"), "anything");
        answers.insert(QuestionId::new("c"), "a");

        assert_eq!(count_correct(&set, &answers), 1);
    }

    #[test]
    fn writing_task_band_is_monotonic_in_length() {
        let mut previous = 0.0;
        for words in 0..=400 {
            let band = writing_task_band(words, 250);
            assert!(band >= previous, "{words} words dropped to {band}");
            previous = band;
        }
        assert!((writing_task_band(150, 150) - 6.0).abs() < f32::EPSILON);
        assert!((writing_task_band(225, 150) - 7.5).abs() < f32::EPSILON);
        assert!((writing_task_band(75, 150) - 3.0).abs() < f32::EPSILON);
        assert!(writing_task_band(0, 150).abs() < f32::EPSILON);
    }

    #[test]
    fn later_tasks_default_to_the_longer_minimum() {
        assert_eq!(default_min_words(0), 150);
        assert_eq!(default_min_words(1), 250);
        assert_eq!(default_min_words(2), 250);
    }

    #[test]
    fn writing_band_averages_tasks() {
        let set = QuestionSet::new(
            ModuleKind::Writing,
            TestId::new("w"),
            "Writing",
            None,
            vec![
                QuestionGroup::new("Task 1", vec![Question::essay(QuestionId::new("t1"), "Chart", 150)]),
                QuestionGroup::new("Task 2", vec![Question::essay(QuestionId::new("t2"), "Essay", 250)]),
            ],
        )
        .unwrap();
        let mut answers = AnswerRecord::new();
        answers.insert(QuestionId::new("t1"), vec!["word"; 150].join(" "));
        answers.insert(QuestionId::new("t2"), vec!["word"; 125].join(" "));

        let score = score(ScoringRule::WordCount, &set, &answers);
        assert_eq!(score.correct, 0);
        assert_eq!(score.total, 2);
        assert_eq!(score.tasks.len(), 2);
        assert_eq!(score.tasks[0].words, 150);
        assert!((score.tasks[1].band - 3.0).abs() < f32::EPSILON);
        assert!((score.band - 4.5).abs() < f32::EPSILON);
    }

    #[test]
    fn speaking_band_counts_parts_with_notes() {
        let set = QuestionSet::new(
            ModuleKind::Speaking,
            TestId::new("s"),
            "Speaking",
            None,
            vec![
                QuestionGroup::new("Part 1", vec![Question::open(QuestionId::new("p1"), "Intro")]),
                QuestionGroup::new("Part 2", vec![Question::open(QuestionId::new("p2"), "Cue card")]),
                QuestionGroup::new("Part 3", vec![Question::open(QuestionId::new("p3"), "Discussion")]),
            ],
        )
        .unwrap();
        let mut answers = AnswerRecord::new();
        answers.insert(QuestionId::new("p1"), "my notes");
        answers.insert(QuestionId::new("p2"), "   ");

        let score = score(ScoringRule::PartCoverage, &set, &answers);
        assert_eq!(score.correct, 0);
        assert_eq!(score.total, 3);
        assert!((score.band - 3.0).abs() < f32::EPSILON);
    }
}
