//! Wire payloads of the REST API and their mapping onto the domain model.
//!
//! The backend names its groups differently per module (`sections`,
//! `passages`, `parts`) and sometimes wraps the body in a `data` envelope.
//! Everything is normalised here so the rest of the crate only sees
//! validated `QuestionSet`s.

use ielts_core::model::{
    AnswerOption, GroupContent, ModuleKind, Question, QuestionGroup, QuestionId, QuestionSet,
    TestId,
};
use ielts_core::scoring::default_min_words;
use serde::Deserialize;

use crate::repository::{ResultSummary, StorageError, UserProfile};

fn invalid<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::InvalidPayload(e.to_string())
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } | Envelope::Bare(data) => data,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Number(u64),
}

impl IdValue {
    fn into_string(self) -> String {
        match self {
            IdValue::Text(text) => text,
            IdValue::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionSetPayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, alias = "duration")]
    duration_minutes: Option<u32>,
    #[serde(default, alias = "sections", alias = "passages", alias = "parts")]
    groups: Vec<GroupPayload>,
    /// Flat tests list their questions at the top level.
    #[serde(default)]
    questions: Vec<QuestionPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupPayload {
    #[serde(default, alias = "title", alias = "name")]
    label: Option<String>,
    #[serde(default, alias = "audio")]
    audio_url: Option<String>,
    #[serde(default)]
    passage: Option<PassagePayload>,
    #[serde(default)]
    cue_card: Option<CueCardPayload>,
    #[serde(default)]
    questions: Vec<QuestionPayload>,
}

#[derive(Debug, Deserialize)]
struct PassagePayload {
    #[serde(default)]
    title: String,
    #[serde(alias = "text", alias = "content")]
    body: String,
}

#[derive(Debug, Deserialize)]
struct CueCardPayload {
    topic: String,
    #[serde(default)]
    prompts: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionPayload {
    #[serde(alias = "_id")]
    id: IdValue,
    #[serde(alias = "question", alias = "prompt")]
    text: String,
    #[serde(default)]
    options: Vec<OptionPayload>,
    #[serde(default, alias = "answer", alias = "correct")]
    correct_answer: Option<String>,
    #[serde(default)]
    min_words: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OptionPayload {
    #[serde(alias = "id")]
    key: String,
    text: String,
}

impl QuestionPayload {
    fn into_question(self) -> Question {
        Question::from_parts(
            QuestionId::new(self.id.into_string()),
            self.text,
            self.options
                .into_iter()
                .map(|option| AnswerOption::new(option.key, option.text))
                .collect(),
            self.correct_answer.filter(|key| !key.trim().is_empty()),
            self.min_words,
        )
    }
}

impl QuestionSetPayload {
    /// Writing tasks without a stated minimum get the standard one for
    /// their position in the test.
    fn fill_task_minimums(&mut self) {
        let tasks = self
            .groups
            .iter_mut()
            .flat_map(|group| group.questions.iter_mut())
            .chain(self.questions.iter_mut());
        for (index, task) in tasks.enumerate() {
            task.min_words.get_or_insert(default_min_words(index));
        }
    }
}

impl GroupPayload {
    fn into_group(self) -> QuestionGroup {
        let content = if let Some(url) = self.audio_url {
            Some(GroupContent::Audio { url })
        } else if let Some(passage) = self.passage {
            Some(GroupContent::Passage {
                title: passage.title,
                body: passage.body,
            })
        } else {
            self.cue_card.map(|card| GroupContent::CueCard {
                topic: card.topic,
                prompts: card.prompts,
            })
        };
        QuestionGroup {
            label: self.label,
            content,
            questions: self
                .questions
                .into_iter()
                .map(QuestionPayload::into_question)
                .collect(),
        }
    }
}

/// Decode a question-set response body.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON and
/// `StorageError::InvalidPayload` when the set is empty or fails validation.
pub fn parse_question_set(
    module: ModuleKind,
    test_id: &TestId,
    body: &str,
) -> Result<QuestionSet, StorageError> {
    let mut payload = serde_json::from_str::<Envelope<QuestionSetPayload>>(body)
        .map_err(|e| StorageError::Serialization(e.to_string()))?
        .into_inner();
    if module == ModuleKind::Writing {
        payload.fill_task_minimums();
    }

    let mut groups: Vec<QuestionGroup> = payload
        .groups
        .into_iter()
        .map(GroupPayload::into_group)
        .collect();
    if groups.is_empty() && !payload.questions.is_empty() {
        groups.push(QuestionGroup {
            label: None,
            content: None,
            questions: payload
                .questions
                .into_iter()
                .map(QuestionPayload::into_question)
                .collect(),
        });
    }
    if groups.iter().all(QuestionGroup::is_empty) {
        return Err(StorageError::InvalidPayload("no questions".into()));
    }

    let title = payload
        .title
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| format!("{} {test_id}", module.title()));

    QuestionSet::new(
        module,
        test_id.clone(),
        title,
        payload.duration_minutes.filter(|minutes| *minutes > 0),
        groups,
    )
    .map_err(invalid)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResultListPayload {
    Keyed { results: Vec<ResultSummary> },
    List(Vec<ResultSummary>),
}

/// Decode a result-history response body.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON.
pub(crate) fn parse_result_list(body: &str) -> Result<Vec<ResultSummary>, StorageError> {
    let payload = serde_json::from_str::<Envelope<ResultListPayload>>(body)
        .map_err(|e| StorageError::Serialization(e.to_string()))?
        .into_inner();
    Ok(match payload {
        ResultListPayload::Keyed { results } | ResultListPayload::List(results) => results,
    })
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UserPayload {
    Keyed { user: UserProfile },
    Bare(UserProfile),
}

/// Decode the `auth/me` body.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON.
pub(crate) fn parse_user(body: &str) -> Result<UserProfile, StorageError> {
    let payload = serde_json::from_str::<Envelope<UserPayload>>(body)
        .map_err(|e| StorageError::Serialization(e.to_string()))?
        .into_inner();
    Ok(match payload {
        UserPayload::Keyed { user } | UserPayload::Bare(user) => user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::UserRole;

    #[test]
    fn listening_sections_keep_order_and_audio() {
        let body = r#"{
            "title": "Cambridge 18 Test 1",
            "sections": [
                { "title": "Section 1", "audioUrl": "https://cdn/a1.mp3",
                  "questions": [
                    { "id": 1, "question": "Name?", "options": [{"id": "a", "text": "Ann"}], "answer": "a" },
                    { "id": 2, "question": "Age?" }
                  ] },
                { "title": "Section 2", "audioUrl": "https://cdn/a2.mp3",
                  "questions": [{ "id": 3, "question": "Where?" }] }
            ]
        }"#;

        let set = parse_question_set(ModuleKind::Listening, &TestId::new("18-1"), body).unwrap();
        assert_eq!(set.title(), "Cambridge 18 Test 1");
        assert_eq!(set.group_sizes(), vec![2, 1]);
        assert_eq!(set.groups()[0].label.as_deref(), Some("Section 1"));
        assert_eq!(
            set.groups()[1].content,
            Some(GroupContent::Audio {
                url: "https://cdn/a2.mp3".into()
            })
        );
        let first = set.question_at(0, 0).unwrap();
        assert_eq!(first.id().as_str(), "1");
        assert_eq!(first.correct_answer(), Some("a"));
        assert_eq!(first.options()[0].key, "a");
    }

    #[test]
    fn passages_and_parts_are_accepted_group_keys() {
        let reading = r#"{ "data": { "passages": [
            { "title": "Passage 1", "passage": { "title": "Bees", "text": "Bees dance." },
              "questions": [{ "_id": "r1", "text": "Why?" }] }
        ] } }"#;
        let set = parse_question_set(ModuleKind::Reading, &TestId::new("r"), reading).unwrap();
        assert!(matches!(
            set.groups()[0].content,
            Some(GroupContent::Passage { ref body, .. }) if body == "Bees dance."
        ));
        assert_eq!(set.title(), "Reading r");

        let speaking = r#"{ "parts": [
            { "name": "Part 2", "cueCard": { "topic": "A trip", "prompts": ["where", "when"] },
              "questions": [{ "id": "s2", "prompt": "Talk about a trip" }] }
        ] }"#;
        let set = parse_question_set(ModuleKind::Speaking, &TestId::new("s"), speaking).unwrap();
        assert!(matches!(set.groups()[0].content, Some(GroupContent::CueCard { .. })));
    }

    #[test]
    fn writing_tasks_without_minimums_get_standard_ones() {
        let body = r#"{ "parts": [
            { "title": "Task 1", "questions": [{ "id": "w1", "prompt": "Describe the chart" }] },
            { "title": "Task 2", "questions": [{ "id": "w2", "prompt": "Discuss", "minWords": 300 }] },
            { "title": "Task 3", "questions": [{ "id": "w3", "prompt": "Argue" }] }
        ] }"#;
        let set = parse_question_set(ModuleKind::Writing, &TestId::new("w"), body).unwrap();
        let minimums: Vec<_> = set.questions().map(Question::min_words).collect();
        assert_eq!(minimums, vec![Some(150), Some(300), Some(250)]);

        let mut answers = ielts_core::model::AnswerRecord::new();
        answers.insert(QuestionId::new("w1"), vec!["word"; 300].join(" "));
        answers.insert(QuestionId::new("w2"), vec!["word"; 300].join(" "));
        let breakdown = ielts_core::scoring::score(
            ielts_core::model::ScoringRule::WordCount,
            &set,
            &answers,
        );
        assert_eq!(breakdown.tasks.len(), 3);
        assert!(breakdown.band > 0.0, "essays scored band {}", breakdown.band);
    }

    #[test]
    fn minimums_are_only_filled_for_writing() {
        let body = r#"{ "questions": [{ "id": "g1", "text": "Free text" }] }"#;
        let set = parse_question_set(ModuleKind::Generic, &TestId::new("g"), body).unwrap();
        assert_eq!(set.question_at(0, 0).unwrap().min_words(), None);
    }

    #[test]
    fn flat_questions_become_one_group() {
        let body = r#"{ "duration": 20, "questions": [
            { "id": "g1", "text": "One", "correctAnswer": "b" },
            { "id": "g2", "text": "Two", "correctAnswer": "" }
        ] }"#;
        let set = parse_question_set(ModuleKind::Generic, &TestId::new("g"), body).unwrap();
        assert_eq!(set.groups().len(), 1);
        assert_eq!(set.duration_minutes(), Some(20));
        assert!(set.groups()[0].label.is_none());
        assert!(!set.question_at(0, 1).unwrap().is_auto_scored());
    }

    #[test]
    fn empty_or_malformed_payloads_are_errors() {
        let test_id = TestId::new("x");
        assert!(matches!(
            parse_question_set(ModuleKind::Reading, &test_id, r#"{ "passages": [] }"#),
            Err(StorageError::InvalidPayload(_))
        ));
        assert!(matches!(
            parse_question_set(ModuleKind::Reading, &test_id, r#"{ "passages": [{ "questions": [] }] }"#),
            Err(StorageError::InvalidPayload(_))
        ));
        assert!(matches!(
            parse_question_set(ModuleKind::Reading, &test_id, "<html>"),
            Err(StorageError::Serialization(_))
        ));
        assert!(matches!(
            parse_question_set(
                ModuleKind::Reading,
                &test_id,
                r#"{ "questions": [{ "id": 1, "text": "a" }, { "id": 1, "text": "b" }] }"#
            ),
            Err(StorageError::InvalidPayload(_))
        ));
    }

    #[test]
    fn result_lists_accept_keyed_and_bare_forms() {
        let row = r#"{ "testId": "7", "module": "reading", "totalQuestions": 40,
                       "correctAnswers": 30, "band": 6.8, "completedAt": "2024-05-01T10:00:00Z" }"#;
        let keyed = parse_result_list(&format!(r#"{{ "results": [{row}] }}"#)).unwrap();
        let bare = parse_result_list(&format!("[{row}]")).unwrap();
        assert_eq!(keyed, bare);
        assert_eq!(keyed[0].correct_answers, 30);
        assert!((keyed[0].score - 6.8).abs() < 1e-6);
    }

    #[test]
    fn user_payload_may_be_wrapped() {
        let user = parse_user(r#"{ "user": { "_id": "u1", "name": "Ana", "role": "admin" } }"#)
            .unwrap();
        assert_eq!(user.id.as_str(), "u1");
        assert_eq!(user.role, UserRole::Admin);
        assert!(user.email.is_empty());
    }
}
