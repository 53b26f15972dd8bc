//! Built-in sample material used when the backend cannot supply a test.
//!
//! Every set is deterministic for a given module so a session started offline
//! always looks the same.

use ielts_core::model::{
    AnswerOption, GroupContent, ModuleKind, Question, QuestionGroup, QuestionId, QuestionSet,
    TestId,
};
use ielts_core::scoring::{TASK_1_MIN_WORDS, TASK_2_MIN_WORDS};
use tracing::error;

const GENERIC_QUESTION_COUNT: usize = 10;
const GENERIC_DURATION_MINUTES: u32 = 60;

/// Deterministic sample set for `module`.
#[must_use]
pub fn sample_set(module: ModuleKind, test_id: &TestId) -> QuestionSet {
    let (title, duration, groups) = match module {
        ModuleKind::Listening => ("Listening practice", None, listening_groups()),
        ModuleKind::Reading => ("Reading practice", None, reading_groups()),
        ModuleKind::Writing => ("Writing practice", None, writing_groups()),
        ModuleKind::Speaking => ("Speaking practice", None, speaking_groups()),
        ModuleKind::Generic => (
            "Practice test",
            Some(GENERIC_DURATION_MINUTES),
            generic_groups(),
        ),
    };
    QuestionSet::new(module, test_id.clone(), title, duration, groups).unwrap_or_else(|err| {
        error!(%module, %err, "built-in sample set is invalid");
        QuestionSet::placeholder(module, test_id.clone())
    })
}

fn abcd(texts: [&str; 4]) -> Vec<AnswerOption> {
    ["a", "b", "c", "d"]
        .into_iter()
        .zip(texts)
        .map(|(key, text)| AnswerOption::new(key, text))
        .collect()
}

fn listening_groups() -> Vec<QuestionGroup> {
    let section_1 = [
        ("What is the caller's surname?", ["Smith", "Smyth", "Schmidt", "Smithers"], "b"),
        ("Which day is the booking for?", ["Monday", "Tuesday", "Friday", "Saturday"], "c"),
        ("How many people will attend?", ["Two", "Four", "Six", "Eight"], "b"),
        ("Which room is available?", ["Garden room", "Main hall", "Studio", "Library"], "a"),
        ("How will the caller pay?", ["Cash", "Cheque", "Card", "Transfer"], "c"),
    ];
    let section_2 = [
        ("When was the museum founded?", ["1850", "1885", "1905", "1950"], "b"),
        ("What is on the ground floor?", ["Shop", "Cafe", "Maps", "Fossils"], "d"),
        ("Where should visitors leave bags?", ["Entrance", "Lockers", "Reception", "Car park"], "b"),
        ("Which tour is free?", ["Morning", "Afternoon", "Evening", "Weekend"], "a"),
        ("What is closed this month?", ["Roof garden", "East wing", "Cinema", "Archive"], "b"),
    ];
    vec![
        choice_group("Section 1", "l1", &section_1)
            .with_content(GroupContent::Audio {
                url: "audio/listening-section-1.mp3".into(),
            }),
        choice_group("Section 2", "l2", &section_2)
            .with_content(GroupContent::Audio {
                url: "audio/listening-section-2.mp3".into(),
            }),
    ]
}

fn reading_groups() -> Vec<QuestionGroup> {
    let passage_1 = [
        ("Why do honeybees dance?", ["To attract mates", "To share food locations", "To keep warm", "To scare predators"], "b"),
        ("The angle of the dance shows", ["distance", "direction", "quality", "danger"], "b"),
        ("Who first decoded the dance?", ["Darwin", "von Frisch", "Mendel", "Lorenz"], "b"),
    ];
    let passage_2 = [
        ("Early ships navigated mainly by", ["stars", "radio", "compass", "coastline"], "a"),
        ("The chronometer solved the problem of", ["latitude", "longitude", "depth", "speed"], "b"),
        ("Harrison's clock was tested on a voyage to", ["India", "Jamaica", "China", "Canada"], "b"),
    ];
    vec![
        choice_group("Passage 1", "r1", &passage_1).with_content(GroupContent::Passage {
            title: "The language of bees".into(),
            body: "Foraging honeybees return to the hive and perform a waggle dance. \
                   The angle of the dance relative to vertical indicates the direction \
                   of the food source relative to the sun, while its duration encodes \
                   distance. Karl von Frisch described the behaviour in detail."
                .into(),
        }),
        choice_group("Passage 2", "r2", &passage_2).with_content(GroupContent::Passage {
            title: "Finding longitude".into(),
            body: "Sailors could find latitude from the stars, but longitude needed an \
                   accurate clock. John Harrison's marine chronometer kept time on a \
                   voyage to Jamaica and finally made longitude measurable at sea."
                .into(),
        }),
    ]
}

fn writing_groups() -> Vec<QuestionGroup> {
    vec![
        QuestionGroup::new(
            "Task 1",
            vec![Question::essay(
                QuestionId::new("w1"),
                "The chart shows household energy use in three countries. Summarise the \
                 information by selecting and reporting the main features.",
                TASK_1_MIN_WORDS,
            )],
        ),
        QuestionGroup::new(
            "Task 2",
            vec![Question::essay(
                QuestionId::new("w2"),
                "Some people think children should start school as early as possible. \
                 To what extent do you agree or disagree?",
                TASK_2_MIN_WORDS,
            )],
        ),
    ]
}

fn speaking_groups() -> Vec<QuestionGroup> {
    vec![
        QuestionGroup::new(
            "Part 1",
            vec![
                Question::open(QuestionId::new("s1-1"), "Where do you live?"),
                Question::open(QuestionId::new("s1-2"), "Do you work or study?"),
            ],
        ),
        QuestionGroup::new(
            "Part 2",
            vec![Question::open(
                QuestionId::new("s2-1"),
                "Describe a journey you remember well.",
            )],
        )
        .with_content(GroupContent::CueCard {
            topic: "A memorable journey".into(),
            prompts: vec![
                "where you went".into(),
                "who you travelled with".into(),
                "why you remember it".into(),
            ],
        }),
        QuestionGroup::new(
            "Part 3",
            vec![
                Question::open(QuestionId::new("s3-1"), "Why do people travel more today?"),
                Question::open(QuestionId::new("s3-2"), "How might travel change in future?"),
            ],
        ),
    ]
}

fn generic_groups() -> Vec<QuestionGroup> {
    let questions = (1..=GENERIC_QUESTION_COUNT)
        .map(|n| {
            Question::choice(
                QuestionId::new(format!("g{n}")),
                format!("Sample question {n}: choose the best answer."),
                abcd(["Option A", "Option B", "Option C", "Option D"]),
                ["a", "b", "c", "d"][(n - 1) % 4],
            )
        })
        .collect();
    vec![QuestionGroup {
        label: None,
        content: None,
        questions,
    }]
}

fn choice_group(
    label: &str,
    prefix: &str,
    rows: &[(&str, [&str; 4], &str)],
) -> QuestionGroup {
    let questions = rows
        .iter()
        .enumerate()
        .map(|(index, (text, options, correct))| {
            Question::choice(
                QuestionId::new(format!("{prefix}-{}", index + 1)),
                *text,
                abcd(*options),
                *correct,
            )
        })
        .collect();
    QuestionGroup::new(label, questions)
}
