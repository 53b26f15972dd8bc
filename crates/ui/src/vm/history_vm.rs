use storage::repository::ResultSummary;

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultCardVm {
    pub module_title: &'static str,
    pub test_id: String,
    pub band_label: String,
    pub score_label: String,
    pub completed_at_str: String,
}

#[must_use]
pub fn map_result_cards(rows: &[ResultSummary]) -> Vec<ResultCardVm> {
    rows.iter()
        .map(|row| ResultCardVm {
            module_title: row.module.title(),
            test_id: row.test_id.to_string(),
            band_label: format!("Band {:.1}", row.score),
            score_label: format!("{} / {}", row.correct_answers, row.total_questions),
            completed_at_str: format_datetime(row.completed_at),
        })
        .collect()
}
