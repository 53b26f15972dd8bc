mod history_vm;
mod session_vm;
mod time_fmt;

pub use history_vm::{ResultCardVm, map_result_cards};
pub use session_vm::{
    AnswerInputVm, OptionVm, PaletteItemVm, QuestionVm, ResultVm, SessionIntent, SessionOutcome,
    SessionVm, TimerVm,
};
pub use time_fmt::format_datetime;
