mod account;
mod history;
mod home;
mod session;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use account::AccountPanel;
pub use history::HistoryView;
pub use home::HomeView;
pub use session::SessionView;
pub use state::{ViewError, ViewState, view_state_from_resource};
