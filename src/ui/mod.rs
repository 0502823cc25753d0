pub mod reducer;
pub mod state;
pub mod timer;

pub use reducer::{Command, LOGIN_SUCCESS_BANNER, UiEvent, reduce};
pub use state::{Banner, ProgressLog, UiState};
pub use timer::BannerTimer;
