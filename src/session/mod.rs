pub mod setup;
pub mod tui_mode;

pub use setup::{Overrides, SessionData, resolve_config, setup_session};
pub use tui_mode::run_tui_mode;
