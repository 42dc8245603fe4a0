// Module declarations
mod app;
pub mod components;
pub mod format;
pub mod glyphs;
pub mod input;
pub mod layout;
pub mod panels;
pub mod screen;
// Re-exports for external use
pub use app::{App, UIConfig, run};
