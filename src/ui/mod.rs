//! Terminal front end

pub mod app;
pub mod components;
pub mod events;
pub mod focus;
pub mod terminal_guard;

pub use app::App;
pub use events::AppEvent;
pub use terminal_guard::{install_panic_hook, TerminalGuard};
