mod footer;
pub mod palette;
mod section_view;
mod spinner;
mod success;
mod welcome;
mod wrap;

pub use footer::{Footer, FooterContext};
pub use section_view::{answered_count, SectionView};
pub use spinner::Spinner;
pub use success::SuccessScreen;
pub use welcome::{WelcomeScreen, WELCOME_TITLE};
