pub mod button;
pub mod card;
pub mod dialog;
pub mod glyph;
pub mod input;
pub mod spinner;

// Re-export component symbols so callers can `use crate::components::ui::Button` etc.
pub use button::*;
pub use card::*;
pub use dialog::*;
pub use glyph::*;
pub use input::*;
pub use spinner::*;
