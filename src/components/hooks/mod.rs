pub mod use_random;
pub mod use_shortcuts;

pub use use_random::use_random_id_for;
pub use use_shortcuts::use_shortcuts;
