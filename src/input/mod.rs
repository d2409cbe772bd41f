//! Interactive input collection

pub mod collector;
pub mod prompt;
pub mod validation;

pub use collector::{collect_request, CollectMode};
pub use prompt::{Field, Prompter, DEFAULT_MAX_ATTEMPTS};
pub use validation::{is_playlist_link, is_valid_youtube_link};
