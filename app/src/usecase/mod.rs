//! Foreground actions behind the popup and options pages.

pub mod options;
pub mod popup;

pub use options::OptionsUseCase;
pub use popup::PopupUseCase;
