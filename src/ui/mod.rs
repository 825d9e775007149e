//! Text-mode UI components for Docshelf

pub mod catalog_view;
pub mod menu;
pub mod prompt;
