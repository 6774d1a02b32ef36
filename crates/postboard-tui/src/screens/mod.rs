//! Screens. The board has a single one.

pub mod posts;

pub use posts::PostsScreen;
