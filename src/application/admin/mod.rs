pub mod editor;
pub mod posts;
