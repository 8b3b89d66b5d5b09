pub mod entities;
pub mod session;
pub mod slug;
pub mod types;
