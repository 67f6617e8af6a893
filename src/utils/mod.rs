//! Small helpers shared by commands.

pub mod open;
pub mod slug;
