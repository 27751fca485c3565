//! Server-rendered HTML. Every user-supplied string passes through
//! `layout::esc` or `layout::attr` before it reaches the page.

pub mod accounts;
pub mod exercises;
pub mod groups;
pub mod layout;
pub mod nutrition;
pub mod users;
pub mod workouts;
