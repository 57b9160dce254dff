//! API Routes

pub mod conversations;
pub mod health;
pub mod users;
