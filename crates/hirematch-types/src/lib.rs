pub mod api;
pub mod models;

pub use models::{ApplicationStatus, Principal, Role, SwipeDirection};
