mod repo;
pub mod password;
pub mod services;
pub mod token;
pub mod types;

pub use services::Auth;
pub use types::{Session, User, UserProfile};
