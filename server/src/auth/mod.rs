mod crypto;
mod db;
mod extractor;

pub use crypto::{hash_password, verify_password};
pub use db::{create_session, delete_expired_sessions, get_user_from_token};
pub use extractor::AuthUser;
