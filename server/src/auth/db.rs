use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{NewSession, User};
use crate::schema::{recipez_session, recipez_user};
use chrono::{Duration, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::crypto::{generate_token, hash_token};

/// Start a session for `user_id`. Only the token's hash is stored; the
/// plaintext token is returned once, to the client.
pub fn create_session(
    conn: &mut PgConnection,
    user_id: Uuid,
    ttl: Duration,
) -> Result<String, diesel::result::Error> {
    let token = generate_token();
    let token_hash = hash_token(&token);

    let new_session = NewSession {
        session_user_id: user_id,
        session_token_hash: &token_hash,
        session_expires_at: Utc::now() + ttl,
    };

    diesel::insert_into(recipez_session::table)
        .values(&new_session)
        .execute(conn)?;

    Ok(token)
}

pub fn delete_expired_sessions(conn: &mut PgConnection) -> Result<usize, diesel::result::Error> {
    diesel::delete(recipez_session::table.filter(recipez_session::session_expires_at.le(Utc::now())))
        .execute(conn)
}

pub async fn get_user_from_token(pool: &DbPool, token: &str) -> Result<Option<User>, ApiError> {
    let mut conn = pool.get()?;
    let token_hash = hash_token(token);

    let user = recipez_session::table
        .inner_join(recipez_user::table)
        .filter(recipez_session::session_token_hash.eq(&token_hash))
        .filter(recipez_session::session_expires_at.gt(Utc::now()))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;

    Ok(user)
}
