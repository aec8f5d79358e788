//! Shared setup for tests that need a real Postgres.
//!
//! Tests read `RECIPEZ_TEST_DATABASE_URL` and return early when it is unset.
//! Every test starts from an empty `recipez` schema, so they run serially.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use recipez_server::config::Config;
use recipez_server::db::create_pool;
use recipez_server::migrations::MigrationChain;
use recipez_server::{app, AppState};
use serde_json::Value;
use std::collections::HashMap;
use tower::ServiceExt;
use uuid::Uuid;

pub const BASELINE: &str = "3f1c0a9d2b7e";
pub const DROP_INGREDIENT_UNIQUE: &str = "8a4e6b2c1d90";
pub const REQUIRE_RECIPE_IMAGE: &str = "c52d7e91f0a4";

pub fn database_url() -> Option<String> {
    let url = std::env::var("RECIPEZ_TEST_DATABASE_URL")
        .ok()
        .filter(|u| !u.is_empty());
    if url.is_none() {
        eprintln!("RECIPEZ_TEST_DATABASE_URL not set, skipping database test");
    }
    url
}

/// A connection to the test database with the `recipez` schema removed.
pub fn fresh_connection() -> Option<PgConnection> {
    let url = database_url()?;
    let mut conn = PgConnection::establish(&url).expect("Failed to connect to test database");
    conn.batch_execute("DROP SCHEMA IF EXISTS recipez CASCADE")
        .expect("Failed to reset schema");
    Some(conn)
}

pub fn chain() -> MigrationChain {
    MigrationChain::recipez().expect("Registered migrations must form a chain")
}

pub fn static_dir() -> std::path::PathBuf {
    std::env::temp_dir().join("recipez-test-static")
}

pub fn test_config(url: &str, overrides: &[(&str, &str)]) -> Config {
    let static_dir = static_dir();
    let mut vars: HashMap<String, String> = HashMap::from([
        ("DATABASE_URL".to_string(), url.to_string()),
        ("RECIPEZ_DB_POOL_SIZE".to_string(), "2".to_string()),
        ("RECIPEZ_RUN_MIGRATIONS".to_string(), "false".to_string()),
        (
            "RECIPEZ_STATIC_DIR".to_string(),
            static_dir.to_string_lossy().into_owned(),
        ),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).expect("Invalid test config")
}

/// The full router over a freshly migrated database.
pub fn test_app(overrides: &[(&str, &str)]) -> Option<Router> {
    let url = database_url()?;
    std::env::set_var("INSECURE_PASSWORD_HASHING", "1");

    let mut conn = fresh_connection()?;
    chain()
        .upgrade_to_head(&mut conn)
        .expect("Failed to migrate test database");

    let config = test_config(&url, overrides);
    let pool = create_pool(&config).expect("Failed to create pool");
    Some(app(AppState::new(pool, config)))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Sign up `name` and return its id and bearer token.
pub async fn signup(app: &Router, name: &str) -> (Uuid, String) {
    let response = send(
        app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(serde_json::json!({"user_name": name, "password": "a long password"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

    let user_id = response.body["user_id"].as_str().unwrap().parse().unwrap();
    let token = response.body["token"].as_str().unwrap().to_string();
    (user_id, token)
}

// Raw inserts for migration tests, which run against past schema versions the
// Diesel models do not describe.

pub fn insert_user(conn: &mut PgConnection, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    conn.batch_execute(&format!(
        "INSERT INTO recipez.recipez_user (user_id, user_name, user_password_hash) \
         VALUES ('{id}', '{name}', 'not-a-hash')"
    ))
    .unwrap();
    id
}

pub fn insert_category(conn: &mut PgConnection, author: Uuid, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    conn.batch_execute(&format!(
        "INSERT INTO recipez.recipez_category (category_id, category_name, category_author_id) \
         VALUES ('{id}', '{name}', '{author}')"
    ))
    .unwrap();
    id
}

pub fn insert_image(conn: &mut PgConnection, author: Uuid, url: &str) -> Uuid {
    let id = Uuid::new_v4();
    conn.batch_execute(&format!(
        "INSERT INTO recipez.recipez_image (image_id, image_url, image_author_id) \
         VALUES ('{id}', '{url}', '{author}')"
    ))
    .unwrap();
    id
}

pub fn insert_recipe(
    conn: &mut PgConnection,
    author: Uuid,
    category: Uuid,
    image: Option<Uuid>,
    name: &str,
) -> Uuid {
    let id = Uuid::new_v4();
    let image = image.map_or("NULL".to_string(), |i| format!("'{i}'"));
    conn.batch_execute(&format!(
        "INSERT INTO recipez.recipez_recipe \
         (recipe_id, recipe_name, recipe_description, recipe_category_id, recipe_image_id, recipe_author_id) \
         VALUES ('{id}', '{name}', '', '{category}', {image}, '{author}')"
    ))
    .unwrap();
    id
}

pub fn insert_ingredient(
    conn: &mut PgConnection,
    author: Uuid,
    recipe: Uuid,
    name: &str,
) -> QueryResult<()> {
    conn.batch_execute(&format!(
        "INSERT INTO recipez.recipez_ingredient \
         (ingredient_name, ingredient_quantity, ingredient_measurement, ingredient_author_id, ingredient_recipe_id) \
         VALUES ('{name}', '1', 'cup', '{author}', '{recipe}')"
    ))
}

pub fn recipe_image(conn: &mut PgConnection, recipe: Uuid) -> Option<Uuid> {
    use recipez_server::raw_sql::NameRow;
    let row: NameRow = diesel::sql_query(format!(
        "SELECT COALESCE(recipe_image_id::text, '') AS name FROM recipez.recipez_recipe \
         WHERE recipe_id = '{recipe}'"
    ))
    .get_result(conn)
    .unwrap();
    row.name.parse().ok()
}
