pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use crate::error::ApiError;
use crate::models::Step;
use crate::schema::recipez_step;
use crate::AppState;
use axum::routing::{get, put};
use axum::Router;
use diesel::prelude::*;
use utoipa::OpenApi;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/recipes/{id}/steps",
            get(list::list_steps).post(create::create_steps),
        )
        .route(
            "/api/steps/{id}",
            put(update::update_step).delete(delete::delete_step),
        )
}

fn load_step(conn: &mut PgConnection, id: Uuid) -> Result<Step, ApiError> {
    recipez_step::table
        .find(id)
        .select(Step::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Step not found"))
}

fn step_text(raw: &str) -> Result<&str, ApiError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request("step_text cannot be empty"));
    }
    Ok(text)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_steps,
        list::list_steps,
        update::update_step,
        delete::delete_step,
    ),
    components(schemas(
        create::StepInput,
        create::CreateStepsRequest,
        list::ListStepsResponse,
    ))
)]
pub struct ApiDoc;
