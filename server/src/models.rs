use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipez_user)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: Option<String>,
    pub user_password_hash: String,
    pub user_profile_image_url: Option<String>,
    pub user_created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipez_user)]
pub struct NewUser<'a> {
    pub user_name: &'a str,
    pub user_email: Option<&'a str>,
    pub user_password_hash: &'a str,
    pub user_profile_image_url: Option<&'a str>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipez_session)]
pub struct NewSession<'a> {
    pub session_user_id: Uuid,
    pub session_token_hash: &'a str,
    pub session_expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Serialize, ToSchema, Debug, Clone)]
#[diesel(table_name = crate::schema::recipez_category)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Category {
    pub category_id: Uuid,
    pub category_name: String,
    pub category_author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipez_category)]
pub struct NewCategory<'a> {
    pub category_name: &'a str,
    pub category_author_id: Uuid,
}

#[derive(Queryable, Selectable, Serialize, ToSchema, Debug, Clone)]
#[diesel(table_name = crate::schema::recipez_image)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Image {
    pub image_id: Uuid,
    pub image_url: String,
    pub image_author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipez_image)]
pub struct NewImage<'a> {
    pub image_url: &'a str,
    pub image_author_id: Uuid,
}

#[derive(Queryable, Selectable, Serialize, ToSchema, Debug, Clone)]
#[diesel(table_name = crate::schema::recipez_recipe)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub recipe_description: String,
    pub recipe_category_id: Uuid,
    pub recipe_image_id: Uuid,
    pub recipe_author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipez_recipe)]
pub struct NewRecipe<'a> {
    pub recipe_name: &'a str,
    pub recipe_description: &'a str,
    pub recipe_category_id: Uuid,
    pub recipe_image_id: Uuid,
    pub recipe_author_id: Uuid,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::recipez_recipe)]
pub struct RecipeChanges<'a> {
    pub recipe_name: Option<&'a str>,
    pub recipe_description: Option<&'a str>,
    pub recipe_category_id: Option<Uuid>,
    pub recipe_image_id: Option<Uuid>,
}

impl RecipeChanges<'_> {
    pub fn is_empty(&self) -> bool {
        self.recipe_name.is_none()
            && self.recipe_description.is_none()
            && self.recipe_category_id.is_none()
            && self.recipe_image_id.is_none()
    }
}

#[derive(Queryable, Selectable, Serialize, ToSchema, Debug, Clone)]
#[diesel(table_name = crate::schema::recipez_ingredient)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Ingredient {
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub ingredient_quantity: String,
    pub ingredient_measurement: String,
    pub ingredient_author_id: Uuid,
    pub ingredient_recipe_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipez_ingredient)]
pub struct NewIngredient<'a> {
    pub ingredient_name: &'a str,
    pub ingredient_quantity: &'a str,
    pub ingredient_measurement: &'a str,
    pub ingredient_author_id: Uuid,
    pub ingredient_recipe_id: Uuid,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::recipez_ingredient)]
pub struct IngredientChanges<'a> {
    pub ingredient_name: Option<&'a str>,
    pub ingredient_quantity: Option<&'a str>,
    pub ingredient_measurement: Option<&'a str>,
}

impl IngredientChanges<'_> {
    pub fn is_empty(&self) -> bool {
        self.ingredient_name.is_none()
            && self.ingredient_quantity.is_none()
            && self.ingredient_measurement.is_none()
    }
}

#[derive(Queryable, Selectable, Serialize, ToSchema, Debug, Clone)]
#[diesel(table_name = crate::schema::recipez_step)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Step {
    pub step_id: Uuid,
    pub step_text: String,
    pub step_author_id: Uuid,
    pub step_recipe_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipez_step)]
pub struct NewStep<'a> {
    pub step_text: &'a str,
    pub step_author_id: Uuid,
    pub step_recipe_id: Uuid,
}
