use crate::migrations::{Migration, MigrationError};
use diesel::connection::SimpleConnection;
use diesel::PgConnection;

pub const REVISION: &str = "3f1c0a9d2b7e";

/// Initial tables. The ingredient uniqueness rule is declared without a name,
/// and a recipe may exist without an image.
pub struct Baseline;

const UPGRADE: &str = r#"
CREATE SCHEMA IF NOT EXISTS recipez;

CREATE TABLE recipez.recipez_user (
    user_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_name TEXT NOT NULL UNIQUE,
    user_email TEXT UNIQUE,
    user_password_hash VARCHAR(255) NOT NULL,
    user_profile_image_url TEXT,
    user_created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE recipez.recipez_session (
    session_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    session_user_id UUID NOT NULL REFERENCES recipez.recipez_user (user_id) ON DELETE CASCADE,
    session_token_hash VARCHAR(255) NOT NULL UNIQUE,
    session_expires_at TIMESTAMPTZ NOT NULL,
    session_created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX idx_recipez_session_user ON recipez.recipez_session (session_user_id);

CREATE TABLE recipez.recipez_category (
    category_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    category_name TEXT NOT NULL UNIQUE,
    category_author_id UUID NOT NULL REFERENCES recipez.recipez_user (user_id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE recipez.recipez_image (
    image_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    image_url TEXT NOT NULL,
    image_author_id UUID NOT NULL REFERENCES recipez.recipez_user (user_id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE recipez.recipez_recipe (
    recipe_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    recipe_name TEXT NOT NULL,
    recipe_description TEXT NOT NULL,
    recipe_category_id UUID NOT NULL REFERENCES recipez.recipez_category (category_id) ON DELETE RESTRICT,
    recipe_image_id UUID,
    recipe_author_id UUID NOT NULL REFERENCES recipez.recipez_user (user_id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_recipe_name_per_author UNIQUE (recipe_name, recipe_author_id),
    CONSTRAINT recipez_recipe_recipe_image_id_fkey FOREIGN KEY (recipe_image_id)
        REFERENCES recipez.recipez_image (image_id) ON DELETE SET NULL
);

CREATE TABLE recipez.recipez_ingredient (
    ingredient_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    ingredient_name TEXT NOT NULL,
    ingredient_quantity TEXT NOT NULL,
    ingredient_measurement TEXT NOT NULL,
    ingredient_author_id UUID NOT NULL REFERENCES recipez.recipez_user (user_id) ON DELETE CASCADE,
    ingredient_recipe_id UUID NOT NULL REFERENCES recipez.recipez_recipe (recipe_id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
    UNIQUE (ingredient_name, ingredient_quantity, ingredient_measurement, ingredient_recipe_id)
);
CREATE INDEX idx_recipez_ingredient_recipe ON recipez.recipez_ingredient (ingredient_recipe_id);

CREATE TABLE recipez.recipez_step (
    step_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    step_text TEXT NOT NULL,
    step_author_id UUID NOT NULL REFERENCES recipez.recipez_user (user_id) ON DELETE CASCADE,
    step_recipe_id UUID NOT NULL REFERENCES recipez.recipez_recipe (recipe_id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
);
CREATE INDEX idx_recipez_step_recipe ON recipez.recipez_step (step_recipe_id);
"#;

// The version table lives in the same schema, so the schema itself stays.
const DOWNGRADE: &str = r#"
DROP TABLE IF EXISTS recipez.recipez_step;
DROP TABLE IF EXISTS recipez.recipez_ingredient;
DROP TABLE IF EXISTS recipez.recipez_recipe;
DROP TABLE IF EXISTS recipez.recipez_image;
DROP TABLE IF EXISTS recipez.recipez_category;
DROP TABLE IF EXISTS recipez.recipez_session;
DROP TABLE IF EXISTS recipez.recipez_user;
"#;

impl Migration for Baseline {
    fn revision(&self) -> &'static str {
        REVISION
    }

    fn down_revision(&self) -> Option<&'static str> {
        None
    }

    fn description(&self) -> &'static str {
        "create users, sessions, categories, images, recipes, ingredients and steps"
    }

    fn upgrade(&self, conn: &mut PgConnection) -> Result<(), MigrationError> {
        conn.batch_execute(UPGRADE)?;
        Ok(())
    }

    fn downgrade(&self, conn: &mut PgConnection) -> Result<(), MigrationError> {
        conn.batch_execute(DOWNGRADE)?;
        Ok(())
    }
}
