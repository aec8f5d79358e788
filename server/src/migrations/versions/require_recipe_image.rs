use crate::migrations::{Migration, MigrationError};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::Text;

/// Placeholder every image-less recipe is pointed at.
pub const DEFAULT_RECIPE_IMAGE_URL: &str = "/static/img/default_recipe.png";

/// Creates the default image when none exists, attributed to the earliest
/// user. Inserts nothing on a database without users. `$1` is the exact
/// default URL, so an upload that merely mentions it never stands in.
const INSERT_DEFAULT_IMAGE: &str = "INSERT INTO recipez.recipez_image (image_url, image_author_id) \
    SELECT $1, u.user_id FROM recipez.recipez_user u \
    WHERE NOT EXISTS ( \
        SELECT 1 FROM recipez.recipez_image WHERE image_url = $1 \
    ) \
    ORDER BY u.user_created_at, u.user_id \
    LIMIT 1";

/// Rows stored as the literal text `None` count as missing alongside NULL.
const REPAIR_RECIPES: &str = "UPDATE recipez.recipez_recipe \
    SET recipe_image_id = ( \
        SELECT image_id FROM recipez.recipez_image \
        WHERE image_url = $1 \
        ORDER BY created_at, image_id \
        LIMIT 1 \
    ) \
    WHERE recipe_image_id IS NULL OR recipe_image_id::text = 'None'";

const REQUIRE: &str = r#"
ALTER TABLE recipez.recipez_recipe ALTER COLUMN recipe_image_id SET NOT NULL;
ALTER TABLE recipez.recipez_recipe DROP CONSTRAINT recipez_recipe_recipe_image_id_fkey;
ALTER TABLE recipez.recipez_recipe ADD CONSTRAINT recipez_recipe_recipe_image_id_fkey
    FOREIGN KEY (recipe_image_id) REFERENCES recipez.recipez_image (image_id) ON DELETE RESTRICT;
"#;

const RELAX: &str = r#"
ALTER TABLE recipez.recipez_recipe DROP CONSTRAINT recipez_recipe_recipe_image_id_fkey;
ALTER TABLE recipez.recipez_recipe ADD CONSTRAINT recipez_recipe_recipe_image_id_fkey
    FOREIGN KEY (recipe_image_id) REFERENCES recipez.recipez_image (image_id) ON DELETE SET NULL;
ALTER TABLE recipez.recipez_recipe ALTER COLUMN recipe_image_id DROP NOT NULL;
"#;

/// Point every recipe lacking an image at the default image, creating it if
/// needed. Returns the number of recipes repaired.
pub fn repair_recipe_image_refs(conn: &mut PgConnection) -> QueryResult<usize> {
    diesel::sql_query(INSERT_DEFAULT_IMAGE)
        .bind::<Text, _>(DEFAULT_RECIPE_IMAGE_URL)
        .execute(conn)?;
    diesel::sql_query(REPAIR_RECIPES)
        .bind::<Text, _>(DEFAULT_RECIPE_IMAGE_URL)
        .execute(conn)
}

/// Make the image reference mandatory and stop image deletes from orphaning
/// recipes.
pub fn require_recipe_image(conn: &mut PgConnection) -> QueryResult<()> {
    conn.batch_execute(REQUIRE)
}

pub struct RequireRecipeImage;

impl Migration for RequireRecipeImage {
    fn revision(&self) -> &'static str {
        "c52d7e91f0a4"
    }

    fn down_revision(&self) -> Option<&'static str> {
        Some("8a4e6b2c1d90")
    }

    fn description(&self) -> &'static str {
        "make the recipe image mandatory and restrict deleting referenced images"
    }

    fn upgrade(&self, conn: &mut PgConnection) -> Result<(), MigrationError> {
        let repaired = repair_recipe_image_refs(conn)?;
        if repaired > 0 {
            tracing::info!(repaired, "pointed recipes without an image at the default image");
        }
        require_recipe_image(conn)?;
        Ok(())
    }

    // Recipes repaired on the way up keep the default image.
    fn downgrade(&self, conn: &mut PgConnection) -> Result<(), MigrationError> {
        conn.batch_execute(RELAX)?;
        Ok(())
    }
}
