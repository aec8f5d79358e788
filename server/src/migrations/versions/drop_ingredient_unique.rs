use crate::migrations::{Migration, MigrationError, SCHEMA};
use crate::raw_sql;
use diesel::connection::SimpleConnection;
use diesel::PgConnection;

const TABLE: &str = "recipez_ingredient";

/// Name given to the constraint when a downgrade puts it back.
pub const RESTORED_CONSTRAINT: &str = "uq_ingredient_name_qty_meas_recipe";

/// Allow the same (name, quantity, measurement) ingredient twice in a recipe.
///
/// The constraint was created unnamed, so its generated name is looked up in
/// the catalog rather than hard-coded.
pub struct DropIngredientUnique;

impl Migration for DropIngredientUnique {
    fn revision(&self) -> &'static str {
        "8a4e6b2c1d90"
    }

    fn down_revision(&self) -> Option<&'static str> {
        Some(super::baseline::REVISION)
    }

    fn description(&self) -> &'static str {
        "drop the unique constraint on ingredient name, quantity, measurement and recipe"
    }

    fn upgrade(&self, conn: &mut PgConnection) -> Result<(), MigrationError> {
        let names = raw_sql::unique_constraints(conn, SCHEMA, TABLE)?;

        if names.is_empty() {
            tracing::warn!(
                table = TABLE,
                "no unique constraint found on ingredients, nothing to drop"
            );
            return Ok(());
        }

        for name in names {
            conn.batch_execute(&format!(
                "ALTER TABLE recipez.recipez_ingredient DROP CONSTRAINT {}",
                raw_sql::quote_ident(&name)
            ))?;
            tracing::info!(constraint = %name, "dropped ingredient unique constraint");
        }
        Ok(())
    }

    // Fails, rolling back, while duplicate ingredient rows exist.
    fn downgrade(&self, conn: &mut PgConnection) -> Result<(), MigrationError> {
        conn.batch_execute(&format!(
            "ALTER TABLE recipez.recipez_ingredient ADD CONSTRAINT {RESTORED_CONSTRAINT} \
             UNIQUE (ingredient_name, ingredient_quantity, ingredient_measurement, ingredient_recipe_id)"
        ))?;
        Ok(())
    }
}
