//! Registered revisions, oldest first.

pub(super) mod baseline;
pub(crate) mod drop_ingredient_unique;
pub(crate) mod require_recipe_image;

use super::Migration;

pub(super) fn all() -> Vec<Box<dyn Migration>> {
    vec![
        Box::new(baseline::Baseline),
        Box::new(drop_ingredient_unique::DropIngredientUnique),
        Box::new(require_recipe_image::RequireRecipeImage),
    ]
}
