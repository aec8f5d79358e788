mod common;

use common::*;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use recipez_server::migrations::{
    repair_recipe_image_refs, MigrationError, DEFAULT_RECIPE_IMAGE_URL,
    RESTORED_INGREDIENT_CONSTRAINT, SCHEMA,
};
use recipez_server::raw_sql;
use serial_test::serial;

const IMAGE_FKEY: &str = "recipez_recipe_recipe_image_id_fkey";

#[test]
#[serial]
fn test_full_chain_up_down_up() {
    let Some(mut conn) = fresh_connection() else {
        return;
    };
    let chain = chain();

    assert_eq!(chain.current(&mut conn).unwrap(), None);

    let applied = chain.upgrade_to_head(&mut conn).unwrap();
    assert_eq!(
        applied,
        vec![BASELINE, DROP_INGREDIENT_UNIQUE, REQUIRE_RECIPE_IMAGE]
    );
    assert!(chain.is_at_head(&mut conn).unwrap());

    // Already at head
    assert!(chain.upgrade_to_head(&mut conn).unwrap().is_empty());

    let reverted = chain.downgrade_to(&mut conn, None).unwrap();
    assert_eq!(
        reverted,
        vec![REQUIRE_RECIPE_IMAGE, DROP_INGREDIENT_UNIQUE, BASELINE]
    );
    assert_eq!(chain.current(&mut conn).unwrap(), None);
    assert!(!raw_sql::table_exists(&mut conn, SCHEMA, "recipez_recipe").unwrap());

    assert!(matches!(
        chain.downgrade_one(&mut conn),
        Err(MigrationError::NothingToDowngrade)
    ));

    chain.upgrade_to_head(&mut conn).unwrap();
    assert_eq!(
        chain.current(&mut conn).unwrap().as_deref(),
        Some(REQUIRE_RECIPE_IMAGE)
    );
}

#[test]
#[serial]
fn test_unknown_upgrade_target() {
    let Some(mut conn) = fresh_connection() else {
        return;
    };
    assert!(matches!(
        chain().upgrade_to(&mut conn, "ffffffffffff"),
        Err(MigrationError::UnknownRevision(_))
    ));
}

#[test]
#[serial]
fn test_downgrade_target_must_be_behind_current() {
    let Some(mut conn) = fresh_connection() else {
        return;
    };
    let chain = chain();
    chain.upgrade_to(&mut conn, DROP_INGREDIENT_UNIQUE).unwrap();
    insert_user(&mut conn, "cook");

    for target in [REQUIRE_RECIPE_IMAGE, DROP_INGREDIENT_UNIQUE] {
        assert!(matches!(
            chain.downgrade_to(&mut conn, Some(target)),
            Err(MigrationError::NotBehindCurrent { .. })
        ));
    }

    assert_eq!(
        chain.current(&mut conn).unwrap().as_deref(),
        Some(DROP_INGREDIENT_UNIQUE)
    );
    assert!(raw_sql::table_exists(&mut conn, SCHEMA, "recipez_user").unwrap());
}

#[test]
#[serial]
fn test_downgrade_to_on_empty_database() {
    let Some(mut conn) = fresh_connection() else {
        return;
    };
    let chain = chain();
    assert!(matches!(
        chain.downgrade_to(&mut conn, Some(BASELINE)),
        Err(MigrationError::NothingToDowngrade)
    ));
    assert!(chain.downgrade_to(&mut conn, None).unwrap().is_empty());
}

#[test]
#[serial]
fn test_duplicate_ingredients_allowed_after_upgrade() {
    let Some(mut conn) = fresh_connection() else {
        return;
    };
    let chain = chain();
    chain.upgrade_to(&mut conn, BASELINE).unwrap();

    let cook = insert_user(&mut conn, "cook");
    let category = insert_category(&mut conn, cook, "Soups");
    let recipe = insert_recipe(&mut conn, cook, category, None, "Onion soup");

    insert_ingredient(&mut conn, cook, recipe, "onion").unwrap();
    assert!(insert_ingredient(&mut conn, cook, recipe, "onion").is_err());
    assert_eq!(
        raw_sql::unique_constraints(&mut conn, SCHEMA, "recipez_ingredient")
            .unwrap()
            .len(),
        1
    );

    chain.upgrade_to(&mut conn, DROP_INGREDIENT_UNIQUE).unwrap();
    assert!(raw_sql::unique_constraints(&mut conn, SCHEMA, "recipez_ingredient")
        .unwrap()
        .is_empty());
    insert_ingredient(&mut conn, cook, recipe, "onion").unwrap();
    insert_ingredient(&mut conn, cook, recipe, "onion").unwrap();
}

#[test]
#[serial]
fn test_drop_without_constraint_is_a_no_op() {
    let Some(mut conn) = fresh_connection() else {
        return;
    };
    let chain = chain();
    chain.upgrade_to(&mut conn, BASELINE).unwrap();

    for name in raw_sql::unique_constraints(&mut conn, SCHEMA, "recipez_ingredient").unwrap() {
        conn.batch_execute(&format!(
            "ALTER TABLE recipez.recipez_ingredient DROP CONSTRAINT {}",
            raw_sql::quote_ident(&name)
        ))
        .unwrap();
    }

    let applied = chain.upgrade_to(&mut conn, DROP_INGREDIENT_UNIQUE).unwrap();
    assert_eq!(applied, vec![DROP_INGREDIENT_UNIQUE]);
    assert_eq!(
        chain.current(&mut conn).unwrap().as_deref(),
        Some(DROP_INGREDIENT_UNIQUE)
    );
}

#[test]
#[serial]
fn test_downgrade_restores_named_ingredient_constraint() {
    let Some(mut conn) = fresh_connection() else {
        return;
    };
    let chain = chain();
    chain.upgrade_to(&mut conn, DROP_INGREDIENT_UNIQUE).unwrap();

    chain.downgrade_to(&mut conn, Some(BASELINE)).unwrap();
    assert_eq!(
        raw_sql::unique_constraints(&mut conn, SCHEMA, "recipez_ingredient").unwrap(),
        vec![RESTORED_INGREDIENT_CONSTRAINT.to_string()]
    );
}

#[test]
#[serial]
fn test_downgrade_with_duplicates_rolls_back() {
    let Some(mut conn) = fresh_connection() else {
        return;
    };
    let chain = chain();
    chain.upgrade_to(&mut conn, DROP_INGREDIENT_UNIQUE).unwrap();

    let cook = insert_user(&mut conn, "cook");
    let category = insert_category(&mut conn, cook, "Soups");
    let recipe = insert_recipe(&mut conn, cook, category, None, "Onion soup");
    insert_ingredient(&mut conn, cook, recipe, "onion").unwrap();
    insert_ingredient(&mut conn, cook, recipe, "onion").unwrap();

    assert!(chain.downgrade_one(&mut conn).is_err());
    assert_eq!(
        chain.current(&mut conn).unwrap().as_deref(),
        Some(DROP_INGREDIENT_UNIQUE)
    );
}

#[test]
#[serial]
fn test_repair_points_recipes_at_default_image() {
    let Some(mut conn) = fresh_connection() else {
        return;
    };
    let chain = chain();
    chain.upgrade_to(&mut conn, DROP_INGREDIENT_UNIQUE).unwrap();

    let cook = insert_user(&mut conn, "cook");
    let category = insert_category(&mut conn, cook, "Breads");
    let own_image = insert_image(&mut conn, cook, "/static/uploads/loaf.png");
    let lookalike = insert_image(&mut conn, cook, "/static/uploads/evil_default_recipe.png");
    let with_image = insert_recipe(&mut conn, cook, category, Some(own_image), "Loaf");
    let bare_a = insert_recipe(&mut conn, cook, category, None, "Bagel");
    let bare_b = insert_recipe(&mut conn, cook, category, None, "Pretzel");

    assert_eq!(repair_recipe_image_refs(&mut conn).unwrap(), 2);

    let default_image = recipe_image(&mut conn, bare_a).unwrap();
    assert_ne!(default_image, lookalike);
    assert_eq!(recipe_image(&mut conn, bare_b), Some(default_image));
    assert_eq!(recipe_image(&mut conn, with_image), Some(own_image));

    let url: raw_sql::NameRow = diesel::sql_query(format!(
        "SELECT image_url AS name FROM recipez.recipez_image WHERE image_id = '{default_image}'"
    ))
    .get_result(&mut conn)
    .unwrap();
    assert_eq!(url.name, DEFAULT_RECIPE_IMAGE_URL);

    // A second pass reuses the same default image
    assert_eq!(repair_recipe_image_refs(&mut conn).unwrap(), 0);
}

#[test]
#[serial]
fn test_image_delete_action_before_and_after() {
    let Some(mut conn) = fresh_connection() else {
        return;
    };
    let chain = chain();
    chain.upgrade_to(&mut conn, DROP_INGREDIENT_UNIQUE).unwrap();
    assert_eq!(
        raw_sql::foreign_key_delete_action(&mut conn, SCHEMA, IMAGE_FKEY).unwrap(),
        Some('n')
    );

    let cook = insert_user(&mut conn, "cook");
    let category = insert_category(&mut conn, cook, "Pies");
    let doomed = insert_image(&mut conn, cook, "/static/uploads/apple.png");
    let apple = insert_recipe(&mut conn, cook, category, Some(doomed), "Apple pie");

    // Before the upgrade a delete orphans the recipe
    conn.batch_execute(&format!(
        "DELETE FROM recipez.recipez_image WHERE image_id = '{doomed}'"
    ))
    .unwrap();
    assert_eq!(recipe_image(&mut conn, apple), None);

    chain.upgrade_to_head(&mut conn).unwrap();
    assert_eq!(
        raw_sql::foreign_key_delete_action(&mut conn, SCHEMA, IMAGE_FKEY).unwrap(),
        Some('r')
    );
    let repaired = recipe_image(&mut conn, apple).unwrap();

    // After it a referenced image cannot go
    let result = conn.batch_execute(&format!(
        "DELETE FROM recipez.recipez_image WHERE image_id = '{repaired}'"
    ));
    assert!(result.is_err());

    let result = conn.batch_execute(&format!(
        "UPDATE recipez.recipez_recipe SET recipe_image_id = NULL WHERE recipe_id = '{apple}'"
    ));
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_downgrade_relaxes_image_reference() {
    let Some(mut conn) = fresh_connection() else {
        return;
    };
    let chain = chain();
    chain.upgrade_to_head(&mut conn).unwrap();

    let reverted = chain.downgrade_one(&mut conn).unwrap();
    assert_eq!(reverted, REQUIRE_RECIPE_IMAGE);
    assert_eq!(
        raw_sql::foreign_key_delete_action(&mut conn, SCHEMA, IMAGE_FKEY).unwrap(),
        Some('n')
    );

    let cook = insert_user(&mut conn, "cook");
    let category = insert_category(&mut conn, cook, "Salads");
    insert_recipe(&mut conn, cook, category, None, "Green salad");
}
