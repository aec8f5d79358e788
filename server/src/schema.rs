// Mirrors the `recipez` schema at the head of the migration chain.

diesel::table! {
    recipez.recipez_category (category_id) {
        category_id -> Uuid,
        category_name -> Text,
        category_author_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    recipez.recipez_image (image_id) {
        image_id -> Uuid,
        image_url -> Text,
        image_author_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    recipez.recipez_ingredient (ingredient_id) {
        ingredient_id -> Uuid,
        ingredient_name -> Text,
        ingredient_quantity -> Text,
        ingredient_measurement -> Text,
        ingredient_author_id -> Uuid,
        ingredient_recipe_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    recipez.recipez_recipe (recipe_id) {
        recipe_id -> Uuid,
        recipe_name -> Text,
        recipe_description -> Text,
        recipe_category_id -> Uuid,
        recipe_image_id -> Uuid,
        recipe_author_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    recipez.recipez_schema_version (version_num) {
        #[max_length = 32]
        version_num -> Varchar,
    }
}

diesel::table! {
    recipez.recipez_session (session_id) {
        session_id -> Uuid,
        session_user_id -> Uuid,
        #[max_length = 255]
        session_token_hash -> Varchar,
        session_expires_at -> Timestamptz,
        session_created_at -> Timestamptz,
    }
}

diesel::table! {
    recipez.recipez_step (step_id) {
        step_id -> Uuid,
        step_text -> Text,
        step_author_id -> Uuid,
        step_recipe_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    recipez.recipez_user (user_id) {
        user_id -> Uuid,
        user_name -> Text,
        user_email -> Nullable<Text>,
        #[max_length = 255]
        user_password_hash -> Varchar,
        user_profile_image_url -> Nullable<Text>,
        user_created_at -> Timestamptz,
    }
}

diesel::joinable!(recipez_category -> recipez_user (category_author_id));
diesel::joinable!(recipez_image -> recipez_user (image_author_id));
diesel::joinable!(recipez_ingredient -> recipez_recipe (ingredient_recipe_id));
diesel::joinable!(recipez_recipe -> recipez_category (recipe_category_id));
diesel::joinable!(recipez_recipe -> recipez_image (recipe_image_id));
diesel::joinable!(recipez_session -> recipez_user (session_user_id));
diesel::joinable!(recipez_step -> recipez_recipe (step_recipe_id));

diesel::allow_tables_to_appear_in_same_query!(
    recipez_category,
    recipez_image,
    recipez_ingredient,
    recipez_recipe,
    recipez_schema_version,
    recipez_session,
    recipez_step,
    recipez_user,
);
