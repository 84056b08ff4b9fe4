//! Diesel table definitions mirroring `backend/migrations`.

diesel::table! {
    issues (id) {
        id -> Int8,
        #[max_length = 150]
        title -> Varchar,
        description -> Text,
        category -> Text,
        priority -> Text,
        priority_rank -> Int2,
        status -> Text,
        created_at -> Timestamptz,
        created_by_user_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    users (id) {
        id -> Uuid,
        username -> Text,
        display_name -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    user_roles (user_id, role) {
        user_id -> Uuid,
        role -> Text,
    }
}

diesel::joinable!(user_roles -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(issues, users, user_roles);
