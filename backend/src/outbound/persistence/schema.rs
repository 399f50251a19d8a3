//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Role ladder used for mutation precedence checks.
    roles (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        level -> Int4,
    }
}

diesel::table! {
    /// Registered accounts. `is_active` flips on activation.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        is_active -> Bool,
        created_at -> Timestamptz,
        role_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Pending activation invitations; rows only ever hold the token digest.
    user_invitations (token_hash) {
        token_hash -> Varchar,
        user_id -> Uuid,
        expiry -> Timestamptz,
    }
}

diesel::table! {
    /// Directed follow edges: `follower_id` follows `user_id`.
    followers (user_id, follower_id) {
        user_id -> Uuid,
        follower_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Posts with an optimistic-concurrency version counter.
    posts (id) {
        id -> Uuid,
        user_id -> Uuid,
        title -> Varchar,
        content -> Text,
        tags -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        version -> Int4,
    }
}

diesel::table! {
    /// Comments attached to posts.
    comments (id) {
        id -> Uuid,
        post_id -> Uuid,
        user_id -> Uuid,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(users -> roles (role_id));
diesel::joinable!(user_invitations -> users (user_id));
diesel::joinable!(posts -> users (user_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(comments -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    roles,
    users,
    user_invitations,
    followers,
    posts,
    comments,
);
