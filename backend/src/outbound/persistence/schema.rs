//! Diesel table definitions for the PostgreSQL schema.

diesel::table! {
    users (id) {
        id -> Uuid,
        name -> Text,
        email -> Text,
        password_hash -> Text,
        age -> Nullable<Int4>,
        weight -> Nullable<Float8>,
        height -> Nullable<Float8>,
        activity_level -> Nullable<Text>,
        goal -> Nullable<Text>,
        target_protein -> Nullable<Float8>,
        target_carbs -> Nullable<Float8>,
        target_fats -> Nullable<Float8>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    vendors (id) {
        id -> Uuid,
        name -> Text,
        email -> Text,
        password_hash -> Text,
        address -> Text,
        phone -> Text,
        is_verified -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    meals (id) {
        id -> Uuid,
        vendor_id -> Uuid,
        name -> Text,
        description -> Text,
        protein -> Float8,
        carbs -> Float8,
        fats -> Float8,
        calories -> Float8,
        price -> Float8,
        cuisine_type -> Text,
        preparation_time -> Int4,
        is_available -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    orders (id) {
        id -> Uuid,
        user_id -> Uuid,
        meal_id -> Uuid,
        vendor_id -> Uuid,
        quantity -> Int4,
        delivery_address -> Text,
        total_price -> Float8,
        status -> Text,
        ordered_at -> Timestamptz,
    }
}

diesel::joinable!(meals -> vendors (vendor_id));
diesel::joinable!(orders -> users (user_id));
diesel::joinable!(orders -> vendors (vendor_id));

diesel::allow_tables_to_appear_in_same_query!(users, vendors, meals, orders);
