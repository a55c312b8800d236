table! {
    savings_goals (id) {
        id -> Integer,
        user_id -> Text,
        name -> Text,
        target_amount_cents -> BigInt,
        current_amount_cents -> BigInt,
        deadline -> Nullable<Integer>,
        description -> Nullable<Text>,
        created_at -> BigInt,
    }
}

table! {
    deposits (id) {
        id -> Integer,
        user_id -> Text,
        goal_id -> Integer,
        amount_cents -> BigInt,
        deposit_date -> Integer,
    }
}
