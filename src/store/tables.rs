pub const USERS: &str = "users";
pub const TREES: &str = "trees";

/// Trees joined with their owner; every read goes through this view.
pub const USER_TREES: &str = "v_user_trees";

/// Column list selected from `USER_TREES`, in the order `row_to_tree` reads it.
pub const TREE_COLUMNS: &str =
    "id, tree_code, tree_name, tree_type, area, lat, long, planted_at, user_id, email";

/// Unicode-aware lowercase registered on every connection. SQLite's own
/// `lower()` only folds ASCII, which would never match keys folded in Rust.
pub const FOLD_CASE: &str = "fold_case";
