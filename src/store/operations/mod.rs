pub mod trees;
pub mod users;
