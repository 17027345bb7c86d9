use forest_map::model::Coordinate;
use forest_map::store::operations::trees::NewTree;
use forest_map::store::operations::users::User;
use forest_map::store::Store;

pub fn seed_user(store: &Store, id: i64, email: &str, is_subscriber: bool) -> User {
    let user = User {
        id,
        email: email.to_string(),
        display_name: Some(format!("Planter {id}")),
        is_subscriber,
    };
    store
        .upsert_users(std::slice::from_ref(&user))
        .expect("upsert seed user");
    user
}

pub fn new_tree(id: i64, code: &str, owner: i64) -> NewTree {
    NewTree {
        id: Some(id),
        tree_code: Some(code.to_string()),
        tree_name: Some(format!("Tree {id}")),
        tree_type: Some(if id % 2 == 0 { "mango" } else { "cashew" }.to_string()),
        area: Some(if id % 3 == 0 { "Bo" } else { "Kenema" }.to_string()),
        lat: Some(Coordinate::from(8.0 + id as f64 / 100.0)),
        long: Some(Coordinate::from(-13.0 - id as f64 / 100.0)),
        planted_at: Some(format!("2024-01-{:02}", (id % 28) + 1)),
        user_id: Some(owner),
    }
}

/// `count` trees with ids `first..first+count`, codes `PB-<id>`.
pub fn seed_trees(store: &Store, owner: i64, first: i64, count: i64) -> Vec<NewTree> {
    let trees: Vec<NewTree> = (first..first + count)
        .map(|id| new_tree(id, &format!("PB-{id}"), owner))
        .collect();
    store.insert_trees(&trees).expect("insert seed trees");
    trees
}
