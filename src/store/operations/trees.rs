use rusqlite::types::{Value, ValueRef};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::model::{Coordinate, KeysetPage, TreeRecord};
use crate::store::query::{CompiledQuery, SortOrder, TreeFilter};
use crate::store::tables::{TREES, TREE_COLUMNS, USER_TREES};
use crate::store::{Store, StoreError};

/// A tree row to be loaded into the store (seeding and fixtures only; the
/// HTTP surface never writes).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTree {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub tree_code: Option<String>,
    #[serde(default)]
    pub tree_name: Option<String>,
    #[serde(default)]
    pub tree_type: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub lat: Option<Coordinate>,
    #[serde(default)]
    pub long: Option<Coordinate>,
    #[serde(default)]
    pub planted_at: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl Store {
    /// One keyset page for `filter`. The page never holds more than the
    /// clamped limit; `next_after_id` is set only when more rows exist.
    pub fn query_trees(
        &self,
        filter: &TreeFilter,
        pagination: &PaginationConfig,
    ) -> Result<KeysetPage, StoreError> {
        let compiled = filter.compile(pagination, SortOrder::Keyset);
        let mut rows = self.run_query(&compiled)?;

        let has_more = rows.len() > compiled.page_limit as usize;
        rows.truncate(compiled.page_limit as usize);
        let next_after_id = if has_more {
            rows.last().map(|row| row.id)
        } else {
            None
        };

        tracing::debug!(
            predicates = compiled.predicates,
            limit = compiled.page_limit,
            returned = rows.len(),
            next_after_id,
            "Keyset page served"
        );
        Ok(KeysetPage {
            rows,
            next_after_id,
        })
    }

    /// Bounded owner listing ordered by planting date, for the non-paginated endpoint.
    pub fn list_trees(
        &self,
        filter: &TreeFilter,
        pagination: &PaginationConfig,
    ) -> Result<Vec<TreeRecord>, StoreError> {
        let unbounded = TreeFilter {
            after_id: None,
            limit: Some(i64::from(pagination.max_limit)),
            ..filter.clone()
        };
        let compiled = unbounded.compile(pagination, SortOrder::PlantedThenCode);
        let mut rows = self.run_query(&compiled)?;
        if rows.len() > compiled.page_limit as usize {
            tracing::warn!(
                limit = compiled.page_limit,
                "Owner listing truncated at page ceiling"
            );
            rows.truncate(compiled.page_limit as usize);
        }
        Ok(rows)
    }

    pub fn get_tree(&self, id: i64) -> Result<Option<TreeRecord>, StoreError> {
        self.with_conn(|conn| {
            let tree = conn
                .query_row(
                    &format!("SELECT {TREE_COLUMNS} FROM {USER_TREES} WHERE id = ?1"),
                    params![id],
                    row_to_tree,
                )
                .optional()?;
            Ok(tree)
        })
    }

    pub fn count_trees(&self) -> Result<u64, StoreError> {
        self.with_conn(|conn| {
            let count: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {TREES}"), [], |row| row.get(0))?;
            Ok(count.max(0) as u64)
        })
    }

    /// Load trees in one transaction, returning how many were written.
    pub fn insert_trees(&self, trees: &[NewTree]) -> Result<usize, StoreError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(&format!(
                    "INSERT INTO {TREES}
                         (id, tree_code, tree_name, tree_type, area, lat, long, planted_at, user_id)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                ))?;
                for tree in trees {
                    stmt.execute(params![
                        tree.id,
                        tree.tree_code,
                        tree.tree_name,
                        tree.tree_type,
                        tree.area,
                        coordinate_value(tree.lat.as_ref()),
                        coordinate_value(tree.long.as_ref()),
                        tree.planted_at,
                        tree.user_id,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(trees.len())
        })
    }

    fn run_query(&self, compiled: &CompiledQuery) -> Result<Vec<TreeRecord>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(&compiled.sql)?;
            let rows = stmt.query_map(params_from_iter(compiled.params.iter()), row_to_tree)?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }
}

fn row_to_tree(row: &Row<'_>) -> rusqlite::Result<TreeRecord> {
    Ok(TreeRecord {
        id: row.get(0)?,
        tree_code: row.get(1)?,
        tree_name: row.get(2)?,
        tree_type: row.get(3)?,
        area: row.get(4)?,
        lat: coordinate_from(row.get_ref(5)?),
        long: coordinate_from(row.get_ref(6)?),
        planted_at: row.get(7)?,
        user_id: row.get(8)?,
        email: row.get(9)?,
    })
}

fn coordinate_from(value: ValueRef<'_>) -> Option<Coordinate> {
    match value {
        ValueRef::Real(v) => Some(Coordinate::Number(v)),
        ValueRef::Integer(v) => Some(Coordinate::Number(v as f64)),
        ValueRef::Text(raw) => Some(Coordinate::Text(String::from_utf8_lossy(raw).into_owned())),
        ValueRef::Null | ValueRef::Blob(_) => None,
    }
}

fn coordinate_value(coordinate: Option<&Coordinate>) -> Value {
    match coordinate {
        Some(Coordinate::Number(v)) => Value::Real(*v),
        Some(Coordinate::Text(raw)) => Value::Text(raw.clone()),
        None => Value::Null,
    }
}
