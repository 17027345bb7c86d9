//! Translates optional tree filters into one bounded, parameterized SQL query.
//!
//! Every present filter adds exactly one conjunctive predicate; absent (or
//! unusable) filters add nothing. The page size is always clamped, and the
//! keyset cursor becomes a strict `id > ?` bound paired with `ORDER BY id`.

use rusqlite::types::Value;

use crate::config::PaginationConfig;
use crate::store::tables::{FOLD_CASE, TREE_COLUMNS, USER_TREES};
use crate::validation::{code_key, non_blank, normalize_email, parse_digits};

/// Raw filter criteria as they arrive from a request.
///
/// Identity fields stay as strings here; the builder decides whether they
/// are usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeFilter {
    pub subscribers_only: bool,
    pub area: Option<String>,
    pub tree_type: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub code: Option<String>,
    pub codes: Vec<String>,
    pub after_id: Option<i64>,
    /// Requested page size as typed; clamped when compiled.
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// `ORDER BY id ASC`; the only order a cursor is meaningful for.
    Keyset,
    /// Owner listing: planting date (unknown dates last), then code.
    PlantedThenCode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Value>,
    /// Number of filter predicates in the WHERE clause.
    pub predicates: usize,
    /// Clamped page size. The SQL `LIMIT` is one more than this.
    pub page_limit: u32,
}

impl TreeFilter {
    /// Normalized owner id, if the raw value is an all-digit string.
    pub fn owner_id(&self) -> Option<i64> {
        parse_digits(self.user_id.as_deref())
    }

    /// Normalized owner email, if one was given.
    pub fn owner_email(&self) -> Option<String> {
        normalize_email(self.email.as_deref())
    }

    /// Whether at least one usable identity filter is present.
    pub fn has_identity(&self) -> bool {
        self.owner_id().is_some() || self.owner_email().is_some()
    }

    /// Keyset cursor; non-positive ids are equivalent to no cursor.
    pub fn cursor(&self) -> Option<i64> {
        self.after_id.filter(|id| *id > 0)
    }

    pub fn compile(&self, pagination: &PaginationConfig, order: SortOrder) -> CompiledQuery {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if self.subscribers_only {
            clauses.push("is_subscriber = 1".to_string());
        }
        if let Some(area) = non_blank(self.area.as_deref()) {
            clauses.push("area = ?".to_string());
            params.push(Value::Text(area));
        }
        if let Some(tree_type) = non_blank(self.tree_type.as_deref()) {
            clauses.push("tree_type = ?".to_string());
            params.push(Value::Text(tree_type));
        }
        if let Some(user_id) = self.owner_id() {
            clauses.push("user_id = ?".to_string());
            params.push(Value::Integer(user_id));
        }
        if let Some(email) = self.owner_email() {
            clauses.push(format!("{FOLD_CASE}(email) = ?"));
            params.push(Value::Text(email));
        }
        if let Some(code) = self.code.as_deref().and_then(code_key) {
            clauses.push(format!("{FOLD_CASE}(tree_code) = ?"));
            params.push(Value::Text(code));
        }
        let codes: Vec<String> = self.codes.iter().filter_map(|c| code_key(c)).collect();
        if !codes.is_empty() {
            let placeholders = vec!["?"; codes.len()].join(", ");
            clauses.push(format!("{FOLD_CASE}(tree_code) IN ({placeholders})"));
            params.extend(codes.into_iter().map(Value::Text));
        }
        if let Some(after_id) = self.cursor() {
            clauses.push("id > ?".to_string());
            params.push(Value::Integer(after_id));
        }

        let predicates = clauses.len();
        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        let order_clause = match order {
            SortOrder::Keyset => " ORDER BY id ASC",
            SortOrder::PlantedThenCode => " ORDER BY planted_at ASC NULLS LAST, tree_code ASC, id ASC",
        };

        let page_limit = pagination.clamp(self.limit);
        // One probe row beyond the page tells a final full page from a non-final one.
        params.push(Value::Integer(i64::from(page_limit) + 1));

        CompiledQuery {
            sql: format!(
                "SELECT {TREE_COLUMNS} FROM {USER_TREES}{where_clause}{order_clause} LIMIT ?"
            ),
            params,
            predicates,
            page_limit,
        }
    }
}
