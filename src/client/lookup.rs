use std::fmt;

use reqwest::Url;

use crate::validation::{non_blank, normalize_email, parse_digits};

/// Whose trees to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerLookup {
    Email(String),
    UserId(String),
}

/// What one load fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    Owner(OwnerLookup),
    ForestHeroes,
}

impl LoadRequest {
    /// Path of the paginated endpoint serving this request.
    pub fn path(&self) -> &'static str {
        match self {
            LoadRequest::Owner(_) => "/api/trees",
            LoadRequest::ForestHeroes => "/api/forest-heroes",
        }
    }

    /// Filter pairs for the query string, excluding paging.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            LoadRequest::Owner(OwnerLookup::Email(email)) => vec![("email", email.clone())],
            LoadRequest::Owner(OwnerLookup::UserId(id)) => vec![("user_id", id.clone())],
            LoadRequest::ForestHeroes => Vec::new(),
        }
    }
}

impl fmt::Display for LoadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadRequest::Owner(OwnerLookup::Email(email)) => write!(f, "email={email}"),
            LoadRequest::Owner(OwnerLookup::UserId(id)) => write!(f, "user_id={id}"),
            LoadRequest::ForestHeroes => write!(f, "forest-heroes"),
        }
    }
}

/// Interpret the search box. `None` means there is nothing to look up.
///
/// Anything containing `@` is an email; everything else is passed on as a
/// user id and left for the server to judge.
pub fn parse_search(input: &str) -> Option<LoadRequest> {
    let value = non_blank(Some(input))?;
    let lookup = if value.contains('@') {
        OwnerLookup::Email(normalize_email(Some(value.as_str())).unwrap_or(value))
    } else {
        match parse_digits(Some(value.as_str())) {
            Some(id) => OwnerLookup::UserId(id.to_string()),
            None => OwnerLookup::UserId(value),
        }
    };
    Some(LoadRequest::Owner(lookup))
}

/// Read a deep link query string (`?id=…`, `?email=…` or `?q=…`).
///
/// The first present parameter of `id`, `email`, `q` wins, in that order.
pub fn parse_deep_link(query: &str) -> Option<LoadRequest> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut url = Url::parse("http://localhost/").ok()?;
    url.set_query(Some(query));
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    let lookup = |name: &str| {
        pairs
            .iter()
            .find(|(key, value)| key == name && !value.trim().is_empty())
            .map(|(_, value)| value.trim().to_string())
    };

    if let Some(id) = lookup("id") {
        return Some(LoadRequest::Owner(OwnerLookup::UserId(id)));
    }
    if let Some(email) = lookup("email") {
        let email = normalize_email(Some(email.as_str())).unwrap_or(email);
        return Some(LoadRequest::Owner(OwnerLookup::Email(email)));
    }
    lookup("q").and_then(|q| parse_search(&q))
}
