/// Input normalization shared by the query builder, the routes and the map client.
use crate::constants::MAX_EMAIL_LEN;

/// Trim a free-text filter; blank values count as absent.
pub fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Accept only all-digit identifiers. Anything else is silently dropped.
pub fn parse_digits(raw: Option<&str>) -> Option<i64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

/// Page size as typed. Blank means "use the default"; integers outside the
/// `i64` range saturate so the page-size clamp still applies. `Err` only for
/// input that is not an integer at all.
pub fn parse_limit(raw: Option<&str>) -> Result<Option<i64>, String> {
    let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("limit must be an integer, got '{trimmed}'"));
    }
    Ok(Some(trimmed.parse::<i64>().unwrap_or(if negative {
        i64::MIN
    } else {
        i64::MAX
    })))
}

/// Lowercased, trimmed email used for case-insensitive matching.
pub fn normalize_email(raw: Option<&str>) -> Option<String> {
    let email = non_blank(raw)?.to_lowercase();
    if email.len() > MAX_EMAIL_LEN {
        return None;
    }
    Some(email)
}

/// Dedup key for a tree code: trimmed and lowercased, `None` when empty.
pub fn code_key(code: &str) -> Option<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Split `A,B , c` into distinct codes, keeping first-seen order and spelling.
pub fn parse_code_list(raw: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .filter(|code| seen.insert(code.to_lowercase()))
        .map(str::to_string)
        .collect()
}
