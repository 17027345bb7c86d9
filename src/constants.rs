/// Default page size for keyset listings.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Configured ceiling for a single page.
pub const MAX_PAGE_SIZE: u32 = 2_000;

/// Absolute ceiling; `PAGE_SIZE_MAX` is clamped to this.
pub const HARD_PAGE_SIZE_CEILING: u32 = 10_000;

/// Maximum number of codes accepted by the by-codes lookup.
pub const MAX_CODES_PER_LOOKUP: usize = 200;

/// Page size the map client requests per batch.
pub const CLIENT_PAGE_LIMIT: u32 = 500;

/// Upper bound on batches in one client load before it is cut short.
pub const CLIENT_MAX_BATCHES: u32 = 1_000;

/// Client HTTP timeout (seconds).
pub const CLIENT_TIMEOUT_SECS: u64 = 30;

/// Maximum stored length for the email filter.
pub const MAX_EMAIL_LEN: usize = 254;
