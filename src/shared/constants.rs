/// Default number of records returned by list endpoints
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Maximum number of records a single list call may request
pub const MAX_PAGE_SIZE: usize = 100;

// =============================================================================
// PROVIDER-MANAGED COLUMNS
// =============================================================================

/// Primary key column, assigned by the persistence provider
pub const ID_COLUMN: &str = "id";

/// Creation timestamp column, assigned by the persistence provider
pub const CREATED_AT_COLUMN: &str = "created_at";

/// Last-modified timestamp column, refreshed by the persistence provider
pub const UPDATED_AT_COLUMN: &str = "updated_at";

// =============================================================================
// MEDIA
// =============================================================================

/// Maximum accepted media upload size in bytes (10MB)
pub const MAX_MEDIA_SIZE: usize = 10 * 1024 * 1024;

/// MIME types accepted for media uploads
pub const ALLOWED_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
