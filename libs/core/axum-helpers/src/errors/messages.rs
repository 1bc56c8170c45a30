//! Response messages shared by several endpoints.

pub const MISSING_REQUEST: &str = "bad request - missing request";
pub const MISSING_FIELD: &str = "bad request - missing field";
pub const INTERNAL_ERROR: &str = "An unexpected error occurred.";
pub const DB_ERROR: &str = "A database error occurred.";
pub const NOT_FOUND_RESOURCE: &str = "Requested resource was not found.";
