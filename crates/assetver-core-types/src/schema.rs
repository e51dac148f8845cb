//! Canonical schema constants for structured logging and events
//!
//! Every log line and error report uses these keys so captured events can be
//! matched without knowing which module emitted them.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_ASSET_TYPE: &str = "asset_type";
pub const FIELD_ASSET_ID: &str = "asset_id";
pub const FIELD_VERSION_ID: &str = "version_id";
pub const FIELD_VERSION: &str = "version";

// Allocation loop
pub const FIELD_ATTEMPT: &str = "attempt";
pub const FIELD_MAX_ATTEMPTS: &str = "max_attempts";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_CONFLICT: &str = "conflict";
pub const EVENT_EXHAUSTED: &str = "exhausted";
