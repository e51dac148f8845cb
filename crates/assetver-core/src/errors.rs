use assetver_core_types::{RequestContext, RequestId, TraceId};
use thiserror::Error;

use crate::model::{AssetId, AssetVersionType, Identity, VersionId};

/// Result type alias using the canonical ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure the versioning core can report maps to exactly one kind, and
/// every kind maps to a stable code that transports can hand to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    /// Caller supplied a value the core cannot act on
    InvalidInput,
    /// Requested version record does not exist
    NotFound,
    /// Acting identity is neither the creator nor an admin
    Forbidden,
    /// Uniqueness violation on `(asset_id, version)`; only the allocator retries on it
    Concurrency,
    /// Allocation retry budget spent without a successful insert
    VersioningExhausted,
    /// No store is registered for the asset type
    UnsupportedType,
    /// Configuration rejected at startup
    InvalidConfig,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Forbidden => "ERR_FORBIDDEN",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::VersioningExhausted => "ERR_VERSIONING_EXHAUSTED",
            ExErrorKind::UnsupportedType => "ERR_UNSUPPORTED_TYPE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether callers may reasonably retry the whole request.
    ///
    /// Only exhaustion qualifies: the store was reachable but contended.
    pub fn is_transient(&self) -> bool {
        matches!(self, ExErrorKind::VersioningExhausted)
    }
}

/// Canonical structured error type
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    asset_type: Option<AssetVersionType>,
    asset_id: Option<AssetId>,
    version_id: Option<VersionId>,
    attempts: Option<u32>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            asset_type: None,
            asset_id: None,
            version_id: None,
            attempts: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    pub fn with_asset_type(mut self, asset_type: AssetVersionType) -> Self {
        self.asset_type = Some(asset_type);
        self
    }

    pub fn with_asset_id(mut self, asset_id: AssetId) -> Self {
        self.asset_id = Some(asset_id);
        self
    }

    pub fn with_version_id(mut self, version_id: VersionId) -> Self {
        self.version_id = Some(version_id);
        self
    }

    /// Record how many allocation attempts were made
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Stamp the correlation ids of a request context, keeping ids already set
    pub fn with_context(mut self, ctx: &RequestContext) -> Self {
        if self.request_id.is_none() {
            self.request_id = Some(ctx.request_id.clone());
        }
        if self.trace_id.is_none() {
            self.trace_id = ctx.trace_id.clone();
        }
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// True for the optimistic-concurrency conflict signal
    pub fn is_conflict(&self) -> bool {
        self.kind == ExErrorKind::Concurrency
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn asset_type(&self) -> Option<AssetVersionType> {
        self.asset_type
    }

    pub fn asset_id(&self) -> Option<AssetId> {
        self.asset_id
    }

    pub fn version_id(&self) -> Option<VersionId> {
        self.version_id
    }

    pub fn attempts(&self) -> Option<u32> {
        self.attempts
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(asset_type) = self.asset_type {
            write!(f, " (asset_type: {})", asset_type)?;
        }
        if let Some(asset_id) = self.asset_id {
            write!(f, " (asset_id: {})", asset_id)?;
        }
        if let Some(version_id) = self.version_id {
            write!(f, " (version_id: {})", version_id)?;
        }
        if let Some(attempts) = self.attempts {
            write!(f, " (attempts: {})", attempts)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain failures of the versioning core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VersioningError {
    /// No version record with this id exists for the asset type
    #[error("Version not found: {version_id} ({asset_type})")]
    VersionNotFound {
        asset_type: AssetVersionType,
        version_id: VersionId,
    },

    /// Acting identity may not mutate a version it did not create
    #[error("{actor} is neither the creator ({owner}) nor an admin")]
    NotOwnerOrAdmin { actor: Identity, owner: Identity },

    /// Every allocation attempt lost the race for a version number
    #[error("Could not allocate a version for asset {asset_id} after {attempts} attempts")]
    AttemptsExhausted {
        asset_type: AssetVersionType,
        asset_id: AssetId,
        attempts: u32,
    },

    /// Router has no store for this asset type
    #[error("No version store registered for asset type {asset_type}")]
    UnsupportedType { asset_type: AssetVersionType },

    /// Another writer already holds `version` for the asset
    #[error("Version {version} of asset {asset_id} already exists")]
    VersionConflict {
        asset_type: AssetVersionType,
        asset_id: AssetId,
        version: u32,
    },

    /// `max_attempts` must be a positive integer
    #[error("Invalid max_attempts: {value}")]
    InvalidMaxAttempts { value: String },

    /// Draft reached a store without its authorship stamp
    #[error("Draft for asset {asset_id} has no creation stamp")]
    UnstampedDraft { asset_id: AssetId },

    /// Version numbers start at 1
    #[error("Version {version} of asset {asset_id} is not a positive number")]
    NonPositiveVersion { asset_id: AssetId, version: u32 },
}

/// Conversion from the domain enum into the canonical error facility
impl From<VersioningError> for ExError {
    fn from(err: VersioningError) -> Self {
        let message = err.to_string();
        match err {
            VersioningError::VersionNotFound {
                asset_type,
                version_id,
            } => ExError::new(ExErrorKind::NotFound)
                .with_asset_type(asset_type)
                .with_version_id(version_id)
                .with_message("Version not found"),

            VersioningError::NotOwnerOrAdmin { .. } => {
                ExError::new(ExErrorKind::Forbidden).with_message(message)
            }

            VersioningError::AttemptsExhausted {
                asset_type,
                asset_id,
                attempts,
            } => ExError::new(ExErrorKind::VersioningExhausted)
                .with_asset_type(asset_type)
                .with_asset_id(asset_id)
                .with_attempts(attempts)
                .with_message("Error during saving version"),

            VersioningError::UnsupportedType { asset_type } => {
                ExError::new(ExErrorKind::UnsupportedType)
                    .with_asset_type(asset_type)
                    .with_message(message)
            }

            VersioningError::VersionConflict {
                asset_type,
                asset_id,
                ..
            } => ExError::new(ExErrorKind::Concurrency)
                .with_asset_type(asset_type)
                .with_asset_id(asset_id)
                .with_message(message),

            VersioningError::InvalidMaxAttempts { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }

            VersioningError::UnstampedDraft { asset_id }
            | VersioningError::NonPositiveVersion { asset_id, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_asset_id(asset_id)
                    .with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}
