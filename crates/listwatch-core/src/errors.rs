use thiserror::Error;

/// Result type alias using the canonical [`ExError`]
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in log events, CLI output
/// and tests. Loader and diff failures surface as `Parse` or `Schema`;
/// the store surfaces `Io`, `Persistence` or `AlreadyExists`; the fetcher
/// and notifier surface `Transport`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,

    // Snapshot loading / comparison
    /// Feed or persisted artifact could not be tabulated
    Parse,
    /// A uid-source column is missing, a uid repeats, or two snapshots do
    /// not share the same column set
    Schema,

    // Store
    NotFound,
    AlreadyExists,
    Io,
    Persistence,
    Serialization,

    // Collaborators
    /// Feed fetch or notification delivery failed
    Transport,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Parse => "ERR_PARSE",
            ExErrorKind::Schema => "ERR_SCHEMA",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Transport => "ERR_TRANSPORT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for failures of the snapshot storage medium
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            ExErrorKind::Io | ExErrorKind::Persistence | ExErrorKind::AlreadyExists
        )
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, market, uid, column, path) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    market: Option<String>,
    uid: Option<String>,
    column: Option<String>,
    path: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            market: None,
            uid: None,
            column: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add market context
    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }

    /// Add record uid context
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Add column context
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Add filesystem path / URL context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
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

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn market(&self) -> Option<&str> {
        self.market.as_deref()
    }

    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
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
        if let Some(market) = &self.market {
            write!(f, " (market: {})", market)?;
        }
        if let Some(uid) = &self.uid {
            write!(f, " (uid: {})", uid)?;
        }
        if let Some(column) = &self.column {
            write!(f, " (column: {})", column)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
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

/// Domain errors raised while loading and comparing listing snapshots
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ListingError {
    /// Market identifier is not one of the supported feeds
    #[error("Unknown market: {market}")]
    UnknownMarket { market: String },

    /// Text could not be read as a delimited table
    #[error("Table is not parseable: {reason}")]
    Unparseable { reason: String },

    /// A required column (uid source or persisted `uid`) is absent
    #[error("Required column is missing: {column}")]
    MissingColumn { column: String },

    /// Two rows derived the same uid
    #[error("Duplicate uid in snapshot: {uid}")]
    DuplicateUid { uid: String },

    /// Two snapshots being compared do not share a column set
    #[error("Column sets differ: only in new {only_in_new:?}, only in old {only_in_old:?}")]
    ColumnMismatch {
        only_in_new: Vec<String>,
        only_in_old: Vec<String>,
    },

    /// Two snapshots being compared belong to different markets
    #[error("Cannot compare {new} snapshot against {old} snapshot")]
    MarketMismatch { new: String, old: String },
}

/// Conversion from ListingError to the canonical ExError
impl From<ListingError> for ExError {
    fn from(err: ListingError) -> Self {
        let message = err.to_string();
        match err {
            ListingError::UnknownMarket { market } => ExError::new(ExErrorKind::InvalidInput)
                .with_market(market)
                .with_message(message),

            ListingError::Unparseable { .. } => {
                ExError::new(ExErrorKind::Parse).with_message(message)
            }

            ListingError::MissingColumn { column } => ExError::new(ExErrorKind::Schema)
                .with_column(column)
                .with_message(message),

            ListingError::DuplicateUid { uid } => ExError::new(ExErrorKind::Schema)
                .with_uid(uid)
                .with_message(message),

            ListingError::ColumnMismatch { .. } => {
                ExError::new(ExErrorKind::Schema).with_message(message)
            }

            ListingError::MarketMismatch { new, .. } => ExError::new(ExErrorKind::Schema)
                .with_market(new)
                .with_message(message),
        }
    }
}

/// Conversion from csv::Error to ListingError
impl From<csv::Error> for ListingError {
    fn from(err: csv::Error) -> Self {
        ListingError::Unparseable {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes_are_unique() {
        let kinds = [
            ExErrorKind::InvalidInput,
            ExErrorKind::Parse,
            ExErrorKind::Schema,
            ExErrorKind::NotFound,
            ExErrorKind::AlreadyExists,
            ExErrorKind::Io,
            ExErrorKind::Persistence,
            ExErrorKind::Serialization,
            ExErrorKind::Transport,
            ExErrorKind::Internal,
        ];
        let codes: std::collections::HashSet<_> = kinds.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_store_failure_classification() {
        assert!(ExErrorKind::Io.is_store_failure());
        assert!(ExErrorKind::AlreadyExists.is_store_failure());
        assert!(!ExErrorKind::Transport.is_store_failure());
        assert!(!ExErrorKind::Schema.is_store_failure());
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::Schema)
            .with_op("load_feed")
            .with_market("twse")
            .with_column("公司代號")
            .with_message("Required column is missing");
        let s = err.to_string();
        assert!(s.starts_with("[ERR_SCHEMA] in operation 'load_feed'"));
        assert!(s.contains("(market: twse)"));
        assert!(s.contains("(column: 公司代號)"));
    }

    #[test]
    fn test_source_chain_is_exposed() {
        use std::error::Error as _;
        let inner = ExError::new(ExErrorKind::Io).with_message("disk full");
        let outer = ExError::new(ExErrorKind::Persistence).with_source(inner);
        assert_eq!(outer.source_error().map(|e| e.kind()), Some(ExErrorKind::Io));
        assert!(outer.source().is_some());
    }
}
