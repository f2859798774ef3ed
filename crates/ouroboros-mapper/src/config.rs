//! Configuration options for schema loading

// ============================================================================
// Extra Field Handling
// ============================================================================

/// How `Schema::load` treats input keys that name no field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraFields {
    /// Fail with an excess field error (default)
    #[default]
    Forbid,
    /// Skip unknown keys
    Ignore,
}

// ============================================================================
// Schema Config
// ============================================================================

/// Per-schema options, fixed when the schema is built
#[derive(Debug, Clone, Default)]
pub struct SchemaConfig {
    /// How to handle extra input keys
    pub extra: ExtraFields,

    /// Check every declared default against its field at build time
    pub validate_defaults: bool,
}

impl SchemaConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extra field handling
    pub fn extra(mut self, extra: ExtraFields) -> Self {
        self.extra = extra;
        self
    }

    /// Skip unknown input keys instead of failing
    pub fn ignore_extra(mut self) -> Self {
        self.extra = ExtraFields::Ignore;
        self
    }

    /// Enable default validation at build time
    pub fn validate_defaults(mut self, validate: bool) -> Self {
        self.validate_defaults = validate;
        self
    }
}
