//! Manifest error registry.

use crate::requirement::Scope;

/// Stable error codes for manifest failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// `minimum_standard` outside the supported set
    UnsupportedStandard,
    /// Requirement with an empty name or version
    MalformedRequirement,
    /// Same requirement name declared with two scopes
    DuplicateScopeConflict,
    /// Compiler standard below the manifest minimum
    InsufficientStandard,
}

impl ErrorCode {
    /// Returns the string representation of the error code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnsupportedStandard => "UNSUPPORTED_STANDARD",
            ErrorCode::MalformedRequirement => "MALFORMED_REQUIREMENT",
            ErrorCode::DuplicateScopeConflict => "DUPLICATE_SCOPE_CONFLICT",
            ErrorCode::InsufficientStandard => "INSUFFICIENT_STANDARD",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which part of a requirement was malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementField {
    Name,
    Version,
    /// Reference string without a `/` separator
    Separator,
}

impl std::fmt::Display for RequirementField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequirementField::Name => write!(f, "name"),
            RequirementField::Version => write!(f, "version"),
            RequirementField::Separator => write!(f, "'/' separator"),
        }
    }
}

/// Errors raised while validating a manifest
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    #[error("Unsupported language standard {standard}; supported: {supported:?}")]
    UnsupportedStandard {
        standard: u32,
        supported: &'static [u32],
    },

    #[error("Malformed requirement {reference:?}: missing {field}")]
    MalformedRequirement {
        /// Position in the declaration list, or the raw reference string
        reference: String,
        field: RequirementField,
    },

    #[error("Requirement {name} declared with conflicting scopes {first} and {second}")]
    DuplicateScopeConflict {
        name: String,
        first: Scope,
        second: Scope,
    },

    #[error("Compiler standard {compiler} is below the required minimum {minimum}")]
    InsufficientStandard { compiler: u32, minimum: u32 },
}

impl ManifestError {
    /// Returns the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            ManifestError::UnsupportedStandard { .. } => ErrorCode::UnsupportedStandard,
            ManifestError::MalformedRequirement { .. } => ErrorCode::MalformedRequirement,
            ManifestError::DuplicateScopeConflict { .. } => ErrorCode::DuplicateScopeConflict,
            ManifestError::InsufficientStandard { .. } => ErrorCode::InsufficientStandard,
        }
    }
}
