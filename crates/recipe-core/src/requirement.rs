//! Requirement declarations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ManifestError, RequirementField};

/// Usage scope of a requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Needed to build the main targets
    #[default]
    Build,
    /// Only needed by test and benchmark targets
    Test,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Build => "build",
            Scope::Test => "test",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "build" => Ok(Scope::Build),
            "test" => Ok(Scope::Test),
            other => Err(format!("unknown scope '{}' (expected build or test)", other)),
        }
    }
}

/// One named, versioned dependency
///
/// Deserializes from either a table (`{ name, version, scope }`) or a
/// `name/version` reference string. Emptiness is not checked here; that is
/// left to [`crate::validate`] so every malformed declaration is reported the
/// same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RequirementDecl")]
pub struct Requirement {
    pub name: String,
    pub version: String,
    pub scope: Scope,
}

impl Requirement {
    pub fn new(name: impl Into<String>, version: impl Into<String>, scope: Scope) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            scope,
        }
    }

    /// Shorthand for a build-scoped requirement
    pub fn build(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(name, version, Scope::Build)
    }

    /// Shorthand for a test-scoped requirement
    pub fn test(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(name, version, Scope::Test)
    }

    /// Return a copy with a different scope
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// First missing field, if any
    pub(crate) fn missing_field(&self) -> Option<RequirementField> {
        if self.name.trim().is_empty() {
            Some(RequirementField::Name)
        } else if self.version.trim().is_empty() {
            Some(RequirementField::Version)
        } else {
            None
        }
    }

    /// Split `name/version` without checking either half
    fn split_reference(reference: &str) -> Self {
        match reference.split_once('/') {
            Some((name, version)) => Self::build(name.trim(), version.trim()),
            None => Self::build(reference.trim(), ""),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

impl FromStr for Requirement {
    type Err = ManifestError;

    /// Parse a `name/version` reference (always build-scoped)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.contains('/') {
            return Err(ManifestError::MalformedRequirement {
                reference: s.to_string(),
                field: RequirementField::Separator,
            });
        }

        let requirement = Self::split_reference(s);
        match requirement.missing_field() {
            Some(field) => Err(ManifestError::MalformedRequirement {
                reference: s.to_string(),
                field,
            }),
            None => Ok(requirement),
        }
    }
}

/// Accepted on-disk shapes of a requirement
#[derive(Deserialize)]
#[serde(untagged)]
enum RequirementDecl {
    Reference(String),
    Table {
        #[serde(default)]
        name: String,
        #[serde(default)]
        version: String,
        #[serde(default)]
        scope: Scope,
    },
}

impl From<RequirementDecl> for Requirement {
    fn from(decl: RequirementDecl) -> Self {
        match decl {
            RequirementDecl::Reference(reference) => Requirement::split_reference(&reference),
            RequirementDecl::Table {
                name,
                version,
                scope,
            } => Requirement::new(name.trim(), version.trim(), scope),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference() {
        let req: Requirement = "benchmark/1.8.3".parse().unwrap();
        assert_eq!(req.name, "benchmark");
        assert_eq!(req.version, "1.8.3");
        assert_eq!(req.scope, Scope::Build);
        assert_eq!(req.to_string(), "benchmark/1.8.3");
    }

    #[test]
    fn test_parse_reference_missing_parts() {
        let err = "catch2".parse::<Requirement>().unwrap_err();
        assert!(matches!(
            err,
            ManifestError::MalformedRequirement {
                field: RequirementField::Separator,
                ..
            }
        ));

        let err = "catch2/".parse::<Requirement>().unwrap_err();
        assert!(matches!(
            err,
            ManifestError::MalformedRequirement {
                field: RequirementField::Version,
                ..
            }
        ));

        let err = "/3.4.0".parse::<Requirement>().unwrap_err();
        assert!(matches!(
            err,
            ManifestError::MalformedRequirement {
                field: RequirementField::Name,
                ..
            }
        ));
    }

    #[test]
    fn test_deserialize_table_and_reference() {
        let reqs: Vec<Requirement> = serde_json::from_value(serde_json::json!([
            "benchmark/1.8.3",
            {"name": "catch2", "version": "3.4.0", "scope": "test"},
            {"name": "gsl", "version": "4.0.0"}
        ]))
        .unwrap();

        assert_eq!(reqs[0], Requirement::build("benchmark", "1.8.3"));
        assert_eq!(reqs[1], Requirement::test("catch2", "3.4.0"));
        assert_eq!(reqs[2].scope, Scope::Build);
    }

    #[test]
    fn test_table_fields_trimmed_like_references() {
        let reqs: Vec<Requirement> = serde_json::from_value(serde_json::json!([
            {"name": " gsl", "version": "4.0.0 "},
            " gsl / 4.1.0"
        ]))
        .unwrap();

        assert_eq!(reqs[0], Requirement::build("gsl", "4.0.0"));
        assert_eq!(reqs[1], Requirement::build("gsl", "4.1.0"));
    }

    #[test]
    fn test_deserialize_keeps_malformed_for_validation() {
        let reqs: Vec<Requirement> =
            serde_json::from_value(serde_json::json!(["catch2", {"name": "gsl"}])).unwrap();

        assert_eq!(reqs[0].missing_field(), Some(RequirementField::Version));
        assert_eq!(reqs[1].missing_field(), Some(RequirementField::Version));
    }

    #[test]
    fn test_unknown_scope_rejected() {
        let result: Result<Requirement, _> = serde_json::from_value(serde_json::json!(
            {"name": "catch2", "version": "3.4.0", "scope": "runtime"}
        ));
        assert!(result.is_err());
        assert!("runtime".parse::<Scope>().is_err());
    }

    #[test]
    fn test_serialize_as_table() {
        let json = serde_json::to_value(Requirement::test("catch2", "3.4.0")).unwrap();
        assert_eq!(json["name"], "catch2");
        assert_eq!(json["version"], "3.4.0");
        assert_eq!(json["scope"], "test");
    }
}
