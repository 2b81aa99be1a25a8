//! Requirement override resolution.
//!
//! Later declarations of a name replace earlier ones, but the entry keeps
//! the position where the name was first declared. There is no version
//! solving beyond that.

use log::debug;
use std::collections::HashMap;

use crate::manifest::Manifest;
use crate::requirement::Requirement;

/// Merge requirements by name, last-declared-wins, in first-seen order
pub fn resolve_requirements(manifest: &Manifest) -> Vec<Requirement> {
    resolve_declarations(&manifest.requires)
}

pub(crate) fn resolve_declarations(declarations: &[Requirement]) -> Vec<Requirement> {
    let mut resolved: Vec<Requirement> = Vec::with_capacity(declarations.len());
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for requirement in declarations {
        match positions.get(requirement.name.as_str()) {
            Some(&index) => {
                debug!("Requirement {} overrides {}", requirement, resolved[index]);
                resolved[index] = requirement.clone();
            }
            None => {
                positions.insert(requirement.name.as_str(), resolved.len());
                resolved.push(requirement.clone());
            }
        }
    }

    resolved
}
