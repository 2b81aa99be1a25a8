//! Writes generated settings to disk.
//!
//! Output directory layout:
//!
//! ```text
//! <out_dir>/
//!   generated_config.json      whole GeneratedConfig
//!   CMakeDeps.json             one file per generator group
//!   CMakeToolchain.json
//!   generated_config.sha256    JCS digest of generated_config.json
//! ```

use log::info;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use recipe_core::GeneratedConfig;

/// Whole-config file name
pub const CONFIG_FILE: &str = "generated_config.json";

/// Digest file name
pub const DIGEST_FILE: &str = "generated_config.sha256";

/// Emission errors
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid generator name for a file: {0:?}")]
    InvalidGeneratorName(String),
}

/// Files written by [`emit`]
#[derive(Debug, Clone, Serialize)]
pub struct EmitReport {
    pub out_dir: PathBuf,

    /// Written paths, in write order
    pub written: Vec<PathBuf>,

    pub digest: String,
}

/// Write `config` into `out_dir`, creating it if needed.
pub fn emit(config: &GeneratedConfig, out_dir: &Path) -> Result<EmitReport, EmitError> {
    if let Some(bad) = config.generators.keys().find(|g| !is_safe_file_stem(g)) {
        return Err(EmitError::InvalidGeneratorName(bad.clone()));
    }

    fs::create_dir_all(out_dir).map_err(|source| EmitError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();

    let config_path = out_dir.join(CONFIG_FILE);
    write_file(&config_path, config.to_json()?)?;
    written.push(config_path);

    for (generator, group) in &config.generators {
        let path = out_dir.join(format!("{}.json", generator));
        write_file(&path, serde_json::to_string_pretty(group)?)?;
        written.push(path);
    }

    let digest = config.digest()?;
    let digest_path = out_dir.join(DIGEST_FILE);
    write_file(&digest_path, format!("{}  {}\n", digest, CONFIG_FILE))?;
    written.push(digest_path);

    info!("Wrote {} generated file(s) to {}", written.len(), out_dir.display());

    Ok(EmitReport {
        out_dir: out_dir.to_path_buf(),
        written,
        digest,
    })
}

fn write_file(path: &Path, contents: String) -> Result<(), EmitError> {
    fs::write(path, contents).map_err(|source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_safe_file_stem(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}
