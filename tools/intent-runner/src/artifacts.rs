//! Loading of compiled contract artifacts (creation bytecode + ABI descriptor).
//!
//! Both Hardhat (`"bytecode": "0x…"`) and Foundry (`"bytecode": {"object": "0x…"}`) layouts
//! are understood. An artifact is found by its exact `<Name>.json` file name anywhere below the
//! store root, so Hardhat's `contracts/<path>/<Name>.sol/` nesting and flat Foundry directories
//! both resolve, and `<Name>.dbg.json` debug files never match.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact `{name}` not found under {}", .dir.display())]
    NotFound { name: String, dir: PathBuf },

    #[error("artifact `{name}` is ambiguous, {} files match: {matches:?}", .matches.len())]
    Ambiguous { name: String, matches: Vec<PathBuf> },

    #[error("failed reading {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed parsing artifact JSON in {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact `{name}` has invalid bytecode hex")]
    InvalidHex {
        name: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("artifact `{name}` has no creation bytecode (interface or abstract contract?)")]
    EmptyBytecode { name: String },

    #[error("artifact `{name}` has unlinked library placeholders")]
    Unlinked { name: String },
}

#[derive(Deserialize)]
struct RawArtifact {
    #[serde(default)]
    abi: Vec<AbiEntry>,
    bytecode: RawBytecode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object { object: String },
}

#[derive(Clone, Debug, Deserialize)]
pub struct AbiEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Artifact {
    pub name: String,
    pub path: PathBuf,
    pub abi: Vec<AbiEntry>,
    pub bytecode: Vec<u8>,
}

impl Artifact {
    /// Whether the ABI descriptor declares a function called `name`.
    pub fn has_function(&self, name: &str) -> bool {
        self.abi
            .iter()
            .any(|e| e.kind == "function" && e.name.as_deref() == Some(name))
    }
}

#[derive(Clone, Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn load(&self, name: &str) -> Result<Artifact, ArtifactError> {
        let file_name = format!("{name}.json");
        let mut matches = Vec::new();
        find_files(&self.dir, &file_name, &mut matches)?;
        matches.sort();

        match matches.len() {
            0 => Err(ArtifactError::NotFound {
                name: name.to_string(),
                dir: self.dir.clone(),
            }),
            1 => load_from_path(name, &matches[0]),
            _ => Err(ArtifactError::Ambiguous {
                name: name.to_string(),
                matches,
            }),
        }
    }
}

/// Collects every regular file called `file_name` below `dir`. Symlinked directories are not
/// followed; a missing root yields no matches.
fn find_files(dir: &Path, file_name: &str, out: &mut Vec<PathBuf>) -> Result<(), ArtifactError> {
    let read_err = |source| ArtifactError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(read_err(e)),
    };

    for entry in entries {
        let entry = entry.map_err(read_err)?;
        let file_type = entry.file_type().map_err(read_err)?;
        let path = entry.path();
        if file_type.is_dir() {
            find_files(&path, file_name, out)?;
        } else if file_type.is_file() && entry.file_name().to_str() == Some(file_name) {
            out.push(path);
        }
    }
    Ok(())
}

fn load_from_path(name: &str, path: &Path) -> Result<Artifact, ArtifactError> {
    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: RawArtifact = serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let hex_str = match parsed.bytecode {
        RawBytecode::Hex(s) => s,
        RawBytecode::Object { object } => object,
    };
    let bytecode = decode_bytecode(name, &hex_str)?;

    Ok(Artifact {
        name: name.to_string(),
        path: path.to_path_buf(),
        abi: parsed.abi,
        bytecode,
    })
}

fn decode_bytecode(name: &str, s: &str) -> Result<Vec<u8>, ArtifactError> {
    let trimmed = s.trim();
    let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if stripped.contains("__") {
        return Err(ArtifactError::Unlinked {
            name: name.to_string(),
        });
    }
    if stripped.is_empty() {
        return Err(ArtifactError::EmptyBytecode {
            name: name.to_string(),
        });
    }
    hex::decode(stripped).map_err(|source| ArtifactError::InvalidHex {
        name: name.to_string(),
        source,
    })
}
