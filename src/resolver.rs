use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::ResolutionStrategy;
use crate::error::ReportError;

/// One of the three input exports and how to find it in the data folder.
#[derive(Debug, Clone, Copy)]
pub struct InputKind {
    pub label: &'static str,
    /// Case-insensitive file name prefixes, for newest-file discovery.
    pub prefixes: &'static [&'static str],
    /// Fixed file name used by the legacy layout.
    pub legacy_name: &'static str,
}

pub const CONTRACTS: InputKind = InputKind {
    label: "contracts",
    prefixes: &["contracts"],
    legacy_name: "contract.csv",
};

pub const LICENSES: InputKind = InputKind {
    label: "licenses",
    prefixes: &["licenses"],
    legacy_name: "license.csv",
};

pub const FINANCE: InputKind = InputKind {
    label: "finance",
    prefixes: &["finance", "finances"],
    legacy_name: "finance.csv",
};

/// Input files selected for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInputs {
    pub contracts: PathBuf,
    pub licenses: PathBuf,
    pub finance: PathBuf,
}

/// Locate all three inputs in `dir` according to `strategy`.
///
/// `output_name` is the file the run is about to write; discovery never
/// selects it even when it shares an input prefix.
pub fn resolve_inputs(
    dir: &Path,
    strategy: ResolutionStrategy,
    output_name: &str,
) -> Result<ResolvedInputs> {
    Ok(ResolvedInputs {
        contracts: resolve(dir, &CONTRACTS, strategy, output_name)?,
        licenses: resolve(dir, &LICENSES, strategy, output_name)?,
        finance: resolve(dir, &FINANCE, strategy, output_name)?,
    })
}

/// Locate a single input.
///
/// `Newest` picks the most recently modified file whose name starts with one
/// of the kind's prefixes, falling back to the legacy file name. `Fixed` only
/// accepts the legacy file name.
pub fn resolve(
    dir: &Path,
    kind: &InputKind,
    strategy: ResolutionStrategy,
    output_name: &str,
) -> Result<PathBuf> {
    if strategy == ResolutionStrategy::Newest {
        if let Some(path) = newest_matching(dir, kind.prefixes, output_name)? {
            info!("{}: selected {}", kind.label, path.display());
            return Ok(path);
        }
    }

    let legacy = dir.join(kind.legacy_name);
    if legacy.is_file() {
        debug!("{}: using legacy file {}", kind.label, legacy.display());
        return Ok(legacy);
    }

    let prefixes = match strategy {
        ResolutionStrategy::Newest => kind.prefixes.iter().map(|p| format!("{}*", p)).collect(),
        ResolutionStrategy::Fixed => vec![kind.legacy_name.to_string()],
    };
    Err(ReportError::NoMatchingFile {
        prefixes,
        dir: dir.to_path_buf(),
        available: list_files(dir)?,
    }
    .into())
}

/// Newest regular file in `dir` whose name starts with any of `prefixes`,
/// compared case-insensitively. Symlinks are followed. A file named `skip`
/// (case-insensitively) is never returned. Identical timestamps resolve to
/// the lexicographically greatest name.
pub fn newest_matching(dir: &Path, prefixes: &[&str], skip: &str) -> Result<Option<PathBuf>> {
    let prefixes: Vec<String> = prefixes.iter().map(|p| p.to_lowercase()).collect();
    let skip = skip.to_lowercase();
    let mut best: Option<(SystemTime, String, PathBuf)> = None;

    for entry in read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let lower = name.to_lowercase();
        if !prefixes.iter().any(|p| lower.starts_with(p.as_str())) {
            continue;
        }
        if lower == skip {
            debug!("skipping {}: it is this run's output", name);
            continue;
        }

        let Some(meta) = file_metadata(&entry.path()) else {
            continue;
        };
        let modified = meta.modified()?;

        let newer = match &best {
            None => true,
            Some((t, n, _)) => (modified, &name) > (*t, n),
        };
        if newer {
            best = Some((modified, name, entry.path()));
        }
    }

    Ok(best.map(|(_, _, path)| path))
}

fn read_dir(dir: &Path) -> Result<std::fs::ReadDir> {
    std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))
}

/// Metadata of `path` after following symlinks, if it is a regular file.
/// Dangling links are skipped.
fn file_metadata(path: &Path) -> Option<std::fs::Metadata> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Some(meta),
        Ok(_) => None,
        Err(err) => {
            debug!("skipping {}: {}", path.display(), err);
            None
        }
    }
}

/// Sorted names of the regular files in `dir`.
fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in read_dir(dir)? {
        let entry = entry?;
        if file_metadata(&entry.path()).is_some() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
