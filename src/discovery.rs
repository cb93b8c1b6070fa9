// WHY: CLI inputs are literal paths or glob patterns; both resolve to a sorted,
// de-duplicated list of regular files before any loading starts

use anyhow::{anyhow, Result};
use glob::glob;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration for input discovery
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    /// Abort on the first unreadable glob entry instead of skipping it
    pub fail_fast: bool,
}

/// Resolve each input to the files it names
///
/// An existing path is taken as-is; anything else is expanded as a glob
/// pattern. An input that resolves to nothing is an error.
pub fn resolve_inputs<S: AsRef<str>>(inputs: &[S], config: &DiscoveryConfig) -> Result<Vec<PathBuf>> {
    let mut resolved = BTreeSet::new();

    for input in inputs {
        let input = input.as_ref();
        let literal = Path::new(input);
        if literal.exists() {
            if !literal.is_file() {
                return Err(anyhow!("Input is not a file: {}", literal.display()));
            }
            debug!("Found file: {}", literal.display());
            resolved.insert(literal.to_path_buf());
            continue;
        }

        let matched = expand_pattern(input, config)?;
        if matched.is_empty() {
            return Err(anyhow!("No files match input: {input}"));
        }
        resolved.extend(matched);
    }

    info!("Input discovery completed: {} files", resolved.len());
    Ok(resolved.into_iter().collect())
}

fn expand_pattern(pattern: &str, config: &DiscoveryConfig) -> Result<Vec<PathBuf>> {
    debug!("Expanding glob pattern: {}", pattern);
    let paths = glob(pattern).map_err(|e| anyhow!("Failed to create glob pattern {pattern}: {e}"))?;

    let mut matched = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) if path.is_file() => matched.push(path),
            Ok(path) => debug!("Skipping non-file match: {}", path.display()),
            Err(e) => {
                let error_msg = format!("Glob iteration error: {e}");
                if config.fail_fast {
                    return Err(anyhow!(error_msg));
                }
                warn!("{}", error_msg);
            }
        }
    }
    Ok(matched)
}
