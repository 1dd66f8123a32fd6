//! Run output reporting.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use shipmate_core::RunOutputs;

/// Prints the outputs as `key=value` lines and appends them to `GITHUB_OUTPUT` when set.
pub fn report(outputs: &RunOutputs) -> Result<()> {
    let pairs = outputs.pairs();
    for (key, value) in &pairs {
        println!("{key}={value}");
    }

    if let Some(path) = std::env::var_os("GITHUB_OUTPUT").filter(|p| !p.is_empty()) {
        let path = Path::new(&path);
        append(path, &pairs)
            .with_context(|| format!("failed to write outputs to {}", path.display()))?;
    }

    Ok(())
}

fn append(path: &Path, pairs: &[(&str, String)]) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for (key, value) in pairs {
        writeln!(file, "{key}={value}")?;
    }
    Ok(())
}
