//! Adapter for the external short-read aligner (bowtie).
//!
//! Primer pairs are aligned as paired-end FASTA reads against a prebuilt
//! index; the headerless record output is handed back line by line for
//! classification. Index building is handled here as well, via the
//! aligner's companion `-build` executable.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Result;

use crate::errors::PipelineError;
use crate::fasta::primer_file_names;
use crate::models::region::ProductSizeRange;

pub const DEFAULT_BOWTIE: &str = "bowtie";
pub const DEFAULT_INDEX_DIR: &str = "bowtie-index";

/// Alignments to report per read; high enough that the per-pair match limit
/// is what cuts the result set, not the aligner.
const REPORT_ALIGNMENTS: &str = "5000";

/// Where an index for the given FASTA file lives by default.
pub fn default_index_prefix(fasta: &Path) -> PathBuf {
    let stem = fasta
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("sequences");
    Path::new(DEFAULT_INDEX_DIR).join(format!("{stem}_bowtie"))
}

/// An index exists when its first forward-strand segment file does.
pub fn index_exists(prefix: &Path) -> bool {
    let mut probe = prefix.as_os_str().to_os_string();
    probe.push(".1.ebwt");
    Path::new(&probe).is_file()
}

/// Builds a new index for `fasta` at `index_prefix` with `{bowtie}-build`.
pub fn build_index(bowtie: &str, fasta: &Path, index_prefix: &Path, verbose: bool) -> Result<()> {
    if let Some(parent) = index_prefix.parent() {
        fs::create_dir_all(parent)?;
    }

    let builder = format!("{bowtie}-build");
    let mut command = Command::new(&builder);
    command.arg(fasta).arg(index_prefix);
    if !verbose {
        command.stdout(Stdio::null()).stderr(Stdio::null());
    }
    log::info!("Index build command: {:?}", command);

    let status = command.status().map_err(|e| PipelineError::ToolFailed {
        tool: builder.clone(),
        message: e.to_string(),
    })?;
    if !status.success() {
        return Err(PipelineError::ToolFailed {
            tool: builder,
            message: format!("exited with {status}"),
        }
        .into());
    }
    Ok(())
}

/// The argument list for one paired-end alignment run. The insert size is
/// bounded by the product size range so the aligner itself discards pairs
/// that could never be a plausible product.
pub fn aligner_args(
    index: &Path,
    files_prefix: &str,
    size: &ProductSizeRange,
    quiet: bool,
) -> Vec<String> {
    let (left, right) = primer_file_names(files_prefix);
    let mut args = vec![
        "-k".to_string(),
        REPORT_ALIGNMENTS.to_string(),
        "-S".to_string(),
        "-f".to_string(),
        index.display().to_string(),
        "-1".to_string(),
        left.display().to_string(),
        "-2".to_string(),
        right.display().to_string(),
        "--sam-nohead".to_string(),
        "--minins".to_string(),
        size.min.to_string(),
        "--maxins".to_string(),
        size.max.to_string(),
    ];
    if quiet {
        args.push("--quiet".to_string());
    }
    args
}

/// Runs the aligner and returns its record output line by line.
pub fn run_aligner(
    bowtie: &str,
    index: &Path,
    files_prefix: &str,
    size: &ProductSizeRange,
    quiet: bool,
) -> Result<Vec<String>> {
    let args = aligner_args(index, files_prefix, size, quiet);
    log::info!("Calling aligner: {} {}", bowtie, args.join(" "));

    let output = Command::new(bowtie)
        .args(&args)
        .output()
        .map_err(|e| PipelineError::ToolFailed {
            tool: bowtie.to_string(),
            message: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(PipelineError::ToolFailed {
            tool: bowtie.to_string(),
            message: format!(
                "exited with {}: {}. Maybe a corrupt index?",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        }
        .into());
    }

    let summary = String::from_utf8_lossy(&output.stderr);
    if !quiet && !summary.trim().is_empty() {
        log::info!("Aligner summary:\n{}", summary.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect())
}

/// The forward and reverse read of one pair arrive as consecutive lines; a
/// dangling final line (odd count) cannot form a pair and is dropped.
pub fn pair_records(lines: &[String]) -> Vec<(&str, &str)> {
    lines
        .chunks_exact(2)
        .map(|chunk| (chunk[0].as_str(), chunk[1].as_str()))
        .collect()
}
