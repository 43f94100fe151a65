use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;

use primerspec_core::config::{FileConfig, Overrides, RunConfig};
use primerspec_core::pipeline::{self, CheckOptions};

/// Loaded when present even without -c/--config, like the tool's rc file.
pub const DEFAULT_CONFIG: &str = "primerspec.toml";

fn int_pair(matches: &ArgMatches, id: &str) -> Option<(i64, i64)> {
    let values: Vec<i64> = matches.get_many::<i64>(id)?.copied().collect();
    Some((values[0], values[1]))
}

pub fn load_file_config(matches: &ArgMatches) -> Result<FileConfig> {
    match matches.get_one::<String>("config") {
        Some(path) => {
            log::info!("Reading config from file: {}", path);
            Ok(FileConfig::load(Path::new(path))?)
        }
        None if Path::new(DEFAULT_CONFIG).is_file() => {
            log::info!("Reading config from default file: {}", DEFAULT_CONFIG);
            Ok(FileConfig::load(Path::new(DEFAULT_CONFIG))?)
        }
        None => {
            log::info!("No config file passed or found");
            Ok(FileConfig::default())
        }
    }
}

pub fn resolve_run_config(matches: &ArgMatches) -> Result<RunConfig> {
    let file = load_file_config(matches)?;
    let overrides = Overrides {
        position: int_pair(matches, "pos"),
        size: int_pair(matches, "size"),
        last_must_match: matches.get_one::<u32>("last-must-match").copied(),
        last_to_check: matches.get_one::<u32>("last-to-check").copied(),
        last_max_error: matches.get_one::<u32>("last-max-error").copied(),
        match_limit: matches.get_one::<usize>("match-limit").copied(),
    };
    Ok(RunConfig::resolve(file, &overrides)?)
}

pub fn run_check(matches: &ArgMatches) -> Result<()> {
    let config = resolve_run_config(matches)?;

    let fasta = matches
        .get_one::<String>("fasta")
        .expect("A path to a FASTA file is required.");

    let opts = CheckOptions {
        fasta: PathBuf::from(fasta),
        sequence_prefix: matches.get_one::<String>("sequence").cloned(),
        additional_fasta: matches
            .get_one::<String>("additional-fasta")
            .map(PathBuf::from),
        index: matches.get_one::<String>("index").map(PathBuf::from),
        primer_prefix: matches
            .get_one::<String>("primerfiles")
            .expect("has a default value")
            .clone(),
        keep_primers: matches.get_flag("keep-primer"),
        primer3_exec: matches
            .get_one::<String>("primer3")
            .expect("has a default value")
            .clone(),
        bowtie_exec: matches
            .get_one::<String>("bowtie")
            .expect("has a default value")
            .clone(),
        show_aligner_output: matches.get_flag("show-bowtie-output"),
    };

    let mut output: Box<dyn Write> = match matches.get_one::<String>("output") {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file: {path}"))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    pipeline::run_check(&config, &opts, &mut output)?;
    output.flush()?;
    Ok(())
}
