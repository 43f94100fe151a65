//! The one-shot batch pipeline: solve geometry, obtain primers, align,
//! classify, aggregate, report. Single-threaded; the only blocking steps
//! are the two external tool invocations. A configuration error aborts
//! before any external tool runs.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::align;
use crate::classify::{ClassifyContext, PrimerProvenance, classify_pair};
use crate::config::RunConfig;
use crate::design;
use crate::fasta;
use crate::models::primer::{PairId, PairRegistry, PrimerPair};
use crate::models::region::RegionPlan;
use crate::report;

pub const DEFAULT_PRIMER_PREFIX: &str = "primerspec";

/// Runtime parameters of one `check` run, as opposed to the numeric
/// constraints carried by [`RunConfig`].
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// The FASTA file the aligner index covers.
    pub fasta: PathBuf,
    /// Prefix of the id of the sequence to design primers for.
    pub sequence_prefix: Option<String>,
    /// Design primers from this sequence instead; it is not part of the
    /// index, so no hit can be verified positionally.
    pub additional_fasta: Option<PathBuf>,
    /// Existing aligner index to use instead of probing/building.
    pub index: Option<PathBuf>,
    /// Prefix for the primer pair files written or re-read.
    pub primer_prefix: String,
    /// Re-use the primer files from a previous run instead of designing.
    pub keep_primers: bool,
    pub primer3_exec: String,
    pub bowtie_exec: String,
    /// Pass the aligner's raw record output through to stderr.
    pub show_aligner_output: bool,
}

pub fn run_check<W: Write>(config: &RunConfig, opts: &CheckOptions, output: &mut W) -> Result<()> {
    let plan = RegionPlan::solve(config.target, config.size)?;
    log::debug!(
        "Solved region geometry: inclusion window {}, pair regions {}",
        plan.window,
        plan.pair_ok
    );

    let (registry, expected_reference, provenance) = obtain_primers(config, opts, &plan)?;

    let index = match &opts.index {
        Some(prefix) => {
            log::info!("Using existing aligner index {}", prefix.display());
            prefix.clone()
        }
        None => {
            let prefix = align::default_index_prefix(&opts.fasta);
            if align::index_exists(&prefix) {
                log::info!("Found existing aligner index at {}", prefix.display());
            } else {
                log::info!("No aligner index found, building one at {}", prefix.display());
                align::build_index(
                    &opts.bowtie_exec,
                    &opts.fasta,
                    &prefix,
                    log::log_enabled!(log::Level::Debug),
                )?;
            }
            prefix
        }
    };

    let quiet = !log::log_enabled!(log::Level::Info);
    let lines = align::run_aligner(
        &opts.bowtie_exec,
        &index,
        &opts.primer_prefix,
        &config.size,
        quiet,
    )?;
    if opts.show_aligner_output {
        for line in &lines {
            eprintln!("{line}");
        }
    }

    let ctx = ClassifyContext {
        registry: &registry,
        window: &plan.window,
        thresholds: &config.thresholds,
        expected_reference: &expected_reference,
        provenance,
    };
    let mut hits = Vec::new();
    for (forward, reverse) in align::pair_records(&lines) {
        if let Some(hit) = classify_pair(forward, reverse, &ctx)? {
            hits.push(hit);
        }
    }
    log::info!(
        "{} significant hits across {} primer pairs",
        hits.len(),
        registry.len()
    );

    let groups = report::aggregate(hits, config.match_limit);
    report::write_report(output, &groups)?;
    Ok(())
}

/// Either designs fresh primer pairs (writing them to the primer files) or
/// re-reads the files from an earlier run. Returns the registry, the
/// reference id hits are expected on, and the provenance for the
/// expected/unexpected rule.
fn obtain_primers(
    config: &RunConfig,
    opts: &CheckOptions,
    plan: &RegionPlan,
) -> Result<(PairRegistry, String, PrimerProvenance)> {
    if opts.keep_primers {
        log::info!(
            "Re-reading primer pairs from files with prefix '{}'",
            opts.primer_prefix
        );
        log::warn!(
            "Expected-hit classification for pre-existing primers uses the configured \
             target region and the sequence id prefix given with -s, matched against \
             reported reference ids by prefix"
        );
        let registry = fasta::read_primer_files(&opts.primer_prefix)?;
        let expected = opts.sequence_prefix.clone().unwrap_or_default();
        // an additional, unindexed source still rules out positional checks
        let provenance = if opts.additional_fasta.is_some() {
            PrimerProvenance::UnindexedSource
        } else {
            PrimerProvenance::Preset
        };
        return Ok((registry, expected, provenance));
    }

    let (source, provenance) = match &opts.additional_fasta {
        Some(path) => {
            log::info!(
                "Designing primers from additional sequence file {}",
                path.display()
            );
            log::warn!(
                "The additional sequence is not part of the aligner index, so no hit \
                 can be verified positionally; every hit will be reported as unexpected"
            );
            (path.as_path(), PrimerProvenance::UnindexedSource)
        }
        None => (opts.fasta.as_path(), PrimerProvenance::Designed),
    };

    let (template, sequence_id) = fasta::find_sequence(source, opts.sequence_prefix.as_deref())?;
    log::info!("Designing primers for sequence '{}'", sequence_id);

    let designed = design::design_primers(&opts.primer3_exec, &template, plan, &config.primer3)?;
    if designed.is_empty() {
        log::warn!("Design engine returned no primer pairs");
    }

    let (left_path, right_path) = fasta::primer_file_names(&opts.primer_prefix);
    fasta::write_fasta(
        &left_path,
        designed
            .iter()
            .map(|pair| (pair.left_name.as_str(), pair.left_seq.as_str())),
    )?;
    fasta::write_fasta(
        &right_path,
        designed
            .iter()
            .map(|pair| (pair.right_name.as_str(), pair.right_seq.as_str())),
    )?;
    log::debug!(
        "Wrote {} primer pairs to {} and {}",
        designed.len(),
        left_path.display(),
        right_path.display()
    );

    let mut registry = PairRegistry::default();
    for pair in designed {
        registry.insert(
            PairId::new(&pair.left_name, &pair.right_name),
            PrimerPair {
                forward: pair.left_seq,
                reverse: pair.right_seq,
            },
        );
    }

    Ok((registry, sequence_id, provenance))
}
