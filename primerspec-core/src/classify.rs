//! Turns raw aligner output into classified primer hits.
//!
//! The aligner emits one record line per primer read; the forward and the
//! reverse read of a pair arrive as consecutive lines. A record with fewer
//! than [`MIN_ALIGNED_FIELDS`] whitespace-separated fields means the read
//! did not align at all, which is an expected outcome and not an error.

use crate::errors::PipelineError;
use crate::models::hit::PrimerHit;
use crate::models::primer::{PairId, PairRegistry};
use crate::models::region::InclusionWindow;
use crate::significance::{SignificanceThresholds, is_significant, tokenize};

/// An aligned record carries 11 mandatory fields plus at least the two
/// optional tags up to and including the mismatch encoding.
pub const MIN_ALIGNED_FIELDS: usize = 13;

const NAME_FIELD: usize = 0;
const REFERENCE_FIELD: usize = 2;
const START_FIELD: usize = 3;
const END_FIELD: usize = 7;
const LENGTH_FIELD: usize = 8;
const MISMATCH_FIELD: usize = 12;

/// How the primers entering this run were obtained. Drives the
/// expected/unexpected decision for each hit.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum PrimerProvenance {
    /// Designed from the sequence the aligner index was built from.
    Designed,
    /// Designed from an additional sequence the index does not contain;
    /// positional verification is impossible, every hit is unexpected.
    UnindexedSource,
    /// Supplied pre-made by the user; the exact target sequence id is
    /// unknown, so reference ids are matched by prefix.
    Preset,
}

/// Everything the classifier needs besides the record pair itself.
pub struct ClassifyContext<'a> {
    pub registry: &'a PairRegistry,
    pub window: &'a InclusionWindow,
    pub thresholds: &'a SignificanceThresholds,
    /// Full id of the target sequence, or the user-supplied prefix when
    /// primers are preset.
    pub expected_reference: &'a str,
    pub provenance: PrimerProvenance,
}

struct AlignedRead<'a> {
    name: &'a str,
    reference: &'a str,
    start: i64,
    end: i64,
    length: i64,
    mismatch_encoding: &'a str,
}

fn parse_int(field: &str, line: &str) -> Result<i64, PipelineError> {
    field
        .parse::<i64>()
        .map_err(|_| PipelineError::MalformedAlignment(line.to_string()))
}

/// Extracts the interesting fields of one record line. `Ok(None)` means the
/// read did not align.
fn parse_read(line: &str) -> Result<Option<AlignedRead<'_>>, PipelineError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_ALIGNED_FIELDS {
        return Ok(None);
    }

    // the mismatch encoding is the third colon-separated part of the tag
    let mismatch_encoding = fields[MISMATCH_FIELD]
        .split(':')
        .nth(2)
        .ok_or_else(|| PipelineError::MalformedAlignment(line.to_string()))?;

    Ok(Some(AlignedRead {
        name: fields[NAME_FIELD],
        reference: fields[REFERENCE_FIELD],
        start: parse_int(fields[START_FIELD], line)?,
        end: parse_int(fields[END_FIELD], line)?,
        length: parse_int(fields[LENGTH_FIELD], line)?,
        mismatch_encoding,
    }))
}

/// Judges one (forward, reverse) record pair. Returns `Ok(None)` when there
/// is no hit: either read unaligned, or either side failing the significance
/// thresholds. A registry miss is a defect in the pipeline wiring and fails
/// the run.
pub fn classify_pair(
    forward_line: &str,
    reverse_line: &str,
    ctx: &ClassifyContext<'_>,
) -> Result<Option<PrimerHit>, PipelineError> {
    let (Some(forward), Some(reverse)) = (parse_read(forward_line)?, parse_read(reverse_line)?)
    else {
        return Ok(None);
    };

    let forward_tokens = tokenize(forward.mismatch_encoding);
    let reverse_tokens = tokenize(reverse.mismatch_encoding);
    if !is_significant(&forward_tokens, ctx.thresholds)
        || !is_significant(&reverse_tokens, ctx.thresholds)
    {
        return Ok(None);
    }

    let pair_id = PairId::new(forward.name, reverse.name);
    let pair = ctx
        .registry
        .get(&pair_id)
        .ok_or_else(|| PipelineError::UnknownPair(pair_id.to_string()))?;

    // positions and reference id are taken from the forward read; the
    // reverse read's alignment only contributed its significance
    let expected = match ctx.provenance {
        PrimerProvenance::UnindexedSource => false,
        PrimerProvenance::Preset => {
            ctx.window.contains(forward.start, forward.end)
                && forward.reference.starts_with(ctx.expected_reference)
        }
        PrimerProvenance::Designed => {
            ctx.window.contains(forward.start, forward.end)
                && forward.reference == ctx.expected_reference
        }
    };

    // the aligner reports the 5' coordinate of the reverse read; extend the
    // stop to cover the full amplicon
    let stop = forward.end + pair.reverse.len() as i64;

    Ok(Some(PrimerHit {
        forward_id: forward.name.to_string(),
        reverse_id: reverse.name.to_string(),
        pair: pair_id,
        reference: forward.reference.to_string(),
        forward_seq: pair.forward.clone(),
        reverse_seq: pair.reverse.clone(),
        start: forward.start,
        stop,
        product_length: forward.length,
        expected,
    }))
}
