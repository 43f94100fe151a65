//! Adapter for the external primer design engine (primer3).
//!
//! The engine is driven over Boulder-IO: one `KEY=value` record on stdin,
//! terminated by a lone `=`, answered by `KEY=value` lines on stdout. Only
//! the generated primer sequences are of interest here; every other output
//! key is ignored.

use std::collections::BTreeMap;
use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::Result;

use crate::config::Primer3Settings;
use crate::errors::PipelineError;
use crate::models::region::RegionPlan;

pub const DEFAULT_PRIMER3: &str = "primer3_core";

const SEQUENCE_ID: &str = "primerspec";

/// One generated pair, in the engine's output order. Names are the engine's
/// output keys (`PRIMER_LEFT_<n>_SEQUENCE` and friends) so that alignment
/// records can be traced back to the pair they belong to.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DesignedPair {
    pub left_name: String,
    pub left_seq: String,
    pub right_name: String,
    pub right_seq: String,
}

/// Renders the Boulder-IO input record for one design request.
pub fn boulder_record(template: &str, plan: &RegionPlan, settings: &Primer3Settings) -> String {
    let mut record = String::new();
    record.push_str(&format!("SEQUENCE_ID={SEQUENCE_ID}\n"));
    record.push_str(&format!("SEQUENCE_TEMPLATE={template}\n"));
    record.push_str(&format!("SEQUENCE_INCLUDED_REGION={}\n", plan.window));
    record.push_str(&format!(
        "SEQUENCE_PRIMER_PAIR_OK_REGION_LIST={}\n",
        plan.pair_ok
    ));
    record.push_str(&format!(
        "PRIMER_PRODUCT_SIZE_RANGE={}-{}\n",
        plan.size.min, plan.size.max
    ));

    if let Some(num_return) = settings.num_return {
        record.push_str(&format!("PRIMER_NUM_RETURN={num_return}\n"));
    }
    if let Some(opt_size) = settings.opt_size {
        record.push_str(&format!("PRIMER_OPT_SIZE={opt_size}\n"));
    }
    if let Some(min_size) = settings.min_size {
        record.push_str(&format!("PRIMER_MIN_SIZE={min_size}\n"));
    }
    if let Some(max_size) = settings.max_size {
        record.push_str(&format!("PRIMER_MAX_SIZE={max_size}\n"));
    }
    if let Some(opt_tm) = settings.opt_tm {
        record.push_str(&format!("PRIMER_OPT_TM={opt_tm}\n"));
    }
    if let Some(min_tm) = settings.min_tm {
        record.push_str(&format!("PRIMER_MIN_TM={min_tm}\n"));
    }
    if let Some(max_tm) = settings.max_tm {
        record.push_str(&format!("PRIMER_MAX_TM={max_tm}\n"));
    }

    record.push_str("=\n");
    record
}

/// Runs the engine and returns the generated pairs in output order.
pub fn design_primers(
    executable: &str,
    template: &str,
    plan: &RegionPlan,
    settings: &Primer3Settings,
) -> Result<Vec<DesignedPair>> {
    let record = boulder_record(template, plan, settings);
    log::info!("Calling design engine: {}", executable);
    log::debug!("Design engine input:\n{}", record);

    let mut child = Command::new(executable)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| PipelineError::ToolFailed {
            tool: executable.to_string(),
            message: e.to_string(),
        })?;
    child
        .stdin
        .as_mut()
        .expect("stdin was piped")
        .write_all(record.as_bytes())?;

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(PipelineError::ToolFailed {
            tool: executable.to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    parse_design_output(&String::from_utf8_lossy(&output.stdout))
}

/// Extracts the generated primer pairs from the engine's output record.
///
/// Sequence-carrying keys have the shape `PRIMER_{LEFT|RIGHT}_<n>_SEQUENCE`;
/// left and right sequences are collected per index and paired positionally
/// in ascending index order.
pub fn parse_design_output(output: &str) -> Result<Vec<DesignedPair>> {
    let mut left: BTreeMap<u32, (String, String)> = BTreeMap::new();
    let mut right: BTreeMap<u32, (String, String)> = BTreeMap::new();

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() || line == "=" {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(PipelineError::MalformedEngineOutput(line.to_string()).into());
        };
        if key == "PRIMER_ERROR" {
            return Err(PipelineError::ToolFailed {
                tool: "design engine".to_string(),
                message: value.to_string(),
            }
            .into());
        }

        let parts: Vec<&str> = key.split('_').collect();
        if parts.len() < 4 || parts[3] != "SEQUENCE" {
            continue;
        }
        let Ok(index) = parts[2].parse::<u32>() else {
            continue;
        };
        match parts[1] {
            "LEFT" => {
                left.insert(index, (key.to_string(), value.to_string()));
            }
            "RIGHT" => {
                right.insert(index, (key.to_string(), value.to_string()));
            }
            _ => {}
        }
    }

    let pairs: Vec<DesignedPair> = left
        .into_values()
        .zip(right.into_values())
        .map(|((left_name, left_seq), (right_name, right_seq))| DesignedPair {
            left_name,
            left_seq,
            right_name,
            right_seq,
        })
        .collect();

    log::info!("Design engine returned {} primer pairs", pairs.len());
    Ok(pairs)
}
