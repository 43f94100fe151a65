//! Groups classified hits per primer pair and renders the final report.

use std::io::{self, Write};

use fxhash::FxHashMap;

use crate::models::hit::PrimerHit;
use crate::models::primer::PairId;

pub const REPORT_HEADER: &str = "FWD_ID,REV_ID,MATCH_ID,FWD,REV,START,STOP,LENGTH,EXP";

/// Groups hits by pair identity, drops pairs with more than `match_limit`
/// hits entirely (a pair that promiscuous is useless, partial reporting
/// would only mislead), and orders the surviving groups by ascending hit
/// count so the cleanest pairs surface first. Ties are broken by pair id to
/// keep the output deterministic.
pub fn aggregate(hits: Vec<PrimerHit>, match_limit: usize) -> Vec<Vec<PrimerHit>> {
    let mut groups: FxHashMap<PairId, Vec<PrimerHit>> = FxHashMap::default();
    for hit in hits {
        groups.entry(hit.pair.clone()).or_default().push(hit);
    }

    let mut kept: Vec<(PairId, Vec<PrimerHit>)> = groups
        .into_iter()
        .filter(|(id, group)| {
            if group.len() > match_limit {
                log::debug!(
                    "Suppressing pair ({}) with {} matches, limit is {}",
                    id,
                    group.len(),
                    match_limit
                );
                false
            } else {
                true
            }
        })
        .collect();
    kept.sort_by(|a, b| a.1.len().cmp(&b.1.len()).then_with(|| a.0.cmp(&b.0)));

    kept.into_iter().map(|(_, group)| group).collect()
}

/// Writes the header row followed by one CSV row per hit.
pub fn write_report<W: Write>(writer: &mut W, groups: &[Vec<PrimerHit>]) -> io::Result<()> {
    writeln!(writer, "{}", REPORT_HEADER)?;
    for group in groups {
        for hit in group {
            writeln!(writer, "{}", hit)?;
        }
    }
    Ok(())
}
