//! End-to-end check of the classification and aggregation stages over
//! synthetic aligner output, without invoking any external tool.

use rstest::*;

use primerspec_core::align::pair_records;
use primerspec_core::classify::{ClassifyContext, PrimerProvenance, classify_pair};
use primerspec_core::fasta::{primer_file_names, read_primer_files, write_fasta};
use primerspec_core::models::primer::{PairId, PairRegistry, PrimerPair};
use primerspec_core::models::region::{ProductSizeRange, RegionPlan, TargetRegion};
use primerspec_core::report::{REPORT_HEADER, aggregate, write_report};
use primerspec_core::significance::SignificanceThresholds;

const FWD_SEQ: &str = "ACGTACGTACGTACGTACGT";
const REV_SEQ: &str = "TTGCAATTGGCCAATTGGCC";

fn record(name: &str, reference: &str, start: i64, end: i64, length: i64, md: &str) -> String {
    format!(
        "{name}\t99\t{reference}\t{start}\t255\t20M\t=\t{end}\t{length}\t{FWD_SEQ}\tIIIIIIIIIIIIIIIIIIII\tXA:i:0\tMD:Z:{md}\tNM:i:0"
    )
}

fn unaligned(name: &str) -> String {
    format!("{name}\t4\t*\t0\t0\t*\t*\t0\t0\t{FWD_SEQ}\tIIIIIIIIIIIIIIIIIIII\tXM:i:0")
}

fn registry_of(pairs: &[(&str, &str)]) -> PairRegistry {
    let mut registry = PairRegistry::default();
    for (fwd, rev) in pairs {
        registry.insert(
            PairId::new(fwd, rev),
            PrimerPair {
                forward: FWD_SEQ.to_string(),
                reverse: REV_SEQ.to_string(),
            },
        );
    }
    registry
}

fn classify_all(lines: &[String], ctx: &ClassifyContext<'_>) -> Vec<primerspec_core::models::PrimerHit> {
    pair_records(lines)
        .into_iter()
        .filter_map(|(fwd, rev)| classify_pair(fwd, rev, ctx).unwrap())
        .collect()
}

#[rstest]
fn clean_pairs_surface_first_and_promiscuous_pairs_disappear() {
    let plan = RegionPlan::solve(
        TargetRegion::new(400, 450).unwrap(),
        ProductSizeRange::new(200, 300).unwrap(),
    )
    .unwrap();
    let registry = registry_of(&[("fwd_a", "rev_a"), ("fwd_b", "rev_b")]);
    let thresholds = SignificanceThresholds::default();
    let ctx = ClassifyContext {
        registry: &registry,
        window: &plan.window,
        thresholds: &thresholds,
        expected_reference: "target_seq",
        provenance: PrimerProvenance::Designed,
    };

    let mut lines = Vec::new();
    // pair a: one on-target hit plus one off-target hit
    lines.push(record("fwd_a", "target_seq", 200, 430, 250, "20"));
    lines.push(record("rev_a", "target_seq", 430, 200, -250, "20"));
    lines.push(record("fwd_a", "other_seq", 1200, 1430, 250, "20"));
    lines.push(record("rev_a", "other_seq", 1430, 1200, -250, "20"));
    // pair b: three hits, over a match limit of 2
    for start in [100, 700, 1300] {
        lines.push(record("fwd_b", "other_seq", start, start + 230, 250, "20"));
        lines.push(record("rev_b", "other_seq", start + 230, start, -250, "20"));
    }
    // one unaligned pair, contributes nothing
    lines.push(unaligned("fwd_a"));
    lines.push(unaligned("rev_a"));

    let hits = classify_all(&lines, &ctx);
    assert_eq!(hits.len(), 5);

    let groups = aggregate(hits, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);

    let mut out = Vec::new();
    write_report(&mut out, &groups).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], REPORT_HEADER);
    // on-target hit: start inside the window, stop extended by the reverse
    // primer length, flagged expected
    assert_eq!(
        lines[1],
        format!("fwd_a,rev_a,target_seq,{FWD_SEQ},{REV_SEQ},200,450,250,1")
    );
    assert_eq!(
        lines[2],
        format!("fwd_a,rev_a,other_seq,{FWD_SEQ},{REV_SEQ},1200,1450,250,0")
    );
    assert_eq!(lines.len(), 3);
}

#[rstest]
fn preset_primers_classify_like_designed_ones_except_for_the_expected_rule() {
    let plan = RegionPlan::solve(
        TargetRegion::new(400, 450).unwrap(),
        ProductSizeRange::new(200, 300).unwrap(),
    )
    .unwrap();
    let thresholds = SignificanceThresholds::default();

    // primer pairs written to files and re-read, as in a --keep-primer run
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("primers").display().to_string();
    let (left_path, right_path) = primer_file_names(&prefix);
    write_fasta(&left_path, vec![("fwd_a", FWD_SEQ)]).unwrap();
    write_fasta(&right_path, vec![("rev_a", REV_SEQ)]).unwrap();
    let reread = read_primer_files(&prefix).unwrap();

    let fresh = registry_of(&[("fwd_a", "rev_a")]);

    let lines = vec![
        record("fwd_a", "target_seq_full_id", 200, 430, 250, "18A1"),
        record("rev_a", "target_seq_full_id", 430, 200, -250, "20"),
    ];

    // significance does not depend on provenance: 18A1 fails the terminal
    // run requirement either way
    for (registry, provenance) in [
        (&fresh, PrimerProvenance::Designed),
        (&reread, PrimerProvenance::Preset),
    ] {
        let ctx = ClassifyContext {
            registry,
            window: &plan.window,
            thresholds: &thresholds,
            expected_reference: "target_seq",
            provenance,
        };
        assert!(classify_all(&lines, &ctx).is_empty());
    }

    let good = vec![
        record("fwd_a", "target_seq_full_id", 200, 430, 250, "20"),
        record("rev_a", "target_seq_full_id", 430, 200, -250, "20"),
    ];

    // designed primers demand exact reference equality, preset primers
    // accept a prefix match
    let designed_ctx = ClassifyContext {
        registry: &fresh,
        window: &plan.window,
        thresholds: &thresholds,
        expected_reference: "target_seq",
        provenance: PrimerProvenance::Designed,
    };
    let preset_ctx = ClassifyContext {
        registry: &reread,
        window: &plan.window,
        thresholds: &thresholds,
        expected_reference: "target_seq",
        provenance: PrimerProvenance::Preset,
    };

    let designed_hits = classify_all(&good, &designed_ctx);
    let preset_hits = classify_all(&good, &preset_ctx);

    assert!(!designed_hits[0].expected);
    assert!(preset_hits[0].expected);
    // everything but the expected flag matches
    assert_eq!(designed_hits[0].start, preset_hits[0].start);
    assert_eq!(designed_hits[0].stop, preset_hits[0].stop);
    assert_eq!(designed_hits[0].forward_seq, preset_hits[0].forward_seq);
}
