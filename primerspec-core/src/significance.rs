//! Decides whether a single reported alignment is a real hit.
//!
//! The aligner encodes per-base agreement as an alternating string of
//! match-run lengths and mismatched reference bases, e.g. `12A3` for
//! 12 matching bases, one mismatch against an `A`, 3 matching bases. The
//! bases that matter most for amplification are the ones at the primer's
//! 3' end, so the encoding is evaluated from the end of the primer toward
//! its start.

/// One token of a mismatch encoding: a run of exactly matching bases, or a
/// single mismatched base.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MdToken {
    Matches(u32),
    Mismatch(char),
}

/// Tunable tolerance for how faithful a primer's 3' end has to be before an
/// alignment counts as a hit.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct SignificanceThresholds {
    /// The final `last_must_match` bases must match exactly.
    pub last_must_match: u32,
    /// How many terminal bases are inspected for mismatches at all.
    pub last_to_check: u32,
    /// Fewer than `last_max_error` mismatches may occur within the
    /// inspected terminal bases.
    pub last_max_error: u32,
}

impl Default for SignificanceThresholds {
    fn default() -> Self {
        SignificanceThresholds {
            last_must_match: 3,
            last_to_check: 12,
            last_max_error: 5,
        }
    }
}

/// Splits a mismatch encoding into tokens. Zero-length runs carry no
/// information and are dropped, so downstream evaluation never sees them.
pub fn tokenize(encoding: &str) -> Vec<MdToken> {
    let mut tokens = Vec::new();
    let mut run: u32 = 0;
    let mut in_run = false;

    for c in encoding.chars() {
        if let Some(digit) = c.to_digit(10) {
            run = run * 10 + digit;
            in_run = true;
        } else {
            if in_run {
                if run > 0 {
                    tokens.push(MdToken::Matches(run));
                }
                run = 0;
                in_run = false;
            }
            tokens.push(MdToken::Mismatch(c));
        }
    }
    if in_run && run > 0 {
        tokens.push(MdToken::Matches(run));
    }

    tokens
}

/// Whether an alignment with the given token sequence counts as a hit.
///
/// A perfect-match encoding reduces to a single run token, which passes iff
/// the run covers at least `last_must_match` bases. Otherwise the terminal
/// run gates first, then mismatches are counted walking backwards while the
/// processed base count has not yet exceeded `last_to_check`. The bound is
/// deliberately inclusive and can overshoot by the width of the final token
/// processed; see the tests pinning that behavior.
pub fn is_significant(tokens: &[MdToken], thresholds: &SignificanceThresholds) -> bool {
    let Some(last) = tokens.last() else {
        // nothing encoded at all; only a zero requirement is satisfiable
        return thresholds.last_must_match == 0;
    };

    match *last {
        MdToken::Matches(run) => {
            if run < thresholds.last_must_match {
                // the 3' end lacks enough consecutive matching bases
                return false;
            }
            if tokens.len() == 1 {
                return true;
            }
        }
        MdToken::Mismatch(_) => {
            if thresholds.last_must_match != 0 {
                // the very last base mismatches
                return false;
            }
        }
    }

    let mut mismatches: u32 = 0;
    let mut bases_processed: u32 = 0;
    for token in tokens.iter().rev() {
        if bases_processed > thresholds.last_to_check {
            break;
        }
        match *token {
            MdToken::Matches(run) => bases_processed += run,
            MdToken::Mismatch(_) => {
                mismatches += 1;
                bases_processed += 1;
            }
        }
    }

    if mismatches >= thresholds.last_max_error {
        log::debug!(
            "{} mismatches in the last {} bases, {} allowed",
            mismatches,
            thresholds.last_to_check,
            thresholds.last_max_error
        );
    }
    mismatches < thresholds.last_max_error
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn thresholds(last_must_match: u32, last_to_check: u32, last_max_error: u32) -> SignificanceThresholds {
        SignificanceThresholds {
            last_must_match,
            last_to_check,
            last_max_error,
        }
    }

    #[rstest]
    fn tokenize_splits_runs_and_mismatches() {
        assert_eq!(
            tokenize("12A3"),
            vec![
                MdToken::Matches(12),
                MdToken::Mismatch('A'),
                MdToken::Matches(3)
            ]
        );
    }

    #[rstest]
    fn tokenize_drops_zero_runs() {
        assert_eq!(
            tokenize("0A12"),
            vec![MdToken::Mismatch('A'), MdToken::Matches(12)]
        );
        assert_eq!(
            tokenize("5T0"),
            vec![MdToken::Matches(5), MdToken::Mismatch('T')]
        );
    }

    #[rstest]
    fn tokenize_handles_adjacent_mismatches() {
        assert_eq!(
            tokenize("2AC7"),
            vec![
                MdToken::Matches(2),
                MdToken::Mismatch('A'),
                MdToken::Mismatch('C'),
                MdToken::Matches(7)
            ]
        );
    }

    #[rstest]
    fn single_long_run_is_significant() {
        assert!(is_significant(&tokenize("12"), &thresholds(10, 12, 5)));
    }

    #[rstest]
    fn short_terminal_run_is_not_significant() {
        // 2 matches, one mismatch, then only 3 terminal matches
        assert!(!is_significant(&tokenize("2A3"), &thresholds(5, 12, 5)));
    }

    #[rstest]
    fn terminal_mismatch_fails_unless_requirement_is_zero() {
        let tokens = tokenize("19A");
        assert!(!is_significant(&tokens, &thresholds(3, 12, 5)));
        assert!(is_significant(&tokens, &thresholds(0, 12, 5)));
    }

    #[rstest]
    fn mismatch_count_boundary_is_strict() {
        // 4 mismatches within the last 12 bases
        let four = tokenize("8ATCG8");
        // 5 mismatches within the last 12 bases
        let five = tokenize("8GATCG7");

        assert!(is_significant(&four, &thresholds(3, 12, 5)));
        assert!(!is_significant(&five, &thresholds(3, 12, 5)));
    }

    #[rstest]
    fn inclusive_bound_processes_the_token_that_crosses_last_to_check() {
        // Terminal run of 5 leaves bases_processed at 5 <= 12, so the walk
        // also consumes the mismatch and the leading run of 20, overshooting
        // the 12-base horizon. The inclusive bound is intentional.
        let tokens = tokenize("20A5");
        assert!(is_significant(&tokens, &thresholds(3, 12, 2)));
        assert!(!is_significant(&tokens, &thresholds(3, 12, 1)));
    }

    #[rstest]
    fn walk_stops_when_tokens_run_out() {
        // whole encoding shorter than last_to_check
        let tokens = tokenize("2A2");
        assert!(is_significant(&tokens, &thresholds(2, 50, 2)));
    }

    #[rstest]
    fn empty_tokens_require_zero_terminal_matches() {
        assert!(!is_significant(&[], &thresholds(3, 12, 5)));
        assert!(is_significant(&[], &thresholds(0, 12, 5)));
    }

    #[rstest]
    fn zero_error_budget_rejects_everything_beyond_a_single_run() {
        assert!(!is_significant(&tokenize("6A6"), &thresholds(3, 12, 0)));
        // a lone run never reaches the mismatch walk
        assert!(is_significant(&tokenize("20"), &thresholds(3, 12, 0)));
    }
}
