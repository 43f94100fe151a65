use std::fmt::{self, Display};

use fxhash::FxHashMap;

///
/// Canonical identity of a primer pair. The order in which the aligner
/// reports the two reads is not meaningful, so the two primer names are
/// always stored sorted; (fwd, rev) and (rev, fwd) collapse to one key.
///
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Clone)]
pub struct PairId {
    first: String,
    second: String,
}

impl PairId {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            PairId {
                first: a.to_string(),
                second: b.to_string(),
            }
        } else {
            PairId {
                first: b.to_string(),
                second: a.to_string(),
            }
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

impl Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.first, self.second)
    }
}

/// The two sequences of a primer pair, in design order: `forward` anneals to
/// the plus strand left of the insert, `reverse` right of it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PrimerPair {
    pub forward: String,
    pub reverse: String,
}

///
/// All primer pairs of one run, keyed by canonical pair identity. Built once
/// from a design run or from pre-existing primer files, read-only afterwards.
///
#[derive(Debug, Default)]
pub struct PairRegistry {
    pairs: FxHashMap<PairId, PrimerPair>,
}

impl PairRegistry {
    pub fn insert(&mut self, id: PairId, pair: PrimerPair) {
        self.pairs.insert(id, pair);
    }

    pub fn get(&self, id: &PairId) -> Option<&PrimerPair> {
        self.pairs.get(id)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairId, &PrimerPair)> {
        self.pairs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn pair_id_is_order_independent() {
        let a = PairId::new("PRIMER_LEFT_0_SEQUENCE", "PRIMER_RIGHT_0_SEQUENCE");
        let b = PairId::new("PRIMER_RIGHT_0_SEQUENCE", "PRIMER_LEFT_0_SEQUENCE");

        assert_eq!(a, b);
        assert_eq!(a.first(), "PRIMER_LEFT_0_SEQUENCE");
        assert_eq!(a.second(), "PRIMER_RIGHT_0_SEQUENCE");
    }

    #[rstest]
    fn registry_lookup_ignores_read_order() {
        let mut registry = PairRegistry::default();
        registry.insert(
            PairId::new("fwd_3", "rev_3"),
            PrimerPair {
                forward: "ACGTACGTACGT".to_string(),
                reverse: "TTGCAATTGGCC".to_string(),
            },
        );

        let hit = registry.get(&PairId::new("rev_3", "fwd_3")).unwrap();
        assert_eq!(hit.forward, "ACGTACGTACGT");
    }
}
