use std::fmt::{self, Display};

use crate::models::primer::PairId;

///
/// One significant, classified alignment of a primer pair. `stop` is the
/// extended stop: the aligner reports only the 5' coordinate of the reverse
/// read, so the reverse primer length is added to cover the full amplicon.
///
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PrimerHit {
    pub pair: PairId,
    pub forward_id: String,
    pub reverse_id: String,
    pub reference: String,
    pub forward_seq: String,
    pub reverse_seq: String,
    pub start: i64,
    pub stop: i64,
    pub product_length: i64,
    pub expected: bool,
}

impl Display for PrimerHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{},{},{}",
            self.forward_id,
            self.reverse_id,
            self.reference,
            self.forward_seq,
            self.reverse_seq,
            self.start,
            self.stop,
            self.product_length,
            if self.expected { 1 } else { 0 },
        )
    }
}
