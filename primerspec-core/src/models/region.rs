use std::fmt::{self, Display};

use crate::errors::ConfigError;

///
/// The sub-interval of the template that must lie strictly between the two
/// primers, not covered by primer sequence itself.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub struct TargetRegion {
    pub begin: i64,
    pub end: i64,
}

impl TargetRegion {
    pub fn new(begin: i64, end: i64) -> Result<Self, ConfigError> {
        if begin < 0 || end <= begin {
            return Err(ConfigError::InvalidTargetRegion { begin, end });
        }
        Ok(TargetRegion { begin, end })
    }

    /// Number of bases the primers must enclose.
    pub fn insert_length(&self) -> i64 {
        self.end - self.begin
    }
}

///
/// Allowed size of the amplified product, primers included.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub struct ProductSizeRange {
    pub min: i64,
    pub max: i64,
}

impl ProductSizeRange {
    pub fn new(min: i64, max: i64) -> Result<Self, ConfigError> {
        if min <= 0 || max <= min {
            return Err(ConfigError::InvalidSizeRange { min, max });
        }
        Ok(ProductSizeRange { min, max })
    }
}

/// Window of the template within which the design engine may place any
/// primer. The start can be negative; clamping to the sequence is the
/// engine's business, not ours.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct InclusionWindow {
    pub start: i64,
    pub length: i64,
}

impl InclusionWindow {
    pub fn end(&self) -> i64 {
        self.start + self.length
    }

    /// Whether an alignment spanning `start..=stop` lies inside the window.
    pub fn contains(&self, start: i64, stop: i64) -> bool {
        self.start <= start && start <= stop && stop <= self.end()
    }
}

impl Display for InclusionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.start, self.length)
    }
}

/// Paired start/length windows constraining where the forward and the
/// reverse primer of a pair may start, in the 4-integer encoding the design
/// engine expects.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct PairOkRegions {
    pub left_start: i64,
    pub left_length: i64,
    pub right_start: i64,
    pub right_length: i64,
}

impl PairOkRegions {
    pub fn as_list(&self) -> [i64; 4] {
        [
            self.left_start,
            self.left_length,
            self.right_start,
            self.right_length,
        ]
    }
}

impl Display for PairOkRegions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.left_start, self.left_length, self.right_start, self.right_length
        )
    }
}

///
/// The solved placement geometry for one design run: the target interval and
/// product size range as given, plus the derived inclusion window and
/// pair-ok regions handed verbatim to the design engine.
///
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct RegionPlan {
    pub target: TargetRegion,
    pub size: ProductSizeRange,
    pub window: InclusionWindow,
    pub pair_ok: PairOkRegions,
}

impl RegionPlan {
    /// Translates the insert and product size constraints into engine
    /// coordinates. The insert must fit inside even the smallest allowed
    /// product, otherwise no primer placement can satisfy both constraints.
    pub fn solve(target: TargetRegion, size: ProductSizeRange) -> Result<Self, ConfigError> {
        if target.insert_length() > size.min {
            return Err(ConfigError::InsertTooLarge {
                insert: target.insert_length(),
                min: size.min,
            });
        }

        let left_start = target.end - size.max;
        let overlap = size.max - target.insert_length();
        let right_start = target.end;

        let pair_ok = PairOkRegions {
            left_start,
            left_length: overlap,
            right_start,
            right_length: overlap,
        };
        // spans from the leftmost possible forward-primer start to the
        // rightmost possible reverse-primer end
        let window = InclusionWindow {
            start: left_start,
            length: (target.end + overlap) - left_start,
        };

        Ok(RegionPlan {
            target,
            size,
            window,
            pair_ok,
        })
    }
}
