pub mod hit;
pub mod primer;
pub mod region;

// re-export for cleaner imports
pub use self::hit::PrimerHit;
pub use self::primer::{PairId, PairRegistry, PrimerPair};
pub use self::region::{InclusionWindow, PairOkRegions, ProductSizeRange, RegionPlan, TargetRegion};
