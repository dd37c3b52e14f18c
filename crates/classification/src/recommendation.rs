//! Static ABC×XYZ recommendation table.

use crate::abc_xyz::{AbcClass, XyzClass};

/// Management recommendation for one cell of the combined matrix.
///
/// Plain data, deliberately separate from the classification algorithm so
/// the advice text can change without touching the partition logic.
pub fn recommendation(abc: AbcClass, xyz: XyzClass) -> &'static str {
    match (abc, xyz) {
        (AbcClass::A, XyzClass::X) => {
            "Tight control, frequent review; strong candidate for just-in-time replenishment."
        }
        (AbcClass::A, XyzClass::Y) => {
            "High priority; hold safety stock and forecast regularly with flexible supply."
        }
        (AbcClass::A, XyzClass::Z) => {
            "High value but unpredictable; buffer with safety stock and monitor closely."
        }
        (AbcClass::B, XyzClass::X) => {
            "Standard reorder-point control with periodic review."
        }
        (AbcClass::B, XyzClass::Y) => {
            "Balance safety stock against carrying cost; forecast on a regular cadence."
        }
        (AbcClass::B, XyzClass::Z) => {
            "Consider make-to-order or a larger buffer for critical items."
        }
        (AbcClass::C, XyzClass::X) => {
            "Simple min-max policy; order in bulk to cut handling cost."
        }
        (AbcClass::C, XyzClass::Y) => {
            "Periodic ordering; consignment may be worthwhile."
        }
        (AbcClass::C, XyzClass::Z) => {
            "Review necessity; consider dropping the item or switching to make-to-order."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cell_has_distinct_advice() {
        let mut seen = std::collections::HashSet::new();
        for abc in [AbcClass::A, AbcClass::B, AbcClass::C] {
            for xyz in [XyzClass::X, XyzClass::Y, XyzClass::Z] {
                assert!(seen.insert(recommendation(abc, xyz)));
            }
        }
        assert_eq!(seen.len(), 9);
    }
}
