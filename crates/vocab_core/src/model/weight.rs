//! Per-term review weight scale.
//!
//! The current scale is 1..=5 with 3 as the default cadence. Data written by
//! older builds used 0..=4; see `crate::sanitize::to_new_weight`.

pub type Weight = u8;

pub const MIN_WEIGHT: Weight = 1;
pub const MAX_WEIGHT: Weight = 5;
pub const DEFAULT_WEIGHT: Weight = 3;
pub const ALL_WEIGHTS: [Weight; 5] = [1, 2, 3, 4, 5];

/// Clamps any integer into the current weight scale.
pub fn clamp_weight(value: i64) -> Weight {
    // Lossless: the clamped value is within 1..=5.
    value.clamp(i64::from(MIN_WEIGHT), i64::from(MAX_WEIGHT)) as Weight
}

/// Short chip label for a weight.
pub fn weight_label(weight: Weight) -> &'static str {
    match weight {
        1 => "Hide",
        2 => "Rare",
        3 => "Default",
        4 => "More",
        5 => "Max",
        _ => "",
    }
}

/// Long description for a weight, used in tooltips.
pub fn weight_description(weight: Weight) -> &'static str {
    match weight {
        1 => "Hide almost completely",
        2 => "Show rarely",
        3 => "Default cadence",
        4 => "Show more often",
        5 => "Show constantly",
        _ => "",
    }
}
