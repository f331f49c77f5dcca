//! Diminishing-returns party scaling.

/// Per-member reward multiplier, indexed by party size - 1.
pub const PARTY_SCALING: [f64; 10] = [1.0, 0.6, 0.4, 0.3, 0.25, 0.22, 0.2, 0.18, 0.16, 0.15];

/// Multiplier for each member's individual share. Sizes past the table use
/// the last slot.
pub fn party_scaling(party_size: usize) -> f64 {
    PARTY_SCALING[party_size.clamp(1, PARTY_SCALING.len()) - 1]
}
