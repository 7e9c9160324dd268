/// Fixed-size tile sets used by the voter
pub mod bitset;
/// Corner search and region refill
pub mod calibration;
/// Fill queue and the resumable fill state machine
pub mod propagation;
/// Strictness tiers, constraint voting and seeded random choice
pub mod selection;
