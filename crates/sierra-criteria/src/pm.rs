//! Performance-measure names understood by `pm_query`

/// Cumulative blocks collected
pub const BLOCKS_COLLECTED: &str = "blocks-collected";

/// Projective performance, fractional losses and Karp-Flatt
pub const SCALABILITY: &str = "scalability";

/// Emergent self-organization
pub const SELF_ORG: &str = "self-org";

/// Reactivity to temporal variance
pub const REACTIVITY: &str = "reactivity";

/// Adaptability to temporal variance
pub const ADAPTABILITY: &str = "adaptability";

/// Every known measure
pub const ALL: [&str; 5] = [
    BLOCKS_COLLECTED,
    SCALABILITY,
    SELF_ORG,
    REACTIVITY,
    ADAPTABILITY,
];

pub(crate) const SIZE_VARYING: &[&str] = &[BLOCKS_COLLECTED, SCALABILITY, SELF_ORG];
pub(crate) const VARIANCE: &[&str] = &[BLOCKS_COLLECTED, REACTIVITY, ADAPTABILITY];
pub(crate) const BASIC: &[&str] = &[BLOCKS_COLLECTED];
