//! `swarm_density.CD<density>.I<increment>[.C<cardinality>]`
//!
//! Grows the arena and the swarm together so that robots per unit area stay
//! constant. The starting arena and block distribution come from the
//! configured scenario (`<dist>.<X>x<Y>`).
//!
//! Experiment `k` lengthens the arena by `k * increment`. Square arenas
//! widen by the same amount; the 2:1 arenas of single and dual source
//! scenarios widen by half of it, so the scenario's own width is kept for
//! experiment 0 and the aspect ratio is kept after that.

use crate::def::{ExpDef, ExpLabel};
use crate::error::{CriteriaError, CriteriaResult, ParseError};
use crate::grammar::{prefixed_decimal, prefixed_usize};
use crate::kinds::swarm_size;
use once_cell::sync::Lazy;
use regex::Regex;
use sierra_changeset::{ChangeSetBuilder, ElementPath};
use std::fmt::{self, Display, Formatter};

pub(crate) const CATEGORY: &str = "swarm_density";

const EXPECTED: &str = "swarm_density.CD<density>.I<increment>[.C<cardinality>]";

/// Experiments generated when no `C<n>` modifier is given
pub const DEFAULT_CARDINALITY: usize = 10;

static SCENARIO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]+)\.(\d+)x(\d+)$").expect("Invalid scenario regex"));

/// Block distribution of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockDistribution {
    /// One block source opposite the nest
    SingleSource,
    /// Two sources either side of a central nest
    DualSource,
    /// Four sources around a central nest
    QuadSource,
    /// Power-law clustered blocks
    PowerLaw,
    /// Uniformly random blocks
    Random,
}

impl BlockDistribution {
    /// Parse two-letter scenario code
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SS" => Some(Self::SingleSource),
            "DS" => Some(Self::DualSource),
            "QS" => Some(Self::QuadSource),
            "PL" => Some(Self::PowerLaw),
            "RN" => Some(Self::Random),
            _ => None,
        }
    }

    /// Two-letter scenario code
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::SingleSource => "SS",
            Self::DualSource => "DS",
            Self::QuadSource => "QS",
            Self::PowerLaw => "PL",
            Self::Random => "RN",
        }
    }

    /// Check if the arena is a 2:1 rectangle rather than a square
    #[inline]
    #[must_use]
    pub fn is_rectangular(self) -> bool {
        matches!(self, Self::SingleSource | Self::DualSource)
    }

    /// Nest `(dims, center)` for an `x` by `y` arena
    fn nest_pose(self, x: usize, y: usize) -> (String, String) {
        let (xf, yf) = (x as f64, y as f64);
        match self {
            Self::SingleSource => (
                format!("{}, {}", xf / 10.0, yf * 4.0 / 5.0),
                format!("{}, {}", xf / 10.0, yf / 2.0),
            ),
            Self::DualSource => (
                format!("{}, {}", xf / 10.0, yf * 4.0 / 5.0),
                format!("{}, {}", xf / 2.0, yf / 2.0),
            ),
            Self::QuadSource | Self::PowerLaw | Self::Random => (
                format!("{}, {}", xf / 5.0, yf / 5.0),
                format!("{}, {}", xf / 2.0, yf / 2.0),
            ),
        }
    }
}

/// Block distribution plus starting arena, e.g. `SS.16x8`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    /// Block distribution
    pub distribution: BlockDistribution,
    /// Starting arena length
    pub x: usize,
    /// Starting arena width
    pub y: usize,
}

impl Scenario {
    /// Parse `<dist>.<X>x<Y>`
    ///
    /// # Errors
    /// Returns [`CriteriaError::Parse`] for malformed text and
    /// [`CriteriaError::Unsupported`] for a distribution without a nest rule
    pub fn parse(text: &str) -> CriteriaResult<Self> {
        let caps = SCENARIO
            .captures(text)
            .ok_or_else(|| ParseError::grammar(text, "<dist>.<X>x<Y> scenario"))?;
        let distribution = BlockDistribution::from_code(&caps[1]).ok_or_else(|| {
            CriteriaError::Unsupported(format!(
                "block distribution '{}' has no nest placement rule",
                &caps[1]
            ))
        })?;
        let dim = |i: usize| -> Result<usize, ParseError> {
            caps[i]
                .parse()
                .map_err(|_| ParseError::grammar(text, "<dist>.<X>x<Y> scenario"))
        };
        Ok(Self {
            distribution,
            x: dim(2)?,
            y: dim(3)?,
        })
    }
}

impl Display for Scenario {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}x{}", self.distribution.code(), self.x, self.y)
    }
}

/// Constant robots-per-area over growing arenas
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDensity {
    /// Robots per 100 square units
    pub density: f64,
    /// Arena side growth per experiment
    pub increment: usize,
    /// Number of experiments
    pub cardinality: usize,
    /// Starting arena and distribution
    pub scenario: Scenario,
}

fn arena_path() -> ElementPath {
    ElementPath::descendant(&["arena"])
}

fn grid_path() -> ElementPath {
    ElementPath::descendant(&["arena_map", "grid"])
}

fn nest_path() -> ElementPath {
    ElementPath::descendant(&["arena_map", "nest"])
}

impl ConstantDensity {
    pub(crate) fn parse(fields: &[&str], scenario: Option<&str>) -> CriteriaResult<Self> {
        let (density, increment, rest) = match fields {
            [density, increment, rest @ ..] => (density, increment, rest),
            _ => return Err(ParseError::grammar(fields.join("."), EXPECTED).into()),
        };
        let density = prefixed_decimal(density, "CD", "CD<density>")?;
        let increment = prefixed_usize(increment, "I", "I<increment >= 1>")?;
        if increment == 0 {
            return Err(ParseError::grammar("I0", "I<increment >= 1>").into());
        }
        let cardinality = match rest {
            [] => DEFAULT_CARDINALITY,
            [card] => prefixed_usize(card, "C", "C<cardinality >= 1>")?,
            [_, extra, ..] => return Err(ParseError::grammar(*extra, EXPECTED).into()),
        };
        if cardinality == 0 {
            return Err(ParseError::grammar("C0", "C<cardinality >= 1>").into());
        }

        let scenario = scenario.ok_or_else(|| {
            CriteriaError::precondition("constant density criteria need a configured scenario")
        })?;

        let crit = Self {
            density,
            increment,
            cardinality,
            scenario: Scenario::parse(scenario)?,
        };
        if crit.checked_arena(cardinality - 1).is_none() {
            return Err(CriteriaError::precondition(format!(
                "arena of {} experiments growing by {increment} from {} overflows",
                cardinality, crit.scenario
            )));
        }
        Ok(crit)
    }

    /// Arena dimensions and area of experiment `k`, `None` on overflow
    fn checked_arena(&self, k: usize) -> Option<(usize, usize, usize)> {
        let growth = k.checked_mul(self.increment)?;
        let x = self.scenario.x.checked_add(growth)?;
        let y = if self.scenario.distribution.is_rectangular() {
            self.scenario.y.checked_add(growth / 2)?
        } else {
            self.scenario.y.checked_add(growth)?
        };
        Some((x, y, x.checked_mul(y)?))
    }

    /// Arena dimensions of experiment `k`
    ///
    /// Saturates past the last experiment of a batch; parsing guarantees
    /// every experiment below `cardinality` fits.
    #[must_use]
    pub fn arena(&self, k: usize) -> (usize, usize) {
        let growth = k.saturating_mul(self.increment);
        let x = self.scenario.x.saturating_add(growth);
        let y = if self.scenario.distribution.is_rectangular() {
            self.scenario.y.saturating_add(growth / 2)
        } else {
            self.scenario.y.saturating_add(growth)
        };
        (x, y)
    }

    /// Robot count for an arena, never below one
    #[must_use]
    pub fn robots(&self, x: usize, y: usize) -> usize {
        let area = x.saturating_mul(y) as f64;
        (area * self.density / 100.0).max(1.0).round() as usize
    }

    /// `<dist>.<x>x<y>` for experiment `k`
    #[must_use]
    pub fn exp_scenario_name(&self, k: usize) -> String {
        let (x, y) = self.arena(k);
        Scenario {
            x,
            y,
            ..self.scenario
        }
        .to_string()
    }

    pub(crate) fn expand(&self) -> Vec<ExpDef> {
        (0..self.cardinality)
            .map(|k| {
                let (x, y) = self.arena(k);
                let robots = self.robots(x, y);
                let (nest_dims, nest_center) = self.scenario.distribution.nest_pose(x, y);

                let changes = ChangeSetBuilder::new()
                    .set(&arena_path(), "size", format!("{x}, {y}, 2"))
                    .set(
                        &arena_path(),
                        "center",
                        format!("{}, {}, 1", x as f64 / 2.0, y as f64 / 2.0),
                    )
                    .set(&grid_path(), "dims", format!("{x}, {y}, 2"))
                    .set(&nest_path(), "dims", nest_dims)
                    .set(&nest_path(), "center", nest_center)
                    .merge(&swarm_size::quantity_changes(robots))
                    .build();

                let label = ExpLabel {
                    slug: format!("{x}x{y}"),
                    tick: robots as f64,
                    tick_label: robots.to_string(),
                };
                ExpDef::new(changes, label, Some(robots))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn density(fields: &[&str], scenario: &str) -> ConstantDensity {
        ConstantDensity::parse(fields, Some(scenario)).unwrap()
    }

    #[test]
    fn rectangular_arenas_grow_by_increment() {
        let crit = density(&["CD1p0", "I16"], "SS.16x8");
        assert_eq!(crit.cardinality, DEFAULT_CARDINALITY);
        assert_eq!(crit.arena(0), (16, 8));
        assert_eq!(crit.arena(2), (48, 24));
        assert_eq!(crit.exp_scenario_name(1), "SS.32x16");
    }

    #[test]
    fn square_arenas() {
        let crit = density(&["CD2p0", "I8", "C3"], "QS.16x16");
        assert_eq!(crit.cardinality, 3);
        assert_eq!(crit.arena(2), (32, 32));
    }

    #[test]
    fn rectangular_arenas_keep_scenario_width() {
        let crit = density(&["CD1p0", "I4", "C3"], "SS.20x8");
        assert_eq!(crit.arena(0), (20, 8));
        assert_eq!(crit.arena(2), (28, 12));
        assert_eq!(crit.exp_scenario_name(1), "SS.24x10");
    }

    #[test]
    fn overflowing_growth_is_rejected() {
        let huge = format!("I{}", usize::MAX);
        assert!(matches!(
            ConstantDensity::parse(&["CD1p0", huge.as_str(), "C3"], Some("SS.16x8")),
            Err(CriteriaError::Precondition(_))
        ));
        // a single experiment never grows
        let crit = density(&["CD1p0", huge.as_str(), "C1"], "SS.16x8");
        assert_eq!(crit.arena(0), (16, 8));
        assert_eq!(crit.arena(5).0, usize::MAX);
    }

    #[test]
    fn zero_increment_is_rejected() {
        assert!(matches!(
            ConstantDensity::parse(&["CD1p0", "I0", "C3"], Some("SS.16x8")),
            Err(CriteriaError::Parse(_))
        ));
    }

    #[test]
    fn robot_count_tracks_density() {
        let crit = density(&["CD5p0", "I40", "C5"], "RN.40x40");
        for (k, def) in crit.expand().iter().enumerate() {
            let (x, y) = crit.arena(k);
            let robots = def.swarm_size.unwrap();
            let observed = robots as f64 / (x * y) as f64 * 100.0;
            assert!((observed - 5.0).abs() < 0.1, "{x}x{y}: {robots}");
        }
    }

    #[test]
    fn vanishing_density_keeps_one_robot() {
        let crit = density(&["CD0p0", "I1", "C3"], "SS.2x1");
        assert!(crit.expand().iter().all(|d| d.swarm_size == Some(1)));
    }

    #[test]
    fn change_set_edits_arena_nest_and_robots() {
        let crit = density(&["CD1p0", "I16", "C1"], "SS.16x8");
        let changes = &crit.expand()[0].changes;

        assert_eq!(changes.value_of(&arena_path(), "size"), Some("16, 8, 2"));
        assert_eq!(changes.value_of(&arena_path(), "center"), Some("8, 4, 1"));
        assert_eq!(changes.value_of(&grid_path(), "dims"), Some("16, 8, 2"));
        assert_eq!(changes.value_of(&nest_path(), "center"), Some("1.6, 4"));
        assert_eq!(
            changes.value_of(&swarm_size::entity_path(), "quantity"),
            Some("1")
        );
        assert!(changes.conflicts().is_empty());
    }

    #[test]
    fn missing_scenario_is_precondition() {
        assert!(matches!(
            ConstantDensity::parse(&["CD1p0", "I16"], None),
            Err(CriteriaError::Precondition(_))
        ));
    }

    #[test]
    fn distribution_without_nest_rule_is_unsupported() {
        assert!(matches!(
            ConstantDensity::parse(&["CD1p0", "I16"], Some("XX.16x8")),
            Err(CriteriaError::Unsupported(_))
        ));
    }

    #[test]
    fn malformed_fields() {
        assert!(ConstantDensity::parse(&["D1p0", "I16"], Some("SS.16x8")).is_err());
        assert!(ConstantDensity::parse(&["CD1p0"], Some("SS.16x8")).is_err());
        assert!(ConstantDensity::parse(&["CD1p0", "I16", "C0"], Some("SS.16x8")).is_err());
    }
}
