//! Curve-similarity distance metrics
//!
//! A curve is a sequence of `(x, y)` points. Every metric returns a
//! non-negative distance; identical curves score `0`.

use crate::error::{check_min, MeasureError};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Point on a curve
pub type Point = (f64, f64);

/// Build a curve from a uniformly sampled series (`x` = sample index)
#[must_use]
pub fn from_series(values: &[f64]) -> Vec<Point> {
    values
        .iter()
        .enumerate()
        .map(|(i, &y)| (i as f64, y))
        .collect()
}

/// Distance metric between two curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    /// Partial curve mapping
    Pcm,

    /// Area enclosed between the curves
    AreaBetweenCurves,

    /// Discrete Fréchet distance
    Frechet,

    /// Dynamic time warping
    #[default]
    Dtw,

    /// Absolute difference of arc lengths
    CurveLength,
}

impl SimilarityMethod {
    /// All methods, in declaration order
    pub const ALL: [Self; 5] = [
        Self::Pcm,
        Self::AreaBetweenCurves,
        Self::Frechet,
        Self::Dtw,
        Self::CurveLength,
    ];

    /// Configuration name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Pcm => "pcm",
            Self::AreaBetweenCurves => "area_between_curves",
            Self::Frechet => "frechet",
            Self::Dtw => "dtw",
            Self::CurveLength => "curve_length",
        }
    }

    /// Distance between two curves
    ///
    /// # Errors
    /// Returns error if either curve is empty
    pub fn distance(self, a: &[Point], b: &[Point]) -> Result<f64, MeasureError> {
        check_min("curve", 1, a.len())?;
        check_min("curve", 1, b.len())?;
        Ok(match self {
            Self::Pcm => pcm(a, b),
            Self::AreaBetweenCurves => area_between_curves(a, b),
            Self::Frechet => frechet(a, b),
            Self::Dtw => dtw(a, b),
            Self::CurveLength => (arc_length(a) - arc_length(b)).abs(),
        })
    }
}

impl Display for SimilarityMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimilarityMethod {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| MeasureError::InvalidInput(format!("unknown similarity method '{s}'")))
    }
}

fn dist(p: Point, q: Point) -> f64 {
    (p.0 - q.0).hypot(p.1 - q.1)
}

/// Total arc length
#[must_use]
pub fn arc_length(c: &[Point]) -> f64 {
    c.windows(2).map(|w| dist(w[0], w[1])).sum()
}

fn cumulative_lengths(c: &[Point]) -> Vec<f64> {
    let mut acc = 0.0;
    let mut out = Vec::with_capacity(c.len());
    out.push(0.0);
    for w in c.windows(2) {
        acc += dist(w[0], w[1]);
        out.push(acc);
    }
    out
}

/// Point at arc length `s` along `c`, clamped to the ends
fn point_at(c: &[Point], cum: &[f64], s: f64) -> Point {
    if s <= 0.0 || c.len() == 1 {
        return c[0];
    }
    for k in 1..c.len() {
        if cum[k] >= s {
            let seg = cum[k] - cum[k - 1];
            if seg == 0.0 {
                return c[k];
            }
            let t = (s - cum[k - 1]) / seg;
            return (
                c[k - 1].0 + t * (c[k].0 - c[k - 1].0),
                c[k - 1].1 + t * (c[k].1 - c[k - 1].1),
            );
        }
    }
    c[c.len() - 1]
}

/// Shoelace area of a quadrilateral
fn quad_area(p: [Point; 4]) -> f64 {
    let mut twice = 0.0;
    for i in 0..4 {
        let (x1, y1) = p[i];
        let (x2, y2) = p[(i + 1) % 4];
        twice += x1 * y2 - x2 * y1;
    }
    twice.abs() / 2.0
}

fn pcm(a: &[Point], b: &[Point]) -> f64 {
    let (short, long) = if arc_length(a) <= arc_length(b) {
        (a, b)
    } else {
        (b, a)
    };
    let short_cum = cumulative_lengths(short);
    let long_cum = cumulative_lengths(long);
    let slack = long_cum[long_cum.len() - 1] - short_cum[short_cum.len() - 1];

    let score_at = |offset: f64| -> f64 {
        let mapped: Vec<Point> = short_cum
            .iter()
            .map(|&s| point_at(long, &long_cum, s + offset))
            .collect();
        (1..short.len())
            .map(|k| quad_area([short[k - 1], short[k], mapped[k], mapped[k - 1]]))
            .sum()
    };

    long_cum
        .iter()
        .copied()
        .filter(|&off| off <= slack)
        .chain(std::iter::once(0.0))
        .map(score_at)
        .fold(f64::INFINITY, f64::min)
}

/// Trapezoidal area of `|a.y - b.y|` over the common prefix, using `a`'s x values
fn area_between_curves(a: &[Point], b: &[Point]) -> f64 {
    let n = a.len().min(b.len());
    (1..n)
        .map(|t| {
            let width = (a[t].0 - a[t - 1].0).abs();
            let left = (a[t - 1].1 - b[t - 1].1).abs();
            let right = (a[t].1 - b[t].1).abs();
            width * (left + right) / 2.0
        })
        .sum()
}

fn frechet(a: &[Point], b: &[Point]) -> f64 {
    let (n, m) = (a.len(), b.len());
    let mut ca = vec![vec![0.0; m]; n];
    for i in 0..n {
        for j in 0..m {
            let d = dist(a[i], b[j]);
            ca[i][j] = match (i, j) {
                (0, 0) => d,
                (0, _) => ca[0][j - 1].max(d),
                (_, 0) => ca[i - 1][0].max(d),
                _ => ca[i - 1][j].min(ca[i - 1][j - 1]).min(ca[i][j - 1]).max(d),
            };
        }
    }
    ca[n - 1][m - 1]
}

fn dtw(a: &[Point], b: &[Point]) -> f64 {
    let (n, m) = (a.len(), b.len());
    let mut cost = vec![vec![f64::INFINITY; m + 1]; n + 1];
    cost[0][0] = 0.0;
    for i in 1..=n {
        for j in 1..=m {
            let d = dist(a[i - 1], b[j - 1]);
            cost[i][j] = d + cost[i - 1][j].min(cost[i][j - 1]).min(cost[i - 1][j - 1]);
        }
    }
    cost[n][m]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn line(offset: f64, n: usize) -> Vec<Point> {
        (0..n).map(|i| (i as f64, offset)).collect()
    }

    #[test]
    fn identical_curves_have_zero_distance() {
        let c = from_series(&[0.0, 1.0, 3.0, 2.0, 5.0]);
        for method in SimilarityMethod::ALL {
            let d = method.distance(&c, &c).unwrap();
            assert!(d.abs() < EPS, "{method}: {d}");
        }
    }

    #[test]
    fn parallel_lines() {
        let a = line(0.0, 5);
        let b = line(2.0, 5);
        assert!((SimilarityMethod::AreaBetweenCurves.distance(&a, &b).unwrap() - 8.0).abs() < EPS);
        assert!((SimilarityMethod::Frechet.distance(&a, &b).unwrap() - 2.0).abs() < EPS);
        assert!((SimilarityMethod::Dtw.distance(&a, &b).unwrap() - 10.0).abs() < EPS);
        assert!(SimilarityMethod::CurveLength.distance(&a, &b).unwrap().abs() < EPS);
        assert!((SimilarityMethod::Pcm.distance(&a, &b).unwrap() - 8.0).abs() < EPS);
    }

    #[test]
    fn curve_length_difference() {
        let a = line(0.0, 3);
        let b = from_series(&[0.0, 1.0, 0.0]);
        let expected = 2.0 * 2f64.sqrt() - 2.0;
        let d = SimilarityMethod::CurveLength.distance(&a, &b).unwrap();
        assert!((d - expected).abs() < EPS);
    }

    #[test]
    fn empty_curve_rejected() {
        assert!(SimilarityMethod::Dtw.distance(&[], &line(0.0, 2)).is_err());
    }

    #[test]
    fn method_names_roundtrip() {
        for method in SimilarityMethod::ALL {
            assert_eq!(method.name().parse::<SimilarityMethod>().unwrap(), method);
        }
        assert!("euclid".parse::<SimilarityMethod>().is_err());
    }
}
