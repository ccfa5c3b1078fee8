//! Maps a 0–100 quality score to a letter grade, a color and a ring fill.

use std::f64::consts::PI;

/// Radius of the score ring, in the ring's own drawing units.
pub const RING_RADIUS: f64 = 54.0;

/// Fixed palette used for grades. A+ and A share `Green`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreColor {
    Green,
    Blue,
    Amber,
    Red,
}

impl ScoreColor {
    pub fn hex(self) -> &'static str {
        match self {
            ScoreColor::Green => "#10b981",
            ScoreColor::Blue => "#3b82f6",
            ScoreColor::Amber => "#f59e0b",
            ScoreColor::Red => "#ef4444",
        }
    }
}

/// Presentation of one score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorePresentation {
    /// Score clamped to 0–100.
    pub score: f64,
    pub grade: &'static str,
    pub color: ScoreColor,
    /// Dash offset of the ring stroke: full circumference at 0, zero at 100.
    pub ring_offset: f64,
}

impl ScorePresentation {
    /// Fraction of the ring that is filled, in 0.0–1.0.
    pub fn fill_fraction(&self) -> f64 {
        self.score / 100.0
    }
}

pub fn circumference(radius: f64) -> f64 {
    2.0 * PI * radius
}

/// Presents `score` on the default ring (radius [`RING_RADIUS`]).
pub fn present(score: f64) -> ScorePresentation {
    present_with_radius(score, RING_RADIUS)
}

pub fn present_with_radius(score: f64, radius: f64) -> ScorePresentation {
    let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 100.0) };
    let (grade, color) = grade_for(score);
    let circumference = circumference(radius);
    ScorePresentation {
        score,
        grade,
        color,
        ring_offset: circumference - (score / 100.0) * circumference,
    }
}

fn grade_for(score: f64) -> (&'static str, ScoreColor) {
    if score >= 90.0 {
        ("A+", ScoreColor::Green)
    } else if score >= 80.0 {
        ("A", ScoreColor::Green)
    } else if score >= 70.0 {
        ("B", ScoreColor::Blue)
    } else if score >= 60.0 {
        ("C", ScoreColor::Amber)
    } else {
        ("D", ScoreColor::Red)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(grade: &str) -> u8 {
        match grade {
            "D" => 0,
            "C" => 1,
            "B" => 2,
            "A" => 3,
            "A+" => 4,
            other => panic!("unexpected grade {other}"),
        }
    }

    #[test]
    fn grade_boundaries() {
        assert_eq!(present(90.0).grade, "A+");
        assert_eq!(present(89.9).grade, "A");
        assert_eq!(present(80.0).grade, "A");
        assert_eq!(present(79.0).grade, "B");
        assert_eq!(present(70.0).grade, "B");
        assert_eq!(present(60.0).grade, "C");
        assert_eq!(present(59.0).grade, "D");
        assert_eq!(present(0.0).grade, "D");
    }

    #[test]
    fn a_plus_and_a_share_a_color() {
        assert_eq!(present(95.0).color, present(85.0).color);
        assert_eq!(present(75.0).color, ScoreColor::Blue);
        assert_eq!(present(65.0).color, ScoreColor::Amber);
        assert_eq!(present(10.0).color, ScoreColor::Red);
    }

    #[test]
    fn grade_is_monotonic_and_offset_decreasing() {
        let mut prev = present(0.0);
        for s in 1..=100 {
            let cur = present(s as f64);
            assert!(rank(cur.grade) >= rank(prev.grade), "grade dropped at {s}");
            assert!(cur.ring_offset < prev.ring_offset, "offset not decreasing at {s}");
            prev = cur;
        }
    }

    #[test]
    fn ring_offset_endpoints() {
        let c = circumference(RING_RADIUS);
        assert!(present(100.0).ring_offset.abs() < 1e-9);
        assert!((present(0.0).ring_offset - c).abs() < 1e-9);
        assert!((present(50.0).ring_offset - c / 2.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        assert_eq!(present(140.0).score, 100.0);
        assert_eq!(present(-3.0).score, 0.0);
        assert_eq!(present(f64::NAN).grade, "D");
    }

    #[test]
    fn radius_is_a_parameter() {
        let p = present_with_radius(0.0, 10.0);
        assert!((p.ring_offset - 20.0 * PI).abs() < 1e-9);
        assert!((p.fill_fraction() - 0.0).abs() < 1e-9);
    }
}
