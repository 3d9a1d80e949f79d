use serde::{Deserialize, Serialize};

/// Basic two dimensional point used for geometry operations.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

/// Result of scoring one freehand stroke against an ideal circle.
///
/// `score` is the weighted combination clamped to 0..=100. The three
/// sub-metrics are clamped at zero but deliberately not capped at 100,
/// so they can in principle display above the final score's ceiling.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct CircleAnalysis {
    pub score: u32,
    pub completeness: u32,
    pub roundness: u32,
    pub symmetry: u32,
}

/// Strokes with fewer points than this are rejected before analysis.
pub const MIN_STROKE_POINTS: usize = 10;

fn dist(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Centroid of the stroke plus the mean distance from the centroid to
/// each sample. This is the reference circle every metric compares
/// against; a least-squares fit is intentionally not attempted.
pub fn fit_circle(path: &[Point]) -> Option<(Point, f64)> {
    if path.is_empty() {
        return None;
    }
    let n = path.len() as f64;
    let ctr = path.iter().fold(Point { x: 0.0, y: 0.0 }, |acc, p| Point {
        x: acc.x + p.x,
        y: acc.y + p.y,
    });
    let ctr = Point {
        x: ctr.x / n,
        y: ctr.y / n,
    };
    let avg_radius = path.iter().map(|p| dist(*p, ctr)).sum::<f64>() / n;
    Some((ctr, avg_radius))
}

/// How well the stroke closes into a loop: 100 when the last point lands
/// on the first, decaying linearly with the gap relative to the circle's
/// own scale.
fn completeness_of(path: &[Point], avg_radius: f64) -> f64 {
    if avg_radius <= 0.0 {
        return 0.0;
    }
    let closure = dist(path[0], *path.last().unwrap());
    (100.0 - (closure / avg_radius) * 50.0).max(0.0)
}

/// How constant the radius stays around the centroid. The factor 200
/// drives the score to zero once the standard deviation reaches half the
/// average radius.
fn roundness_of(path: &[Point], ctr: Point, avg_radius: f64) -> f64 {
    if avg_radius <= 0.0 {
        return 0.0;
    }
    let n = path.len() as f64;
    let variance = path
        .iter()
        .map(|p| {
            let d = dist(*p, ctr) - avg_radius;
            d * d
        })
        .sum::<f64>()
        / n;
    (100.0 - (variance.sqrt() / avg_radius) * 200.0).max(0.0)
}

/// How evenly the samples cover the full angular range. Angles are
/// sorted, so drawing order and direction do not matter here; only the
/// final coverage does.
fn symmetry_of(path: &[Point], ctr: Point) -> f64 {
    let n = path.len();
    if n < 2 {
        // a single sample has no gaps to measure
        return 100.0;
    }
    let mut angles: Vec<f64> = path
        .iter()
        .map(|p| (p.y - ctr.y).atan2(p.x - ctr.x))
        .collect();
    angles.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let expected = 2.0 * std::f64::consts::PI / n as f64;
    let var = angles
        .windows(2)
        .map(|w| {
            let gap = w[1] - w[0];
            let d = gap - expected;
            d * d
        })
        .sum::<f64>()
        / (n as f64 - 1.0);
    (100.0 - var.sqrt() * 50.0).max(0.0)
}

/// Scores a stroke: completeness 0.3, roundness 0.5, symmetry 0.2.
///
/// Pure and total for any non-empty path; callers are expected to gate
/// strokes shorter than [`MIN_STROKE_POINTS`] before getting here. A
/// degenerate stroke whose points all coincide yields zero completeness
/// and roundness rather than a non-finite value.
pub fn analyze(path: &[Point]) -> CircleAnalysis {
    let (ctr, avg_radius) = fit_circle(path).unwrap_or_default();
    let completeness = if path.is_empty() {
        0.0
    } else {
        completeness_of(path, avg_radius)
    };
    let roundness = roundness_of(path, ctr, avg_radius);
    let symmetry = symmetry_of(path, ctr);
    let score = completeness * 0.3 + roundness * 0.5 + symmetry * 0.2;
    CircleAnalysis {
        score: (score.round() as i64).clamp(0, 100) as u32,
        completeness: completeness.round() as u32,
        roundness: roundness.round() as u32,
        symmetry: symmetry.round() as u32,
    }
}

/// What happened when a stroke was closed: the attempt tally always
/// advances; analysis and the best score only move when the stroke
/// passed the minimum-length gate.
#[derive(Clone, Copy, Debug)]
pub struct StrokeOutcome {
    pub attempts: u32,
    pub analysis: Option<CircleAnalysis>,
    pub best_score: u32,
    /// True only when the new score strictly beats the previous best.
    pub new_best: bool,
}

/// Policy for a completed stroke. Counts the attempt unconditionally,
/// rejects strokes shorter than [`MIN_STROKE_POINTS`] without touching
/// the best score, and otherwise scores the stroke and applies the
/// strictly-greater overwrite rule, so the best score never decreases.
pub fn close_stroke(path: &[Point], attempts: u32, best_score: u32) -> StrokeOutcome {
    let attempts = attempts + 1;
    if path.len() < MIN_STROKE_POINTS {
        return StrokeOutcome {
            attempts,
            analysis: None,
            best_score,
            new_best: false,
        };
    }
    let analysis = analyze(path);
    let new_best = analysis.score > best_score;
    StrokeOutcome {
        attempts,
        analysis: Some(analysis),
        best_score: if new_best { analysis.score } else { best_score },
        new_best,
    }
}

/// Letter grade for a score; `None` (no analysis yet) maps to a
/// placeholder glyph.
pub fn grade_letter(score: Option<u32>) -> &'static str {
    let Some(s) = score else {
        return "–";
    };
    match s {
        97.. => "A+",
        93.. => "A",
        90.. => "A-",
        87.. => "B+",
        83.. => "B",
        80.. => "B-",
        77.. => "C+",
        73.. => "C",
        70.. => "C-",
        60.. => "D",
        _ => "F",
    }
}

/// Display color tier for a score. Hues chosen to be easy to describe,
/// one tier per 90/80/70 band plus a catch-all.
pub fn score_color(score: u32) -> &'static str {
    match score {
        90.. => "mediumseagreen",
        80.. => "dodgerblue",
        70.. => "orange",
        _ => "orangered",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn regular_polygon(n: usize, r: f64) -> Vec<Point> {
        let mut pts: Vec<Point> = (0..n)
            .map(|i| {
                let a = i as f64 * 2.0 * PI / n as f64;
                Point {
                    x: 100.0 + r * a.cos(),
                    y: 100.0 + r * a.sin(),
                }
            })
            .collect();
        // close the loop so the first point is also the last
        pts.push(pts[0]);
        pts
    }

    #[test]
    fn regular_polygon_scores_perfect() {
        let path = regular_polygon(36, 80.0);
        let a = analyze(&path);
        assert_eq!(a.completeness, 100);
        assert_eq!(a.roundness, 100);
        // closing the loop duplicates one angle, which perturbs the gap
        // variance slightly; the rounded value must still be 100
        assert!(a.symmetry >= 99, "symmetry = {}", a.symmetry);
        assert_eq!(a.score, 100);
    }

    #[test]
    fn coincident_points_never_produce_non_finite_scores() {
        for n in [10, 25, 100] {
            let path = vec![Point { x: 42.0, y: -7.0 }; n];
            let a = analyze(&path);
            assert_eq!(a.completeness, 0);
            assert_eq!(a.roundness, 0);
            assert!(a.score <= 100);
        }
    }

    #[test]
    fn single_point_defaults_symmetry_to_100() {
        let a = analyze(&[Point { x: 1.0, y: 2.0 }]);
        assert_eq!(a.symmetry, 100);
        assert_eq!(a.completeness, 0);
        assert_eq!(a.roundness, 0);
        assert_eq!(a.score, 20);
    }

    #[test]
    fn analyze_is_idempotent() {
        let path = regular_polygon(17, 55.0);
        let a = analyze(&path);
        let b = analyze(&path);
        assert_eq!(a.score, b.score);
        assert_eq!(a.completeness, b.completeness);
        assert_eq!(a.roundness, b.roundness);
        assert_eq!(a.symmetry, b.symmetry);
    }

    #[test]
    fn jagged_square_loop_lands_in_the_average_band() {
        // 12 points tracing a square: corners plus two interpolated
        // points per edge, left slightly open at the start corner
        let corners = [
            (0.0, 0.0),
            (100.0, 0.0),
            (100.0, 100.0),
            (0.0, 100.0),
        ];
        let mut path = Vec::new();
        for i in 0..4 {
            let (x0, y0) = corners[i];
            let (x1, y1) = corners[(i + 1) % 4];
            for t in [0.0, 1.0 / 3.0, 2.0 / 3.0] {
                path.push(Point {
                    x: x0 + (x1 - x0) * t,
                    y: y0 + (y1 - y0) * t,
                });
            }
        }
        assert_eq!(path.len(), 12);
        let a = analyze(&path);
        assert!(a.roundness < 80, "roundness = {}", a.roundness);
        assert!(
            a.score > 55 && a.score < 80,
            "score = {} not in the C/D band",
            a.score
        );
    }

    #[test]
    fn fit_circle_matches_hand_computed_centroid() {
        let path = [
            Point { x: 0.0, y: 0.0 },
            Point { x: 4.0, y: 0.0 },
            Point { x: 4.0, y: 4.0 },
            Point { x: 0.0, y: 4.0 },
        ];
        let (ctr, avg) = fit_circle(&path).unwrap();
        assert!((ctr.x - 2.0).abs() < 1e-12);
        assert!((ctr.y - 2.0).abs() < 1e-12);
        assert!((avg - 8.0_f64.sqrt()).abs() < 1e-12);
        assert!(fit_circle(&[]).is_none());
    }

    #[test]
    fn grade_table_covers_every_documented_threshold() {
        let expect = [
            (100, "A+"),
            (97, "A+"),
            (96, "A"),
            (93, "A"),
            (92, "A-"),
            (90, "A-"),
            (89, "B+"),
            (87, "B+"),
            (86, "B"),
            (83, "B"),
            (82, "B-"),
            (80, "B-"),
            (79, "C+"),
            (77, "C+"),
            (76, "C"),
            (73, "C"),
            (72, "C-"),
            (70, "C-"),
            (69, "D"),
            (60, "D"),
            (59, "F"),
            (0, "F"),
        ];
        for (s, g) in expect {
            assert_eq!(grade_letter(Some(s)), g, "score {s}");
        }
        assert_eq!(grade_letter(None), "–");
    }

    #[test]
    fn grades_are_monotone_as_the_score_decreases() {
        let order = ["A+", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D", "F"];
        let rank = |g: &str| order.iter().position(|x| *x == g).unwrap();
        let mut prev = rank(grade_letter(Some(100)));
        for s in (0..100).rev() {
            let r = rank(grade_letter(Some(s)));
            assert!(r >= prev, "grade went up at score {s}");
            prev = r;
        }
    }

    #[test]
    fn color_tiers_switch_at_90_80_70() {
        assert_eq!(score_color(100), "mediumseagreen");
        assert_eq!(score_color(90), "mediumseagreen");
        assert_eq!(score_color(89), "dodgerblue");
        assert_eq!(score_color(80), "dodgerblue");
        assert_eq!(score_color(79), "orange");
        assert_eq!(score_color(70), "orange");
        assert_eq!(score_color(69), "orangered");
        assert_eq!(score_color(0), "orangered");
    }

    #[test]
    fn closing_a_stroke_counts_one_attempt_even_when_too_short() {
        let short = vec![Point { x: 1.0, y: 1.0 }; 4];
        let o = close_stroke(&short, 3, 50);
        assert_eq!(o.attempts, 4);
        assert!(o.analysis.is_none());
        assert_eq!(o.best_score, 50);
        assert!(!o.new_best);

        let o2 = close_stroke(&regular_polygon(36, 80.0), o.attempts, o.best_score);
        assert_eq!(o2.attempts, 5);
        assert!(o2.analysis.is_some());
    }

    #[test]
    fn best_score_never_decreases_across_a_session() {
        let strokes: Vec<Vec<Point>> = vec![
            vec![Point { x: 9.0, y: 9.0 }; 12], // coincident, scores near zero
            regular_polygon(36, 80.0),          // perfect
            vec![Point { x: 1.0, y: 1.0 }; 3],  // too short, skipped
            regular_polygon(12, 40.0),          // decent but worse than perfect
        ];
        let mut best = 37; // previously persisted value
        let mut max_seen = best;
        let mut attempts = 0;
        for (i, stroke) in strokes.iter().enumerate() {
            let o = close_stroke(stroke, attempts, best);
            assert_eq!(o.attempts, attempts + 1);
            assert!(o.best_score >= best, "best decreased on stroke {i}");
            if let Some(a) = o.analysis {
                max_seen = max_seen.max(a.score);
            }
            assert_eq!(o.best_score, max_seen, "stroke {i}");
            best = o.best_score;
            attempts = o.attempts;
        }
        assert_eq!(best, 100);
        assert_eq!(attempts, 4);
    }

    #[test]
    fn equal_score_does_not_raise_a_new_best() {
        let o = close_stroke(&regular_polygon(36, 80.0), 0, 100);
        assert!(!o.new_best);
        assert_eq!(o.best_score, 100);
    }

    #[test]
    fn noisy_circle_scores_below_a_clean_one() {
        // deterministic wobble on the radius
        let n = 60;
        let noisy: Vec<Point> = (0..=n)
            .map(|i| {
                let a = i as f64 * 2.0 * PI / n as f64;
                let r = 80.0 + 12.0 * (a * 5.0).sin();
                Point {
                    x: r * a.cos(),
                    y: r * a.sin(),
                }
            })
            .collect();
        let clean = regular_polygon(n, 80.0);
        let na = analyze(&noisy);
        let ca = analyze(&clean);
        assert!(na.roundness < ca.roundness);
        assert!(na.score < ca.score);
    }
}
