//! Pareto dominance, non-dominated filtering, min–max normalization and
//! hypervolume of fronts.

use std::cmp::Ordering;

use crate::solution::Solution;

/// Pareto dominance between two objective vectors (minimization).
///
/// Returns `Less` when `a` dominates `b`, `Greater` when `b` dominates `a`
/// and `Equal` when they are mutually non-dominated.
pub fn dominance(a: &[f64], b: &[f64]) -> Ordering {
    let mut a_better = false;
    let mut b_better = false;
    for (x, y) in a.iter().zip(b) {
        if x < y {
            a_better = true;
        } else if y < x {
            b_better = true;
        }
        if a_better && b_better {
            return Ordering::Equal;
        }
    }
    match (a_better, b_better) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    dominance(a, b) == Ordering::Less
}

/// Non-dominated subset of `solutions`; duplicates in objective space are kept once.
pub fn non_dominated(solutions: &[Solution]) -> Vec<Solution> {
    let mut front: Vec<Solution> = Vec::new();
    for candidate in solutions {
        let mut rejected = false;
        front.retain(|member| {
            if rejected {
                return true;
            }
            match dominance(&candidate.objectives, &member.objectives) {
                Ordering::Less => false,
                Ordering::Greater => {
                    rejected = true;
                    true
                }
                Ordering::Equal => {
                    if candidate.objectives == member.objectives {
                        rejected = true;
                    }
                    true
                }
            }
        });
        if !rejected {
            front.push(candidate.clone());
        }
    }
    front
}

/// Per-column minimum and maximum of a matrix.
pub fn column_bounds(matrix: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
    let columns = matrix.first().map(|row| row.len()).unwrap_or(0);
    let mut mins = vec![f64::INFINITY; columns];
    let mut maxs = vec![f64::NEG_INFINITY; columns];
    for row in matrix {
        for (j, value) in row.iter().enumerate().take(columns) {
            mins[j] = mins[j].min(*value);
            maxs[j] = maxs[j].max(*value);
        }
    }
    (mins, maxs)
}

/// Min–max normalize every row using the given column bounds.
///
/// A column whose bounds coincide is mapped to `value - min`, which keeps it
/// finite instead of dividing by zero.
pub fn normalize(matrix: &[Vec<f64>], mins: &[f64], maxs: &[f64]) -> Vec<Vec<f64>> {
    matrix
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(j, value)| {
                    let range = maxs[j] - mins[j];
                    if range > 0.0 {
                        (value - mins[j]) / range
                    } else {
                        value - mins[j]
                    }
                })
                .collect()
        })
        .collect()
}

/// Volume dominated by `points` and bounded by `reference_point`. Points
/// that do not strictly dominate the reference point contribute nothing.
pub fn hypervolume(points: &[Vec<f64>], reference_point: &[f64]) -> f64 {
    let inside: Vec<Vec<f64>> = points
        .iter()
        .filter(|p| p.iter().zip(reference_point).all(|(x, r)| x < r))
        .cloned()
        .collect();
    slice_volume(inside, reference_point)
}

/// Hypervolume by slicing along the last objective.
fn slice_volume(mut points: Vec<Vec<f64>>, reference_point: &[f64]) -> f64 {
    let m = reference_point.len();
    if points.is_empty() || m == 0 {
        return 0.0;
    }
    if m == 1 {
        let best = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
        return reference_point[0] - best;
    }
    if m == 2 {
        points.sort_by(|a, b| {
            a[0].partial_cmp(&b[0])
                .unwrap_or(Ordering::Equal)
                .then(a[1].partial_cmp(&b[1]).unwrap_or(Ordering::Equal))
        });
        let mut volume = 0.0;
        let mut ceiling = reference_point[1];
        for p in &points {
            if p[1] < ceiling {
                volume += (reference_point[0] - p[0]) * (ceiling - p[1]);
                ceiling = p[1];
            }
        }
        return volume;
    }

    let last = m - 1;
    points.sort_by(|a, b| a[last].partial_cmp(&b[last]).unwrap_or(Ordering::Equal));
    let mut volume = 0.0;
    for i in 0..points.len() {
        let upper = points.get(i + 1).map(|p| p[last]).unwrap_or(reference_point[last]);
        let depth = upper - points[i][last];
        if depth <= 0.0 {
            continue;
        }
        let projected: Vec<Vec<f64>> = points[..=i].iter().map(|p| p[..last].to_vec()).collect();
        volume += depth * slice_volume(projected, &reference_point[..last]);
    }
    volume
}

/// Volume each point adds to the hypervolume of `points`, aligned with
/// `points`. The reference point is the per-objective maximum plus
/// `offset`, so every point contributes when `offset` is positive.
///
/// Points are expected to be mutually non-dominated; duplicates contribute
/// zero.
pub fn hypervolume_contributions(points: &[Vec<f64>], offset: f64) -> Vec<f64> {
    if points.is_empty() {
        return Vec::new();
    }
    let (_, maxs) = column_bounds(points);
    let reference_point: Vec<f64> = maxs.iter().map(|m| m + offset).collect();
    if reference_point.len() == 2 {
        contributions_2d(points, &reference_point)
    } else {
        exclusive_contributions(points, &reference_point)
    }
}

/// Sweep over the points sorted by the first objective: each point owns the
/// rectangle up to its right neighbour and down from its left neighbour.
fn contributions_2d(points: &[Vec<f64>], reference_point: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|a, b| {
        points[*a][0]
            .partial_cmp(&points[*b][0])
            .unwrap_or(Ordering::Equal)
            .then(points[*b][1].partial_cmp(&points[*a][1]).unwrap_or(Ordering::Equal))
    });
    let mut contributions = vec![0.0; points.len()];
    for (k, i) in order.iter().enumerate() {
        let right = order.get(k + 1).map(|j| points[*j][0]).unwrap_or(reference_point[0]);
        let above = if k == 0 {
            reference_point[1]
        } else {
            points[order[k - 1]][1]
        };
        contributions[*i] = ((right - points[*i][0]) * (above - points[*i][1])).max(0.0);
    }
    contributions
}

/// Box of each point minus the part of it the other points also cover.
fn exclusive_contributions(points: &[Vec<f64>], reference_point: &[f64]) -> Vec<f64> {
    (0..points.len())
        .map(|i| {
            let own: f64 = points[i].iter().zip(reference_point).map(|(x, r)| r - x).product();
            let limited: Vec<Vec<f64>> = points
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, q)| q.iter().zip(&points[i]).map(|(a, b)| (*a).max(*b)).collect())
                .collect();
            (own - hypervolume(&weakly_non_dominated(limited), reference_point)).max(0.0)
        })
        .collect()
}

fn weakly_non_dominated(points: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    let mut front: Vec<Vec<f64>> = Vec::with_capacity(points.len());
    for candidate in points {
        if front
            .iter()
            .any(|member| member == &candidate || dominates(member, &candidate))
        {
            continue;
        }
        front.retain(|member| !dominates(&candidate, member));
        front.push(candidate);
    }
    front
}
