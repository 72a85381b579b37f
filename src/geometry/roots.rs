//! Real polynomial roots for the ray/curve intersection tests.

use std::f64::consts::PI;

/// Coefficients smaller than this fraction of the largest one are treated as zero.
const RELATIVE_EPSILON: f64 = 1e-12;

/// Roots within this distance of `[0, 1]` are clamped into the interval.
pub const PARAMETER_TOLERANCE: f64 = 1e-9;

/// Solves `a·t² + b·t + c = 0` for real `t`.
#[must_use]
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    let scale = a.abs().max(b.abs()).max(c.abs());
    if scale == 0.0 {
        return Vec::new();
    }
    if a.abs() <= RELATIVE_EPSILON * scale {
        if b.abs() <= RELATIVE_EPSILON * scale {
            return Vec::new();
        }
        return vec![-c / b];
    }

    let disc = b.mul_add(b, -4.0 * a * c);
    if disc < -RELATIVE_EPSILON * b * b {
        return Vec::new();
    }
    if disc <= RELATIVE_EPSILON * b * b {
        return vec![-b / (2.0 * a)];
    }

    // Numerically stable form avoiding cancellation.
    let sqrt = disc.sqrt();
    let q = -0.5 * (b + b.signum() * sqrt);
    let mut roots = vec![q / a];
    if q != 0.0 {
        roots.push(c / q);
    } else {
        roots.push(-b / a - q / a);
    }
    roots
}

/// Solves `a·t³ + b·t² + c·t + d = 0` for real `t`.
///
/// Falls back to [`solve_quadratic`] when the cubic term vanishes. Roots are
/// refined with two Newton steps against the original polynomial.
#[must_use]
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    let scale = a.abs().max(b.abs()).max(c.abs()).max(d.abs());
    if scale == 0.0 {
        return Vec::new();
    }
    if a.abs() <= RELATIVE_EPSILON * scale {
        return solve_quadratic(b, c, d);
    }

    // Normalise to t³ + B·t² + C·t + D and depress with t = u − B/3.
    let (bn, cn, dn) = (b / a, c / a, d / a);
    let shift = bn / 3.0;
    let p = cn - bn * bn / 3.0;
    let q = 2.0 * bn * bn * bn / 27.0 - bn * cn / 3.0 + dn;
    let disc = q * q / 4.0 + p * p * p / 27.0;
    let disc_scale = (q * q / 4.0).abs().max((p * p * p / 27.0).abs());

    let mut roots = if disc.abs() <= RELATIVE_EPSILON * disc_scale.max(f64::MIN_POSITIVE) {
        if p.abs() <= RELATIVE_EPSILON * scale / a.abs() {
            vec![-shift]
        } else {
            let u = (-q / 2.0).cbrt();
            vec![2.0 * u - shift, -u - shift]
        }
    } else if disc > 0.0 {
        let sqrt = disc.sqrt();
        let u = (-q / 2.0 + sqrt).cbrt();
        let v = (-q / 2.0 - sqrt).cbrt();
        vec![u + v - shift]
    } else {
        let r = (-p / 3.0).sqrt();
        let cos_arg = (3.0 * q / (2.0 * p) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
        let phi = cos_arg.acos() / 3.0;
        (0..3)
            .map(|k| 2.0 * r * (phi - 2.0 * PI * f64::from(k) / 3.0).cos() - shift)
            .collect()
    };

    for root in &mut roots {
        *root = polish(a, b, c, d, *root);
    }
    roots
}

/// Newton refinement of a cubic root.
fn polish(a: f64, b: f64, c: f64, d: f64, mut t: f64) -> f64 {
    for _ in 0..2 {
        let f = a.mul_add(t, b).mul_add(t, c).mul_add(t, d);
        let df = (3.0 * a).mul_add(t, 2.0 * b).mul_add(t, c);
        if df == 0.0 {
            break;
        }
        let next = t - f / df;
        if !next.is_finite() {
            break;
        }
        t = next;
    }
    t
}

/// Keeps roots inside `[0, 1]` (with [`PARAMETER_TOLERANCE`] slack), clamped
/// and deduplicated.
#[must_use]
pub fn unit_interval(mut roots: Vec<f64>) -> Vec<f64> {
    roots.retain(|t| (-PARAMETER_TOLERANCE..=1.0 + PARAMETER_TOLERANCE).contains(t));
    for t in &mut roots {
        *t = t.clamp(0.0, 1.0);
    }
    roots.sort_by(f64::total_cmp);
    roots.dedup_by(|a, b| (*a - *b).abs() <= PARAMETER_TOLERANCE);
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut v: Vec<f64>) -> Vec<f64> {
        v.sort_by(f64::total_cmp);
        v
    }

    #[test]
    fn quadratic_two_roots() {
        let roots = sorted(solve_quadratic(1.0, -3.0, 2.0));
        assert_eq!(roots.len(), 2);
        assert!((roots[0] - 1.0).abs() < 1e-12);
        assert!((roots[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn quadratic_degenerates_to_linear() {
        let roots = solve_quadratic(0.0, 2.0, -1.0);
        assert_eq!(roots, vec![0.5]);
    }

    #[test]
    fn quadratic_no_real_roots() {
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_empty());
    }

    #[test]
    fn cubic_three_real_roots() {
        // (t - 0.1)(t - 0.5)(t - 0.9)
        let roots = sorted(solve_cubic(1.0, -1.5, 0.59, -0.045));
        assert_eq!(roots.len(), 3);
        for (root, expected) in roots.iter().zip([0.1, 0.5, 0.9]) {
            assert!((root - expected).abs() < 1e-10, "{root} vs {expected}");
        }
    }

    #[test]
    fn cubic_single_real_root() {
        // (t - 0.25)(t² + 1)
        let roots = solve_cubic(1.0, -0.25, 1.0, -0.25);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn cubic_with_vanishing_leading_term() {
        let roots = sorted(solve_cubic(0.0, 1.0, -3.0, 2.0));
        assert_eq!(roots.len(), 2);
        assert!((roots[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn identically_zero_polynomial_has_no_isolated_roots() {
        assert!(solve_cubic(0.0, 0.0, 0.0, 0.0).is_empty());
    }

    #[test]
    fn unit_interval_filters_and_clamps() {
        let roots = unit_interval(vec![-0.5, -1e-12, 0.3, 0.3 + 1e-12, 1.0 + 1e-12, 1.5]);
        assert_eq!(roots, vec![0.0, 0.3, 1.0]);
    }
}
