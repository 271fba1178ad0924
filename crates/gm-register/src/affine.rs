use nalgebra::{DMatrix, Matrix3};

use crate::RegisterError;

/// Relative singular-value cutoff for rank checks in least-squares fitting.
const RANK_EPS: f64 = 1e-10;

/// 2-D affine transform in homogeneous form (last row `0 0 1`).
///
/// Estimated from homologous point pairs between the deformed map and the
/// reference map. Convention throughout the workspace: a transform estimated
/// from `(deformed, reference)` pairs maps deformed-frame coordinates into
/// the reference frame; its [`inverse`](Self::inverse) goes the other way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    m: Matrix3<f64>,
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            m: Matrix3::identity(),
        }
    }

    pub fn from_matrix(m: Matrix3<f64>) -> Self {
        Self { m }
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.m
    }

    /// Least-squares fit from index-paired point lists.
    ///
    /// Solves `A p = b` for the six affine parameters, where `A` stacks
    /// `[x y 1]` rows of the source points. Rank deficiency of `A`
    /// (collinear points) is rejected here, before any warp can consume the
    /// transform.
    pub fn estimate(src: &[[f64; 2]], dst: &[[f64; 2]]) -> Result<Self, RegisterError> {
        if src.len() != dst.len() {
            return Err(RegisterError::PointCountMismatch {
                deformed: src.len(),
                reference: dst.len(),
            });
        }
        if src.len() < 3 {
            return Err(RegisterError::TooFewPoints { got: src.len() });
        }

        let n = src.len();
        let a = DMatrix::from_fn(n, 3, |r, c| match c {
            0 => src[r][0],
            1 => src[r][1],
            _ => 1.0,
        });
        let b = DMatrix::from_fn(n, 2, |r, c| dst[r][c]);

        let svd = a.svd(true, true);
        let max_sv = svd.singular_values.max();
        let rank = svd
            .singular_values
            .iter()
            .filter(|&&s| s > max_sv * RANK_EPS)
            .count();
        if rank < 3 {
            return Err(RegisterError::DegenerateGeometry);
        }

        let params = svd
            .solve(&b, max_sv * RANK_EPS)
            .map_err(|_| RegisterError::DegenerateGeometry)?;

        // params is 3x2: columns are (a11, a12, tx) and (a21, a22, ty).
        let m = Matrix3::new(
            params[(0, 0)],
            params[(1, 0)],
            params[(2, 0)],
            params[(0, 1)],
            params[(1, 1)],
            params[(2, 1)],
            0.0,
            0.0,
            1.0,
        );

        Ok(Self { m })
    }

    pub fn apply(&self, p: [f64; 2]) -> [f64; 2] {
        let x = self.m[(0, 0)] * p[0] + self.m[(0, 1)] * p[1] + self.m[(0, 2)];
        let y = self.m[(1, 0)] * p[0] + self.m[(1, 1)] * p[1] + self.m[(1, 2)];
        [x, y]
    }

    pub fn inverse(&self) -> Result<Self, RegisterError> {
        let inv = self
            .m
            .try_inverse()
            .ok_or(RegisterError::DegenerateGeometry)?;
        Ok(Self { m: inv })
    }
}

/// Index-paired homologous point lists for the two frames.
///
/// No transform is cached: [`estimate`](Self::estimate) recomputes from the
/// current lists, so replacing the points can never leave a stale transform
/// in circulation.
#[derive(Debug, Clone, Default)]
pub struct HomologousPoints {
    deformed: Vec<[f64; 2]>,
    reference: Vec<[f64; 2]>,
}

impl HomologousPoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces both lists. Lengths must match and be at least 3.
    pub fn set(
        &mut self,
        deformed: Vec<[f64; 2]>,
        reference: Vec<[f64; 2]>,
    ) -> Result<(), RegisterError> {
        if deformed.len() != reference.len() {
            return Err(RegisterError::PointCountMismatch {
                deformed: deformed.len(),
                reference: reference.len(),
            });
        }
        if deformed.len() < 3 {
            return Err(RegisterError::TooFewPoints {
                got: deformed.len(),
            });
        }

        self.deformed = deformed;
        self.reference = reference;
        Ok(())
    }

    pub fn deformed(&self) -> &[[f64; 2]] {
        &self.deformed
    }

    pub fn reference(&self) -> &[[f64; 2]] {
        &self.reference
    }

    /// Deformed-frame -> reference-frame transform from the current lists.
    pub fn estimate(&self) -> Result<AffineTransform, RegisterError> {
        AffineTransform::estimate(&self.deformed, &self.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::{AffineTransform, HomologousPoints};
    use crate::RegisterError;

    fn apply_known(p: [f64; 2]) -> [f64; 2] {
        // rotation-ish + scale + translation
        [
            1.2 * p[0] - 0.3 * p[1] + 4.0,
            0.25 * p[0] + 0.9 * p[1] - 2.5,
        ]
    }

    #[test]
    fn estimate_recovers_known_transform() {
        let src = [[0.0, 0.0], [10.0, 0.0], [0.0, 10.0], [7.0, 3.0], [2.0, 8.0]];
        let dst: Vec<[f64; 2]> = src.iter().map(|&p| apply_known(p)).collect();

        let t = AffineTransform::estimate(&src, &dst).expect("well-posed fit");

        for &p in &src {
            let q = t.apply(p);
            let expected = apply_known(p);
            assert!((q[0] - expected[0]).abs() < 1e-9);
            assert!((q[1] - expected[1]).abs() < 1e-9);
        }
    }

    #[test]
    fn forward_inverse_round_trip() {
        let src = [[0.0, 0.0], [5.0, 1.0], [1.0, 6.0], [4.0, 4.0]];
        let dst: Vec<[f64; 2]> = src.iter().map(|&p| apply_known(p)).collect();
        let t = AffineTransform::estimate(&src, &dst).expect("well-posed fit");
        let inv = t.inverse().expect("invertible");

        let p = [3.7, -1.2];
        let back = inv.apply(t.apply(p));
        assert!((back[0] - p[0]).abs() < 1e-9);
        assert!((back[1] - p[1]).abs() < 1e-9);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = AffineTransform::estimate(&[[0.0, 0.0]; 4], &[[0.0, 0.0]; 3]).unwrap_err();
        assert_eq!(
            err,
            RegisterError::PointCountMismatch {
                deformed: 4,
                reference: 3
            }
        );
    }

    #[test]
    fn fewer_than_three_pairs_are_rejected() {
        let err = AffineTransform::estimate(&[[0.0, 0.0]; 2], &[[1.0, 1.0]; 2]).unwrap_err();
        assert_eq!(err, RegisterError::TooFewPoints { got: 2 });
    }

    #[test]
    fn collinear_points_fail_at_estimation() {
        let src = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let dst = [[0.0, 0.0], [2.0, 2.0], [4.0, 4.0], [6.0, 6.0]];
        let err = AffineTransform::estimate(&src, &dst).unwrap_err();
        assert_eq!(err, RegisterError::DegenerateGeometry);
    }

    #[test]
    fn homologous_points_validate_on_set() {
        let mut pts = HomologousPoints::new();
        assert!(
            pts.set(vec![[0.0, 0.0], [1.0, 0.0]], vec![[0.0, 0.0], [1.0, 0.0]])
                .is_err()
        );

        pts.set(
            vec![[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]],
            vec![[1.0, 2.0], [11.0, 2.0], [1.0, 12.0]],
        )
        .expect("valid point lists");

        let t = pts.estimate().expect("well-posed fit");
        let q = t.apply([5.0, 5.0]);
        assert!((q[0] - 6.0).abs() < 1e-9);
        assert!((q[1] - 7.0).abs() < 1e-9);
    }
}
