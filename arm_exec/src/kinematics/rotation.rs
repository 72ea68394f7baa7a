//! Rotation matrix helpers
//!
//! Euler angles follow the roll-pitch-yaw convention `R = Rz(c) Ry(b) Rx(a)`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Matrix3;
use std::f64::consts::FRAC_PI_2;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Distance of `|sin(pitch)|` from one below which the Euler decomposition
/// is treated as gimbal locked.
const EULER_GIMBAL_TOL: f64 = 1e-4;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Rotation part of a Denavit-Hartenberg transform.
///
/// Units: radians
pub fn dh_rotation(theta_rad: f64, alpha_rad: f64) -> Matrix3<f64> {
    let (st, ct) = theta_rad.sin_cos();
    let (sa, ca) = alpha_rad.sin_cos();

    Matrix3::new(
        ct, -ca * st,  sa * st,
        st,  ca * ct, -sa * ct,
        0.0,      sa,       ca,
    )
}

/// Build a rotation matrix from roll `a`, pitch `b` and yaw `c`.
///
/// Units: radians
pub fn euler_to_rot_mat(a_rad: f64, b_rad: f64, c_rad: f64) -> Matrix3<f64> {
    let (s1, c1) = a_rad.sin_cos();
    let (s2, c2) = b_rad.sin_cos();
    let (s3, c3) = c_rad.sin_cos();

    Matrix3::new(
        c3 * c2, c3 * s2 * s1 - s3 * c1, c3 * s2 * c1 + s3 * s1,
        s3 * c2, s3 * s2 * s1 + c3 * c1, s3 * s2 * c1 - c3 * s1,
            -s2,                c2 * s1,                c2 * c1,
    )
}

/// Decompose a rotation matrix into roll, pitch and yaw `[a, b, c]`.
///
/// When the pitch is within the gimbal lock tolerance of +/-90 degrees the
/// yaw is fixed at zero and the whole rotation about the vertical is put into
/// the roll.
///
/// Units: radians
pub fn rot_mat_to_euler(r: &Matrix3<f64>) -> [f64; 3] {
    let r20 = r[(2, 0)];

    if r20.abs() >= 1.0 - EULER_GIMBAL_TOL {
        if r20 < 0.0 {
            [r[(0, 1)].atan2(r[(1, 1)]), FRAC_PI_2, 0.0]
        }
        else {
            [-r[(0, 1)].atan2(r[(1, 1)]), -FRAC_PI_2, 0.0]
        }
    }
    else {
        let b = (-r20).atan2(r[(0, 0)].hypot(r[(1, 0)]));
        let cb = b.cos();
        let c = (r[(1, 0)] / cb).atan2(r[(0, 0)] / cb);
        let a = (r[(2, 1)] / cb).atan2(r[(2, 2)] / cb);

        [a, b, c]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_mat_eq(a: &Matrix3<f64>, b: &Matrix3<f64>) {
        for i in 0..3 {
            for j in 0..3 {
                assert!(
                    (a[(i, j)] - b[(i, j)]).abs() < 1e-12,
                    "Matrices differ at ({}, {}):\n{}\n{}", i, j, a, b
                );
            }
        }
    }

    #[test]
    fn test_dh_rotation() {
        assert_mat_eq(&dh_rotation(0.0, 0.0), &Matrix3::identity());

        // Pure rotation about z
        let r = dh_rotation(FRAC_PI_2, 0.0);
        assert_mat_eq(&r, &Matrix3::new(
            0.0, -1.0, 0.0,
            1.0,  0.0, 0.0,
            0.0,  0.0, 1.0
        ));

        // Twist only maps y onto z
        let r = dh_rotation(0.0, -FRAC_PI_2);
        assert_mat_eq(&r, &Matrix3::new(
            1.0, 0.0,  0.0,
            0.0, 0.0,  1.0,
            0.0, -1.0, 0.0
        ));
    }

    #[test]
    fn test_euler_decomposition() {
        let angles = [
            [0.3, -0.2, 1.1],
            [-2.5, 0.7, -0.4],
            [0.0, 0.0, 0.0],
            [3.0, -1.2, 2.9],
        ];

        for e in angles.iter() {
            let r = euler_to_rot_mat(e[0], e[1], e[2]);
            let out = rot_mat_to_euler(&r);

            for i in 0..3 {
                assert!((out[i] - e[i]).abs() < 1e-9, "{:?} became {:?}", e, out);
            }
        }
    }

    #[test]
    fn test_euler_gimbal_lock() {
        // Pitch of +90 folds the yaw into the roll
        let r = euler_to_rot_mat(0.4, FRAC_PI_2, 0.1);
        let out = rot_mat_to_euler(&r);
        assert!((out[0] - 0.3).abs() < 1e-9);
        assert_eq!(out[1], FRAC_PI_2);
        assert_eq!(out[2], 0.0);

        // Whatever the decomposition, it must rebuild the same rotation
        assert_mat_eq(&euler_to_rot_mat(out[0], out[1], out[2]), &r);

        let r = euler_to_rot_mat(0.4, -FRAC_PI_2, 0.1);
        let out = rot_mat_to_euler(&r);
        assert_eq!(out[1], -FRAC_PI_2);
        assert_mat_eq(&euler_to_rot_mat(out[0], out[1], out[2]), &r);
    }
}
