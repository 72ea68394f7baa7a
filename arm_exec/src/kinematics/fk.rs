//! Forward kinematics calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Matrix3;

use super::*;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Solver {
    /// Compute the pose of the tool flange for the given joint angles.
    ///
    /// The position is the sum of the four link vectors, each rotated into the
    /// base frame by the cumulative rotation of the joint that carries it.
    ///
    /// The returned position is in the unit of the [`ArmConfig`] (meters),
    /// not in millimeters. The angles are in degrees and the rotation matrix
    /// is always attached.
    pub fn solve_fk(&self, joints: &Joint6D) -> Pose6D {
        let q = joints.to_radians();

        let mut r = [Matrix3::identity(); NUM_JOINTS];
        for i in 0..NUM_JOINTS {
            r[i] = dh_rotation(
                q[i] + self.dh[i].theta_home_rad,
                self.dh[i].alpha_rad
            );
        }

        // Cumulative rotations, base frame to joint frame
        let r02 = r[0] * r[1];
        let r03 = r02 * r[2];
        let r04 = r03 * r[3];
        let r05 = r04 * r[4];
        let r06 = r05 * r[5];

        let p = r[0] * self.links.base
            + r02 * self.links.arm
            + r03 * self.links.elbow
            + r06 * self.links.wrist;

        let [a, b, c] = rot_mat_to_euler(&r06);

        Pose6D {
            x: p[0],
            y: p[1],
            z: p[2],
            a: a.to_degrees(),
            b: b.to_degrees(),
            c: c.to_degrees(),
            r: Some(r06),
        }
    }
}
