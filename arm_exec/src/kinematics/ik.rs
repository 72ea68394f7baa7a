//! Inverse kinematics calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Matrix3, Vector3};
use std::f64::consts::{FRAC_PI_2, PI};

use super::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Tolerance used to detect the singular configurations of every stage.
const DEGENERATE_TOL: f64 = 1e-6;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Shoulder and elbow angles for both elbow branches of one base branch.
struct ElbowSolution {
    /// `[branch][shoulder, elbow]`
    ///
    /// Units: radians
    qa: [[f64; 2]; 2],
    flag: SolFlag,
}

/// Wrist angles for both wrist branches of one base and elbow branch.
struct WristSolution {
    /// `[branch][forearm roll, wrist pitch, wrist roll]`
    ///
    /// Units: radians
    qw: [[f64; 3]; 2],
    flag: SolFlag,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Solver {
    /// Compute all eight joint vectors which place the tool flange at the
    /// target pose.
    ///
    /// The target position is in millimeters. `last_joints` is only read
    /// when a stage is singular, to fill in the angle the pose does not
    /// determine. No candidate is dropped; check the flags in the returned set
    /// to know which ones reach the target.
    pub fn solve_ik(&self, target: &Pose6D, last_joints: &Joint6D) -> IkSolveSet {
        let last = last_joints.to_radians();

        let r06 = target.rotation();
        let p06 = target.position() / 1000.0;

        // Wrist centre in the base frame
        let p0_w = p06 - r06 * self.links.wrist;

        let mut set = IkSolveSet::default();

        // ---- BASE ----

        let (qs, base_flag) = if p0_w[0].hypot(p0_w[1]) <= DEGENERATE_TOL {
            // Wrist centre on the base axis, any base angle works
            ([last[0], last[0]], SolFlag::DegenerateResolved)
        }
        else {
            (
                [p0_w[1].atan2(p0_w[0]), (-p0_w[1]).atan2(-p0_w[0])],
                SolFlag::Valid
            )
        };

        for arm in 0..2 {
            let (s, c) = (qs[arm] + self.dh[0].theta_home_rad).sin_cos();
            let r10 = Matrix3::new(
                  c,   s,  0.0,
                0.0, 0.0, -1.0,
                 -s,   c,  0.0,
            );

            // Shoulder to wrist centre in the joint 1 frame
            let l1_sw = r10 * p0_w - self.links.base;

            let elbow = self.solve_elbow(arm, &l1_sw);

            for el in 0..2 {
                let r31 = self.elbow_rotation(&elbow.qa[el]);
                let r36 = r31 * r10 * r06;

                let wrist = self.solve_wrist(arm, &r36, &last);

                for w in 0..2 {
                    let idx = 4 * arm + 2 * el + w;

                    let q = [
                        qs[arm],
                        elbow.qa[el][0],
                        elbow.qa[el][1],
                        wrist.qw[w][0],
                        wrist.qw[w][1],
                        wrist.qw[w][2],
                    ];

                    let mut wrapped = [0f64; NUM_JOINTS];
                    for (o, i) in wrapped.iter_mut().zip(q.iter()) {
                        *o = wrap_angle(*i);
                    }

                    set.config[idx] = Joint6D::from_radians(&wrapped);
                    set.sol_flag[idx] = [base_flag, elbow.flag, wrist.flag];
                }
            }
        }

        set
    }

    /// Solve the shoulder and elbow for a wrist centre expressed in the
    /// joint 1 frame.
    fn solve_elbow(&self, arm: usize, l1_sw: &Vector3<f64>) -> ElbowSolution {
        let l_arm = self.config.l_arm_m;
        let l_fe = self.config.effective_forearm_m();

        // Elbow angle at which the forearm is in line with the upper arm
        let t = (self.config.d_elbow_m / self.config.l_forearm_m).atan();

        let l_sw_2 = l1_sw[0].powi(2) + l1_sw[1].powi(2);
        let l_sw = l_sw_2.sqrt();
        let atan_a = l1_sw[1].atan2(l1_sw[0]);

        // Fully extended, a single solution
        if (l_arm + l_fe - l_sw).abs() <= DEGENERATE_TOL {
            let flag = match l_sw > l_arm + l_fe {
                true => SolFlag::Unreachable,
                false => SolFlag::Valid,
            };
            let qa = [atan_a + FRAC_PI_2, t];

            return ElbowSolution { qa: [qa, qa], flag }
        }

        // Fully folded, the elbow can fold either way
        if (l_sw - (l_arm - l_fe).abs()).abs() <= DEGENERATE_TOL {
            let flag = match l_sw < (l_arm - l_fe).abs() {
                true => SolFlag::Unreachable,
                false => SolFlag::Valid,
            };
            let shoulder = atan_a + FRAC_PI_2;
            let qa = match arm {
                0 => [[shoulder, t + PI], [shoulder, t - PI]],
                _ => [[shoulder, t - PI], [shoulder, t + PI]],
            };

            return ElbowSolution { qa, flag }
        }

        // General case, law of cosines in the shoulder-elbow-wrist triangle
        let cos_a = 0.5 * (l_arm.powi(2) + l_sw_2 - l_fe.powi(2)) / (l_arm * l_sw);
        let cos_e = 0.5 * (l_arm.powi(2) + l_fe.powi(2) - l_sw_2) / (l_arm * l_fe);

        // A triangle that cannot close means the wrist centre is out of reach
        let flag = match cos_a.abs() > 1.0 || cos_e.abs() > 1.0 {
            true => SolFlag::Unreachable,
            false => SolFlag::Valid,
        };

        let acos_a = clamped_acos(cos_a);
        let acos_e = clamped_acos(cos_e);

        let down = [atan_a - acos_a + FRAC_PI_2, t - acos_e + PI];
        let up = [atan_a + acos_a + FRAC_PI_2, t + acos_e - PI];

        let qa = match arm {
            0 => [down, up],
            _ => [up, down],
        };

        ElbowSolution { qa, flag }
    }

    /// Rotation from the joint 1 frame into the joint 3 frame.
    fn elbow_rotation(&self, qa: &[f64; 2]) -> Matrix3<f64> {
        let (s0, c0) = (qa[0] + self.dh[1].theta_home_rad).sin_cos();
        let (s1, c1) = (qa[1] + self.dh[2].theta_home_rad).sin_cos();

        Matrix3::new(
            c0 * c1 - s0 * s1,  c0 * s1 + s0 * c1, 0.0,
                          0.0,                0.0, 1.0,
            c0 * s1 + s0 * c1, -c0 * c1 + s0 * s1, 0.0,
        )
    }

    /// Solve the spherical wrist for the rotation remaining after the first
    /// three joints.
    fn solve_wrist(
        &self,
        arm: usize,
        r36: &Matrix3<f64>,
        last: &[f64; NUM_JOINTS]
    ) -> WristSolution {
        let r = |i: usize| r36[(i / 3, i % 3)];

        let mut qw = [[0f64; 3]; 2];

        let cos_w = r(8);
        let locked = cos_w >= 1.0 - DEGENERATE_TOL || cos_w <= -1.0 + DEGENERATE_TOL;

        if cos_w >= 1.0 - DEGENERATE_TOL {
            qw[0][1] = 0.0;
            qw[1][1] = 0.0;
        }
        else if cos_w <= -1.0 + DEGENERATE_TOL {
            let (q0, q1) = match arm {
                0 => (PI, -PI),
                _ => (-PI, PI),
            };
            qw[0][1] = q0;
            qw[1][1] = q1;
        }
        else {
            let acos_w = clamped_acos(cos_w);
            let (q0, q1) = match arm {
                0 => (acos_w, -acos_w),
                _ => (-acos_w, acos_w),
            };
            qw[0][1] = q0;
            qw[1][1] = q1;
        }

        if locked {
            // The two roll axes coincide, so only their sum (wrist straight)
            // or their difference (wrist folded back) is known. Keep one of
            // them from the last joints and give the rest to the other.
            let folded = cos_w < 0.0;

            let roll_6 = |q4: f64| {
                let (s, c) = (q4 + self.dh[3].theta_home_rad).sin_cos();
                match folded {
                    false => (c * r(3) - s * r(0)).atan2(c * r(0) + s * r(3)),
                    true => (c * r(3) - s * r(0)).atan2(-c * r(0) - s * r(3)),
                }
            };
            let roll_4 = |q6: f64| {
                let (s, c) = (q6 + self.dh[5].theta_home_rad).sin_cos();
                match folded {
                    false => (c * r(3) - s * r(0)).atan2(c * r(0) + s * r(3)),
                    true => (-s * r(0) - c * r(3)).atan2(s * r(3) - c * r(0)),
                }
            };

            let keep_4 = [last[3], roll_6(last[3])];
            let keep_6 = [roll_4(last[5]), last[5]];

            let (first, second) = match arm {
                0 => (keep_4, keep_6),
                _ => (keep_6, keep_4),
            };

            qw[0][0] = first[0];
            qw[0][2] = first[1];
            qw[1][0] = second[0];
            qw[1][2] = second[1];

            WristSolution { qw, flag: SolFlag::DegenerateResolved }
        }
        else {
            let sign = match arm {
                0 => 1.0,
                _ => -1.0,
            };

            qw[0][0] = (sign * r(5)).atan2(sign * r(2));
            qw[1][0] = (-sign * r(5)).atan2(-sign * r(2));
            qw[0][2] = (sign * r(7)).atan2(-sign * r(6));
            qw[1][2] = (-sign * r(7)).atan2(sign * r(6));

            WristSolution { qw, flag: SolFlag::Valid }
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Arc cosine which saturates to `0` and `pi` outside of `[-1, 1]`.
fn clamped_acos(x: f64) -> f64 {
    if x >= 1.0 {
        0.0
    }
    else if x <= -1.0 {
        PI
    }
    else {
        x.acos()
    }
}

/// Fold an angle into `(-pi, pi]` by adding or removing a single half turn.
///
/// Only the stage outputs are folded this way, which are already within one
/// half turn of the range.
fn wrap_angle(q: f64) -> f64 {
    let q = if q > PI {
        q - PI
    }
    else if q < -PI {
        q + PI
    }
    else {
        q
    };

    if q == -PI {
        PI
    }
    else {
        q
    }
}
