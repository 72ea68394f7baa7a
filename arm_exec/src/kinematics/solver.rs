//! Kinematic solver geometry

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector3;
use std::f64::consts::FRAC_PI_2;

use super::{ArmConfig, NUM_JOINTS};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Denavit-Hartenberg parameters of one joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DhRow {
    /// Joint angle at which the joint reads zero.
    ///
    /// Units: radians
    pub theta_home_rad: f64,

    /// Units: meters
    pub d_m: f64,

    /// Units: meters
    pub a_m: f64,

    /// Units: radians
    pub alpha_rad: f64,
}

/// Fixed link offsets, each expressed in the frame of the joint that carries
/// it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkVectors {
    /// Base to shoulder, in the joint 1 frame.
    pub base: Vector3<f64>,
    /// Shoulder to elbow, in the joint 2 frame.
    pub arm: Vector3<f64>,
    /// Elbow to wrist centre, in the joint 3 frame.
    pub elbow: Vector3<f64>,
    /// Wrist centre to tool flange, in the joint 6 frame.
    pub wrist: Vector3<f64>,
}

/// Forward and inverse kinematics solver for one arm.
///
/// The geometry is derived once from the [`ArmConfig`] and never changes, so
/// the solver can be shared freely between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Solver {
    pub(super) config: ArmConfig,
    pub(super) dh: [DhRow; NUM_JOINTS],
    pub(super) links: LinkVectors,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Solver {
    pub fn new(config: ArmConfig) -> Self {
        let dh = [
            DhRow {
                theta_home_rad: 0.0,
                d_m: config.l_base_m,
                a_m: config.d_base_m,
                alpha_rad: -FRAC_PI_2,
            },
            DhRow {
                theta_home_rad: -FRAC_PI_2,
                d_m: 0.0,
                a_m: config.l_arm_m,
                alpha_rad: 0.0,
            },
            DhRow {
                theta_home_rad: FRAC_PI_2,
                d_m: config.d_elbow_m,
                a_m: 0.0,
                alpha_rad: FRAC_PI_2,
            },
            DhRow {
                theta_home_rad: 0.0,
                d_m: config.l_forearm_m,
                a_m: 0.0,
                alpha_rad: -FRAC_PI_2,
            },
            DhRow {
                theta_home_rad: 0.0,
                d_m: 0.0,
                a_m: 0.0,
                alpha_rad: FRAC_PI_2,
            },
            DhRow {
                theta_home_rad: 0.0,
                d_m: config.l_wrist_m,
                a_m: 0.0,
                alpha_rad: 0.0,
            },
        ];

        let links = LinkVectors::from_dh(&dh);

        Self { config, dh, links }
    }

    pub fn config(&self) -> &ArmConfig {
        &self.config
    }

}

impl LinkVectors {
    /// Pull the link offsets out of the DH table.
    fn from_dh(dh: &[DhRow; NUM_JOINTS]) -> Self {
        Self {
            base: Vector3::new(dh[0].a_m, -dh[0].d_m, 0.0),
            arm: Vector3::new(dh[1].a_m, 0.0, 0.0),
            elbow: Vector3::new(-dh[2].d_m, 0.0, dh[3].d_m),
            wrist: Vector3::new(0.0, 0.0, dh[5].d_m),
        }
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(ArmConfig::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_links_from_dh() {
        let solver = Solver::default();
        let cfg = solver.config;

        assert_eq!(solver.links.base, Vector3::new(cfg.d_base_m, -cfg.l_base_m, 0.0));
        assert_eq!(solver.links.arm, Vector3::new(cfg.l_arm_m, 0.0, 0.0));
        assert_eq!(solver.links.elbow, Vector3::new(-cfg.d_elbow_m, 0.0, cfg.l_forearm_m));
        assert_eq!(solver.links.wrist, Vector3::new(0.0, 0.0, cfg.l_wrist_m));
    }
}
