//! Kinematics data types

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Matrix3, Vector3};
use std::fmt;
use std::ops::{Add, Index, IndexMut, Sub};

// Internal
use super::{euler_to_rot_mat, NUM_IK_SOLUTIONS, NUM_IK_STAGES, NUM_JOINTS};
use comms_if::eqpt::mech::ActId;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One angle per joint, ordered from the base to the wrist roll.
///
/// Units: degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Joint6D(pub [f64; NUM_JOINTS]);

/// A Cartesian pose of the tool flange in the base frame.
///
/// The orientation is authoritative in `r` when it is present (poses produced
/// by forward kinematics), otherwise it is given by the Euler angles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose6D {
    /// Units: millimeters
    pub x: f64,
    /// Units: millimeters
    pub y: f64,
    /// Units: millimeters
    pub z: f64,

    /// Roll about X.
    ///
    /// Units: degrees
    pub a: f64,
    /// Pitch about Y.
    ///
    /// Units: degrees
    pub b: f64,
    /// Yaw about Z.
    ///
    /// Units: degrees
    pub c: f64,

    /// Rotation matrix, `Rz(c) Ry(b) Rx(a)`.
    pub r: Option<Matrix3<f64>>,
}

/// The eight candidate joint vectors for one inverse kinematics request.
///
/// Candidate `i` is built from base branch `i / 4`, elbow branch `(i / 2) % 2`
/// and wrist branch `i % 2`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IkSolveSet {
    pub config: [Joint6D; NUM_IK_SOLUTIONS],

    /// Base, elbow and wrist flags for each candidate.
    pub sol_flag: [[SolFlag; NUM_IK_STAGES]; NUM_IK_SOLUTIONS],
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Outcome of one stage of an inverse kinematics solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolFlag {
    /// The stage has a regular solution.
    Valid,

    /// The target is out of reach for this stage. The angles are still
    /// filled in but do not reach the target.
    Unreachable,

    /// The stage was singular and one angle was taken from the previous
    /// joints.
    DegenerateResolved,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Joint6D {
    pub const fn new(j1: f64, j2: f64, j3: f64, j4: f64, j5: f64, j6: f64) -> Self {
        Self([j1, j2, j3, j4, j5, j6])
    }

    /// Largest absolute angle of any joint.
    pub fn abs_max(&self) -> f64 {
        util::maths::abs_max(&self.0)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    /// Convert every angle from degrees to radians.
    pub fn to_radians(&self) -> [f64; NUM_JOINTS] {
        let mut rad = [0f64; NUM_JOINTS];
        for (r, d) in rad.iter_mut().zip(self.0.iter()) {
            *r = d.to_radians();
        }
        rad
    }

    /// Build from radians.
    pub fn from_radians(rad: &[f64; NUM_JOINTS]) -> Self {
        let mut deg = [0f64; NUM_JOINTS];
        for (d, r) in deg.iter_mut().zip(rad.iter()) {
            *d = r.to_degrees();
        }
        Self(deg)
    }
}

impl Sub for Joint6D {
    type Output = Joint6D;

    fn sub(self, rhs: Joint6D) -> Joint6D {
        let mut out = self;
        for (o, r) in out.0.iter_mut().zip(rhs.0.iter()) {
            *o -= r;
        }
        out
    }
}

impl Add for Joint6D {
    type Output = Joint6D;

    fn add(self, rhs: Joint6D) -> Joint6D {
        let mut out = self;
        for (o, r) in out.0.iter_mut().zip(rhs.0.iter()) {
            *o += r;
        }
        out
    }
}

impl Index<usize> for Joint6D {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl IndexMut<usize> for Joint6D {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

impl Index<ActId> for Joint6D {
    type Output = f64;

    fn index(&self, id: ActId) -> &f64 {
        &self.0[id.index()]
    }
}

impl From<[f64; NUM_JOINTS]> for Joint6D {
    fn from(a: [f64; NUM_JOINTS]) -> Self {
        Self(a)
    }
}

impl fmt::Display for Joint6D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, j) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:8.3}", j)?;
        }
        write!(f, "]")
    }
}

impl Pose6D {
    /// Build a pose from a position and Euler angles.
    pub fn from_euler(x: f64, y: f64, z: f64, a: f64, b: f64, c: f64) -> Self {
        Self {
            x, y, z,
            a, b, c,
            r: None,
        }
    }

    /// True if the rotation matrix is authoritative over the Euler angles.
    pub fn has_r(&self) -> bool {
        self.r.is_some()
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// The orientation as a rotation matrix.
    pub fn rotation(&self) -> Matrix3<f64> {
        match self.r {
            Some(r) => r,
            None => euler_to_rot_mat(
                self.a.to_radians(),
                self.b.to_radians(),
                self.c.to_radians()
            ),
        }
    }

    /// Scale the position from meters to millimeters.
    ///
    /// Forward kinematics returns its position in meters, this brings it into
    /// the millimeter convention of the rest of the arm software.
    pub fn metres_to_mm(self) -> Self {
        Self {
            x: self.x * 1000.0,
            y: self.y * 1000.0,
            z: self.z * 1000.0,
            ..self
        }
    }
}

impl fmt::Display for Pose6D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x: {:.3}, y: {:.3}, z: {:.3}, a: {:.3}, b: {:.3}, c: {:.3})",
            self.x, self.y, self.z, self.a, self.b, self.c
        )
    }
}

impl IkSolveSet {
    /// True if no stage of candidate `index` is unreachable.
    pub fn is_reachable(&self, index: usize) -> bool {
        self.sol_flag[index]
            .iter()
            .all(|f| *f != SolFlag::Unreachable)
    }

    /// Iterate over the candidates with their flags.
    pub fn candidates(&self)
        -> impl Iterator<Item = (usize, &Joint6D, &[SolFlag; NUM_IK_STAGES])>
    {
        self.config
            .iter()
            .zip(self.sol_flag.iter())
            .enumerate()
            .map(|(i, (c, f))| (i, c, f))
    }
}

impl Default for SolFlag {
    fn default() -> Self {
        SolFlag::Valid
    }
}

impl From<SolFlag> for i8 {
    /// Numeric form used in logs: 1 valid, 0 unreachable, -1 degenerate.
    fn from(flag: SolFlag) -> i8 {
        match flag {
            SolFlag::Valid => 1,
            SolFlag::Unreachable => 0,
            SolFlag::DegenerateResolved => -1,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_joint_arithmetic() {
        let a = Joint6D::new(10.0, -20.0, 90.0, 0.0, 45.0, -720.0);
        let b = Joint6D::new(0.0, 0.0, 90.0, 0.0, 0.0, 0.0);

        assert_eq!(a - b, Joint6D::new(10.0, -20.0, 0.0, 0.0, 45.0, -720.0));
        assert_eq!((a - b) + b, a);
        assert_eq!((a - b).abs_max(), 720.0);
        assert_eq!(a[ActId::Joint3], 90.0);

        let back = Joint6D::from_radians(&a.to_radians());
        assert!((back - a).abs_max() < 1e-9);
    }

    #[test]
    fn test_flag_log_form() {
        assert_eq!(i8::from(SolFlag::Valid), 1);
        assert_eq!(i8::from(SolFlag::Unreachable), 0);
        assert_eq!(i8::from(SolFlag::DegenerateResolved), -1);
    }

    #[test]
    fn test_pose_rotation() {
        let p = Pose6D::from_euler(100.0, 0.0, 50.0, 0.0, 0.0, 90.0);
        assert!(!p.has_r());

        let r = p.rotation();
        assert!((r[(0, 1)] + 1.0).abs() < 1e-12);
        assert!((r[(1, 0)] - 1.0).abs() < 1e-12);

        // The matrix wins over the angles once present
        let q = Pose6D { r: Some(Matrix3::identity()), ..p };
        assert!(q.has_r());
        assert_eq!(q.rotation(), Matrix3::identity());

        let mm = Pose6D::from_euler(0.222, 0.0, 0.307, 0.0, 90.0, 0.0).metres_to_mm();
        assert!((mm.x - 222.0).abs() < 1e-9);
        assert!((mm.z - 307.0).abs() < 1e-9);
        assert_eq!(mm.b, 90.0);
    }
}
