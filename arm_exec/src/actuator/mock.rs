//! Recording actuator used to test the coordinator

use std::sync::{Arc, Mutex};

use super::{ActDem, ActId, HandActuator, HandDem, JointActuator};
use crate::kinematics::NUM_JOINTS;

/// Every demand sent to any joint of a [`MockJoint`] bank, in order.
pub(crate) type DemLog = Arc<Mutex<Vec<(ActId, ActDem)>>>;

/// Every demand sent to a [`MockHand`], in order.
pub(crate) type HandLog = Arc<Mutex<Vec<HandDem>>>;

pub(crate) struct MockJoint {
    id: ActId,
    log: DemLog,
}

impl JointActuator for MockJoint {
    fn id(&self) -> ActId {
        self.id
    }

    fn send(&mut self, dem: ActDem) {
        self.log.lock().unwrap().push((self.id, dem));
    }
}

pub(crate) struct MockHand {
    log: HandLog,
}

impl HandActuator for MockHand {
    fn send(&mut self, dem: HandDem) {
        self.log.lock().unwrap().push(dem);
    }
}

pub(crate) fn mock_hand() -> (MockHand, HandLog) {
    let log = HandLog::default();
    (MockHand { log: log.clone() }, log)
}

/// Build a bank of mock joints sharing one log.
pub(crate) fn mock_bank() -> ([MockJoint; NUM_JOINTS], DemLog) {
    let log = DemLog::default();
    let make = |id: ActId| MockJoint { id, log: log.clone() };

    let bank = [
        make(ActId::Joint1),
        make(ActId::Joint2),
        make(ActId::Joint3),
        make(ActId::Joint4),
        make(ActId::Joint5),
        make(ActId::Joint6),
    ];

    (bank, log)
}
