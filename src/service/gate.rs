//! Admission Gate
//!
//! External predicates consulted when a match is created. Nothing else
//! asks the gate; matches already in play always run to completion.

use std::sync::atomic::{AtomicBool, Ordering};

/// Creation-time admission check.
pub trait AdmissionGate: Send + Sync {
    /// Is the system accepting new matches?
    fn accepting_matches(&self) -> bool;

    /// Is this instance alive?
    fn instance_alive(&self) -> bool;
}

/// Gate that always admits.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenGate;

impl AdmissionGate for OpenGate {
    fn accepting_matches(&self) -> bool {
        true
    }

    fn instance_alive(&self) -> bool {
        true
    }
}

/// Operator-controlled gate.
#[derive(Debug)]
pub struct GateSwitch {
    accepting: AtomicBool,
    alive: AtomicBool,
}

impl GateSwitch {
    /// Open switch.
    pub fn new() -> Self {
        Self {
            accepting: AtomicBool::new(true),
            alive: AtomicBool::new(true),
        }
    }

    /// Toggle new-match admission.
    pub fn set_accepting(&self, accepting: bool) {
        self.accepting.store(accepting, Ordering::SeqCst);
    }

    /// Mark the instance dead or alive.
    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::SeqCst);
    }
}

impl Default for GateSwitch {
    fn default() -> Self {
        Self::new()
    }
}

impl AdmissionGate for GateSwitch {
    fn accepting_matches(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }

    fn instance_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_toggles() {
        let gate = GateSwitch::new();
        assert!(gate.accepting_matches() && gate.instance_alive());

        gate.set_accepting(false);
        assert!(!gate.accepting_matches());
        gate.set_alive(false);
        assert!(!gate.instance_alive());
    }
}
