//! Service Layer
//!
//! Async orchestration around the pure engines. This layer owns every
//! lock and every balance; `game/` decides, `service/` applies.

pub mod config;
pub mod gate;
pub mod ledger;
pub mod match_service;
pub mod table;

pub use config::{ConfigError, EngineConfig};
pub use gate::{AdmissionGate, GateSwitch, OpenGate};
pub use ledger::StakeLedger;
pub use match_service::{MatchService, Receipt, ServiceContext};
pub use table::MatchTable;
