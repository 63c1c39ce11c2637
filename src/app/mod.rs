//! Application core: engine orchestration, zero direct I/O.
//!
//! Sensor simulation, alert arbitration and visual decisions are tied
//! together here. All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod context;
pub mod events;
pub mod menu;
pub mod ports;
pub mod service;
