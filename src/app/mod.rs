//! Application core: pure domain logic, zero I/O.
//!
//! The sampling loop, the status read side and the events they emit.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer testable without real peripherals.

pub mod events;
pub mod ports;
pub mod sampler;
pub mod status;
