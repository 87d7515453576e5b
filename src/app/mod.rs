//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the policy layer of the agent: the per-tick
//! orchestration and the structured events it emits. All interaction with
//! hardware and radios happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without a device.

pub mod events;
pub mod ports;
pub mod service;
