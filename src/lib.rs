//! Environmental monitoring station library.
//!
//! Exposes the engine (sensor simulation, alert arbitration, visual
//! coordination) and the host adapters for integration testing and the
//! simulation binary.

#![deny(unused_must_use)]

pub mod adapters;
pub mod alert;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod sensors;
pub mod visual;
