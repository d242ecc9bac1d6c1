//! Foundation utilities shared by every engine subsystem
//!
//! Math types, logging setup, and frame timing. Nothing in here knows about
//! entities, scenes, or the GPU.

pub mod logging;
pub mod math;
pub mod time;
