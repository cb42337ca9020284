//! Core library components.
//!
//! Pattern resolution, environment discovery, provisioning steps, and the
//! encryption lifecycle state machine.

pub mod config;
pub mod envfile;
pub mod environments;
pub mod git_crypt;
pub mod keys;
pub mod lifecycle;
pub mod pattern;
pub mod steps;
