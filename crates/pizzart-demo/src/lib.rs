#![forbid(unsafe_code)]

//! Headless Pizzart storefront demo.
//!
//! Drives a full customer journey through the threaded runtime against the
//! in-memory collaborators and reports what happened.

pub mod cli;
pub mod scenario;
