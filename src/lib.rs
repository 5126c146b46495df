//! Scriptforge - run source snippets as cached toolchain projects
//!
//! Scaffolds a disposable project for a submitted script, drives the guest
//! toolchain through create/add-package/restore/build/run, and caches the
//! generated project keyed by the script's fingerprint.

pub mod cli;
pub mod config;
pub mod error;
pub mod facade;
pub mod fingerprint;
pub mod manifest;
pub mod metadata;
pub mod project;
pub mod results;
pub mod toolchain;

pub use error::{ForgeError, ForgeResult};
