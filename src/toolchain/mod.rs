//! External toolchain invocation
//!
//! The guest toolchain is an opaque executable driven by name with fixed
//! argument vectors. Everything here goes through the [`Toolchain`] trait so
//! the project lifecycle can be exercised against a recording fake in tests.

pub mod command_line;
pub mod runner;

pub use command_line::CommandLineToolchain;
pub use runner::Toolchain;
