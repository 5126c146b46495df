//! CLI command implementations

pub mod run;
pub mod status;

pub use run::execute as run;
pub use status::execute as status;
