//! # Run Configuration
//!
//! This module holds the values a run needs up front: the platform
//! credentials and the target group reference. There is no config file,
//! environment lookup, or command-line surface; a configuration is either
//! embedded as literals or captured from interactive prompts at run start,
//! and it is read-only for the remainder of the run.
//!
//! ## Submodules
//!
//! - **run**: The configuration type and its two acquisition paths.

mod run;

pub use run::RunConfig;
