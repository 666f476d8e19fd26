//! Public data types shared by the rotor crates.
//!
//! Everything here is plain data: specs submitted by callers, handles returned to them,
//! classified outcomes produced by remote operations and the status views rendered back.

mod domain;
pub use domain::*;

mod outcome;
pub use outcome::{FailureKind, Outcome};

mod error;
pub use error::ModelError;
