//! HTTP implementations of [`rotor_core::RemoteOperation`].

mod graph;
pub use graph::{GraphCommentOperation, GraphConfig, classify};

mod errors;
pub use errors::RemoteError;
