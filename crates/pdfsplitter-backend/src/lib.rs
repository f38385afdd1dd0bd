//! pdfsplitter-backend: Document engine abstraction and lopdf backend.
//!
//! This crate defines the [`DocumentBackend`] trait through which the rest of
//! pdfsplitter-rs reads and rewrites outlines, counts pages and extracts page
//! ranges, plus [`LopdfBackend`], the default implementation built on lopdf.
//! It depends on pdfsplitter-core for shared data types.

pub mod backend;
pub mod error;
pub mod lopdf_backend;

pub use backend::DocumentBackend;
pub use error::BackendError;
pub use lopdf_backend::LopdfBackend;
pub use pdfsplitter_core;
