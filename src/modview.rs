//! Main module for modview library functionality

pub mod collector;
pub mod config;
pub mod error;
pub mod formats;
pub mod interval;
pub mod lexer;
pub mod location;
pub mod pipeline;
pub mod segment;
pub mod tag;
pub mod testing;
pub mod tree;
pub mod version;

pub use error::{ReconcileError, ViewError};
pub use pipeline::{annotate, Annotated, Pipeline};
