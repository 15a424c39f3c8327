//! Output formats for annotated sources
//!
//! Presentation adapters that turn an [`Annotated`](crate::modview::pipeline::Annotated)
//! source into text:
//! - `tag`: the source with every annotated segment wrapped in an XML-like chunk
//! - `treeviz`: one line per tree node with its span, position and tag descriptions
//! - `json`: the sorted tree and the segments, for other tools to render

pub mod json;
pub mod registry;
pub mod tag;
pub mod treeviz;

pub use json::JsonFormatter;
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use tag::{serialize_annotated as serialize_tag, TagFormatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
