//! JSON output
//!
//! The sorted tree and the segment list, for renderers living outside this crate. Spans are
//! `{"start", "end"}` byte offsets into the source; tags carry their kind in `type`.

use super::registry::{FormatError, Formatter};
use crate::modview::pipeline::Annotated;
use crate::modview::segment::Segment;
use crate::modview::tree::IntervalTree;
use serde::Serialize;

pub struct JsonFormatter;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonView<'a> {
    facade: bool,
    has_module_syntax: Option<bool>,
    tree: &'a IntervalTree,
    segments: &'a [Segment],
}

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, annotated: &Annotated) -> Result<String, FormatError> {
        let view = JsonView {
            facade: annotated.facade,
            has_module_syntax: annotated.has_module_syntax,
            tree: &annotated.tree,
            segments: &annotated.segments,
        };
        serde_json::to_string_pretty(&view)
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Sorted tree and segments as JSON"
    }
}
