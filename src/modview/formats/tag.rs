//! XML-like tag serialization
//!
//! Writes the source back out with every annotated segment wrapped in a `chunk` tag whose
//! `type` attribute lists the kinds of the tags on that node. Plain text is escaped and
//! written in place, so stripping the markup and unescaping gives back the source.
//!
//! ## Example
//!
//! ```text
//! <module facade="false" has-module-syntax="true">
//! <chunk type="import-statement">import x from '<chunk type="import-module-specifier">m</chunk>'</chunk>
//! </module>
//! ```
//!
//! `has-module-syntax` is left out when the lexer release does not report it.

use super::registry::{FormatError, Formatter};
use crate::modview::pipeline::Annotated;
use crate::modview::segment::Segment;
use crate::modview::tag::kind_names;

pub struct TagFormatter;

impl Formatter for TagFormatter {
    fn name(&self) -> &str {
        "tag"
    }

    fn serialize(&self, annotated: &Annotated) -> Result<String, FormatError> {
        serialize_annotated(annotated)
    }

    fn description(&self) -> &str {
        "Source with annotated ranges wrapped in <chunk> tags"
    }
}

pub fn serialize_annotated(annotated: &Annotated) -> Result<String, FormatError> {
    let mut out = String::new();
    out.push_str(&format!("<module facade=\"{}\"", annotated.facade));
    if let Some(flag) = annotated.has_module_syntax {
        out.push_str(&format!(" has-module-syntax=\"{flag}\""));
    }
    out.push_str(">\n");
    push_segments(&mut out, &annotated.segments, &annotated.source)?;
    out.push_str("\n</module>");
    Ok(out)
}

fn push_segments(out: &mut String, segments: &[Segment], source: &str) -> Result<(), FormatError> {
    for segment in segments {
        match segment {
            Segment::Text { span } => {
                let text = segment.text(source).ok_or_else(|| {
                    FormatError::SerializationError(format!(
                        "segment {span:?} does not fit a source of {} bytes",
                        source.len()
                    ))
                })?;
                out.push_str(&escape_xml(text));
            }
            Segment::Annotated { tags, children, .. } => {
                out.push_str(&format!("<chunk type=\"{}\">", kind_names(tags)));
                push_segments(out, children, source)?;
                out.push_str("</chunk>");
            }
        }
    }
    Ok(())
}

/// Escape XML special characters
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
