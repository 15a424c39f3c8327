//! Treeviz formatter for interval trees
//!
//! One line per tree node, nesting drawn with box connectors, so the structure the lexer
//! ranges were reconciled into can be scanned quickly. Each line shows what a viewer would
//! show when hovering the node: the span, where it starts, and the description of every tag.
//!
//! So the format is :
//! <prefix><connector> <start>..<end> @<line>:<column> <descriptions> ⟨<excerpt>⟩
//!
//! Example:
//!
//! ```text
//! ⧉ module (facade: false, hasModuleSyntax: true)
//! ├─ 0..17 @0:0 Import Statement (type: static) ⟨import x from 'm'⟩
//! │  └─ 15..16 @0:15 Import Module Specifier: "m" ⟨m⟩
//! └─ 18..29 @1:0 Import Statement (type: dynamic) ⟨import('n')⟩
//!    ├─ 18..18 @1:0 Dynamic Import Start Position ⟨⟩
//!    └─ 25..28 @1:7 Import Module Specifier: "n" ⟨'n'⟩
//! ```
//!
//! Excerpts are truncated to the configured width and show newlines as `↵`.

use super::registry::{FormatError, Formatter};
use crate::modview::location::SourceLocation;
use crate::modview::pipeline::Annotated;
use crate::modview::tag::Tag;
use crate::modview::tree::Node;

pub const DEFAULT_LABEL_WIDTH: usize = 30;

pub struct TreevizFormatter {
    pub label_width: usize,
}

impl Default for TreevizFormatter {
    fn default() -> Self {
        Self {
            label_width: DEFAULT_LABEL_WIDTH,
        }
    }
}

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, annotated: &Annotated) -> Result<String, FormatError> {
        Ok(to_treeviz_str(annotated, self.label_width))
    }

    fn description(&self) -> &str {
        "One line per node with span, position and tag descriptions"
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

pub fn to_treeviz_str(annotated: &Annotated, label_width: usize) -> String {
    let module_syntax = match annotated.has_module_syntax {
        Some(flag) => flag.to_string(),
        None => "unsupported".to_string(),
    };
    let mut result = format!(
        "⧉ module (facade: {}, hasModuleSyntax: {})\n",
        annotated.facade, module_syntax
    );

    let printer = Printer {
        source: &annotated.source,
        location: SourceLocation::new(&annotated.source),
        label_width,
    };
    printer.append_children(&mut result, annotated.tree.roots(), "");
    result
}

struct Printer<'a> {
    source: &'a str,
    location: SourceLocation,
    label_width: usize,
}

impl Printer<'_> {
    fn append_node(&self, result: &mut String, node: &Node, prefix: &str, is_last: bool) {
        let connector = if is_last { "└─" } else { "├─" };
        let descriptions = node
            .tags
            .iter()
            .map(Tag::describe)
            .collect::<Vec<_>>()
            .join("; ");
        let excerpt = truncate(
            &self
                .source
                .get(node.span.clone())
                .unwrap_or_default()
                .replace('\n', "↵"),
            self.label_width,
        );

        result.push_str(&format!(
            "{}{} {}..{} @{} {} ⟨{}⟩\n",
            prefix,
            connector,
            node.span.start,
            node.span.end,
            self.location.byte_to_position(node.span.start),
            descriptions,
            excerpt
        ));

        let new_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
        self.append_children(result, &node.children, &new_prefix);
    }

    fn append_children(&self, result: &mut String, children: &[Node], prefix: &str) {
        for (i, child) in children.iter().enumerate() {
            let is_last = i == children.len() - 1;
            self.append_node(result, child, prefix, is_last);
        }
    }
}
