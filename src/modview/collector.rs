//! Record collection
//!
//! Turns lexer records into a flat list of [`TaggedInterval`]s. Nothing here cares about
//! nesting or order; the tree builder accepts intervals in any order.
//!
//! Per import: the specifier `[s, e)`, the statement `[ss, se)` tagged with the import kind,
//! a marker at `a` when there is an assertion, and a marker at `d` for dynamic imports.
//!
//! Per export (only for lexer releases that report export records): the exported name
//! `[s, e)`, and the local name `[ls, le)` when there is one.

use crate::modview::error::ReconcileError;
use crate::modview::interval::TaggedInterval;
use crate::modview::lexer::{ExportRecord, ImportRecord};
use crate::modview::tag::{ImportKind, Tag};
use std::ops::Range as ByteRange;

/// Collect intervals from import records and, when the lexer reports them, export records.
///
/// Pass `None` for `exports` when the lexer release predates export records.
pub fn collect_intervals(
    imports: &[ImportRecord],
    exports: Option<&[ExportRecord]>,
) -> Result<Vec<TaggedInterval>, ReconcileError> {
    let mut intervals = Vec::with_capacity(imports.len() * 2);

    for import in imports {
        collect_import(import, &mut intervals)?;
    }
    for export in exports.unwrap_or_default() {
        collect_export(export, &mut intervals)?;
    }

    log::debug!(
        "collected {} intervals from {} imports and {} exports",
        intervals.len(),
        imports.len(),
        exports.map_or(0, <[ExportRecord]>::len)
    );
    Ok(intervals)
}

fn collect_import(
    import: &ImportRecord,
    out: &mut Vec<TaggedInterval>,
) -> Result<(), ReconcileError> {
    let kind = ImportKind::from_discriminant(import.d)?;

    out.push(TaggedInterval::new(
        span(("s", import.s), ("e", import.e))?,
        Tag::ImportModuleSpecifier {
            value: import.n.clone(),
        },
    ));
    out.push(TaggedInterval::new(
        span(("ss", import.ss), ("se", import.se))?,
        Tag::ImportStatement { kind },
    ));
    if import.a >= 0 {
        out.push(TaggedInterval::marker(
            offset("a", import.a)?,
            Tag::ImportAssertion,
        ));
    }
    if kind == ImportKind::Dynamic {
        out.push(TaggedInterval::marker(
            offset("d", import.d)?,
            Tag::DynamicImport,
        ));
    }
    Ok(())
}

fn collect_export(
    export: &ExportRecord,
    out: &mut Vec<TaggedInterval>,
) -> Result<(), ReconcileError> {
    out.push(TaggedInterval::new(
        span(("s", export.s), ("e", export.e))?,
        Tag::ExportExportedName {
            value: export.n.clone(),
        },
    ));
    if export.ls >= 0 {
        out.push(TaggedInterval::new(
            span(("ls", export.ls), ("le", export.le))?,
            Tag::ExportLocalName {
                value: export.ln.clone(),
            },
        ));
    }
    Ok(())
}

fn offset(field: &'static str, value: i64) -> Result<usize, ReconcileError> {
    usize::try_from(value).map_err(|_| ReconcileError::NegativeOffset { field, value })
}

fn span(
    start: (&'static str, i64),
    end: (&'static str, i64),
) -> Result<ByteRange<usize>, ReconcileError> {
    Ok(offset(start.0, start.1)?..offset(end.0, end.1)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(s: i64, e: i64, ss: i64, se: i64, d: i64, a: i64) -> ImportRecord {
        ImportRecord {
            n: Some("m".to_string()),
            s,
            e,
            ss,
            se,
            d,
            a,
        }
    }

    #[test]
    fn test_static_import() {
        let intervals = collect_intervals(&[import(15, 16, 0, 18, -1, -1)], None).unwrap();
        assert_eq!(
            intervals,
            vec![
                TaggedInterval::new(
                    15..16,
                    Tag::ImportModuleSpecifier {
                        value: Some("m".to_string())
                    }
                ),
                TaggedInterval::new(
                    0..18,
                    Tag::ImportStatement {
                        kind: ImportKind::Static
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_dynamic_import_with_assertion() {
        // import('./a.json', { assert: { type: 'json' } })
        let intervals = collect_intervals(&[import(7, 17, 0, 50, 0, 19)], None).unwrap();
        assert_eq!(intervals.len(), 4);
        assert_eq!(intervals[2], TaggedInterval::marker(19, Tag::ImportAssertion));
        assert_eq!(intervals[3], TaggedInterval::marker(0, Tag::DynamicImport));
    }

    #[test]
    fn test_import_meta() {
        let intervals = collect_intervals(&[import(0, 11, 0, 11, -2, -1)], None).unwrap();
        assert_eq!(intervals.len(), 2);
        assert_eq!(
            intervals[1].tag,
            Tag::ImportStatement {
                kind: ImportKind::Meta
            }
        );
    }

    #[test]
    fn test_invalid_discriminant_fails() {
        assert_eq!(
            collect_intervals(&[import(0, 1, 0, 1, -5, -1)], None),
            Err(ReconcileError::InvalidDiscriminant(-5))
        );
    }

    #[test]
    fn test_negative_specifier_offset_fails() {
        assert_eq!(
            collect_intervals(&[import(-1, 1, 0, 1, -1, -1)], None),
            Err(ReconcileError::NegativeOffset {
                field: "s",
                value: -1
            })
        );
    }

    #[test]
    fn test_exports() {
        let exports = vec![
            ExportRecord {
                n: Some("b".to_string()),
                ln: Some("a".to_string()),
                s: 14,
                e: 15,
                ls: 9,
                le: 10,
            },
            ExportRecord {
                n: Some("default".to_string()),
                ln: None,
                s: 7,
                e: 14,
                ls: -1,
                le: -1,
            },
        ];
        let intervals = collect_intervals(&[], Some(&exports)).unwrap();
        assert_eq!(intervals.len(), 3);
        assert_eq!(intervals[1].span, 9..10);
        assert_eq!(
            intervals[2].tag,
            Tag::ExportExportedName {
                value: Some("default".to_string())
            }
        );
    }

    #[test]
    fn test_no_records() {
        assert_eq!(collect_intervals(&[], None), Ok(vec![]));
        assert_eq!(collect_intervals(&[], Some(&[])), Ok(vec![]));
    }
}
