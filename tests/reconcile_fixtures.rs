//! Reconciliation of recorded lexer output
//!
//! Every test loads its source and records from `tests/fixtures/` and checks the whole tree
//! shape with `assert_tree`, plus the structural guarantees with `assert_well_formed`.

use modview::modview::error::{ReconcileError, ViewError};
use modview::modview::lexer::{ImportRecord, ParseResult, RecordedLexer};
use modview::modview::pipeline::Pipeline;
use modview::modview::segment::Segment;
use modview::modview::tag::{ImportKind, Tag};
use modview::modview::testing::{assert_tree, assert_well_formed, Fixtures};
use modview::modview::version::VersionError;
use rstest::rstest;

#[rstest(
    name,
    case("static_import"),
    case("dynamic_import"),
    case("import_meta"),
    case("import_assertion"),
    case("exports"),
    case("facade"),
    case("mixed")
)]
fn test_fixture_is_well_formed(name: &str) {
    let fixture = Fixtures::load(name);
    for elide in [false, true] {
        let annotated = fixture
            .reconcile(&Pipeline::new().elide_empty_text(elide))
            .unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_well_formed(&annotated);
    }
}

#[test]
fn test_every_fixture_is_covered() {
    assert_eq!(
        Fixtures::names(),
        vec![
            "dynamic_import",
            "exports",
            "facade",
            "import_assertion",
            "import_meta",
            "mixed",
            "static_import",
        ]
    );
}

#[test]
fn test_static_import() {
    // import x from 'm'
    let annotated = Fixtures::load("static_import")
        .reconcile(&Pipeline::new())
        .unwrap();

    assert_tree(&annotated.tree).root_count(1).root(0, |stmt| {
        stmt.span(0..17)
            .has_tag(&Tag::ImportStatement {
                kind: ImportKind::Static,
            })
            .child_count(1)
            .child(0, |spec| {
                spec.span(15..16).has_tag(&Tag::ImportModuleSpecifier {
                    value: Some("m".to_string()),
                })
            })
    });
    assert_eq!(annotated.has_module_syntax, Some(true));
    assert!(!annotated.facade);
}

#[test]
fn test_static_import_segments() {
    let annotated = Fixtures::load("static_import")
        .reconcile(&Pipeline::new().elide_empty_text(true))
        .unwrap();
    let source = annotated.source.as_str();

    // statement, then the trailing newline
    assert_eq!(annotated.segments.len(), 2);
    match &annotated.segments[0] {
        Segment::Annotated { span, children, .. } => {
            assert_eq!(*span, 0..17);
            let texts: Vec<&str> = children.iter().filter_map(|c| c.text(source)).collect();
            assert_eq!(texts, vec!["import x from '", "m", "'"]);
        }
        other => panic!("expected the statement first, got {other:?}"),
    }
    assert_eq!(annotated.segments[1].text(source), Some("\n"));
}

#[test]
fn test_dynamic_import() {
    // const dep = await import('./dep.js');
    let annotated = Fixtures::load("dynamic_import")
        .reconcile(&Pipeline::new())
        .unwrap();

    assert_tree(&annotated.tree).root_count(1).root(0, |stmt| {
        stmt.span(18..36)
            .has_tag(&Tag::ImportStatement {
                kind: ImportKind::Dynamic,
            })
            .child_count(2)
            .child(0, |marker| marker.span(18..18).is_marker().kinds(&["dynamic-import"]))
            .child(1, |spec| spec.span(25..35).kinds(&["import-module-specifier"]))
    });
}

#[test]
fn test_import_meta_merges_into_one_node() {
    // console.log(import.meta.url);
    let annotated = Fixtures::load("import_meta")
        .reconcile(&Pipeline::new())
        .unwrap();

    assert_tree(&annotated.tree).root_count(1).root(0, |node| {
        node.span(12..23)
            .kinds(&["import-module-specifier", "import-statement"])
            .has_tag(&Tag::ImportModuleSpecifier { value: None })
            .has_tag(&Tag::ImportStatement {
                kind: ImportKind::Meta,
            })
            .child_count(0)
    });
}

#[test]
fn test_import_assertion_marker() {
    // import data from './data.json' assert { type: 'json' };
    let annotated = Fixtures::load("import_assertion")
        .reconcile(&Pipeline::new())
        .unwrap();

    assert_tree(&annotated.tree).root_count(1).root(0, |stmt| {
        stmt.span(0..54)
            .kinds(&["import-statement"])
            .child_count(2)
            .child(0, |spec| spec.span(18..29))
            .child(1, |marker| marker.span(38..38).kinds(&["import-assertion"]))
    });
}

#[test]
fn test_exports() {
    // export const answer = 42; ... export { local as renamed };
    let annotated = Fixtures::load("exports")
        .reconcile(&Pipeline::new())
        .unwrap();

    assert_tree(&annotated.tree)
        .root_count(3)
        .root(0, |answer| {
            answer
                .span(13..19)
                .kinds(&["export-exported-name", "export-local-name"])
        })
        .root(1, |local| {
            local.span(52..57).has_tag(&Tag::ExportLocalName {
                value: Some("local".to_string()),
            })
        })
        .root(2, |renamed| {
            renamed.span(61..68).has_tag(&Tag::ExportExportedName {
                value: Some("renamed".to_string()),
            })
        });
}

#[rstest(version, case("0.5.0"), case("0.9.0"), case("0.9.9"))]
fn test_exports_omitted_for_old_releases(version: &str) {
    let fixture = Fixtures::load("exports");
    let annotated = fixture
        .reconcile(&Pipeline::for_version(version).unwrap())
        .unwrap();

    assert!(annotated.tree.is_empty());
    assert_eq!(
        annotated.segments,
        vec![Segment::Text {
            span: 0..fixture.source.len()
        }]
    );
}

#[test]
fn test_facade_reexports() {
    // export * from './a.js'; export { b } from './b.js';
    let annotated = Fixtures::load("facade")
        .reconcile(&Pipeline::new())
        .unwrap();

    assert!(annotated.facade);
    assert_tree(&annotated.tree)
        .root_count(2)
        .root(0, |star| {
            star.span(0..22)
                .child_count(1)
                .child(0, |spec| spec.span(15..21))
        })
        .root(1, |named| {
            named
                .span(24..50)
                .child_count(2)
                .child(0, |b| b.span(33..34).kinds(&["export-exported-name"]))
                .child(1, |spec| spec.span(43..49).kinds(&["import-module-specifier"]))
        });
}

#[test]
fn test_mixed_module_with_multibyte_comment() {
    let annotated = Fixtures::load("mixed")
        .reconcile(&Pipeline::new())
        .unwrap();

    assert_tree(&annotated.tree)
        .root_count(4)
        .root(0, |named| {
            named
                .span(15..48)
                .child_count(1)
                .child(0, |spec| spec.span(38..47))
        })
        .root(1, |lazy| lazy.span(63..67))
        .root(2, |dynamic| {
            dynamic
                .span(76..98)
                .child_count(2)
                .child(0, |marker| marker.is_marker())
                .child(1, |spec| {
                    spec.span(83..97)
                        .has_tag(&Tag::ImportModuleSpecifier { value: None })
                })
        })
        .root(3, |meta| {
            meta.span(112..123)
                .kinds(&["import-module-specifier", "import-statement"])
        });

    let path = annotated.tree.path_at(40);
    let spans: Vec<_> = path.iter().map(|n| n.span.clone()).collect();
    assert_eq!(spans, vec![15..48, 38..47]);
}

#[test]
fn test_recorded_lexer_version_drives_capabilities() {
    let fixture = Fixtures::load("exports");

    let annotated = Pipeline::new()
        .run(&fixture.source, &fixture.lexer(Some("1.2.0")).unwrap())
        .unwrap();
    assert_eq!(annotated.tree.len(), 3);
    assert_eq!(annotated.has_module_syntax, None);

    let annotated = Pipeline::new()
        .run(&fixture.source, &fixture.lexer(Some("1.5.0")).unwrap())
        .unwrap();
    assert_eq!(annotated.has_module_syntax, Some(true));
}

#[test]
fn test_unsupported_release_is_rejected() {
    let fixture = Fixtures::load("static_import");
    let err = Pipeline::new()
        .run(&fixture.source, &fixture.lexer(Some("0.4.9")).unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        ViewError::Version(VersionError::Unsupported { .. })
    ));
}

#[test]
fn test_legacy_string_exports_are_not_decoded() {
    let source = "export var a;";
    let result = ParseResult::from_json(r#"[[], ["a"], false]"#).unwrap();
    let lexer = RecordedLexer::new(result.clone(), Some("0.8.0".to_string()));

    let annotated = Pipeline::new().run(source, &lexer).unwrap();
    assert!(annotated.tree.is_empty());

    let err = Pipeline::new().reconcile(source, &result).unwrap_err();
    assert!(matches!(err, ReconcileError::MalformedRecords(_)));
}

#[test]
fn test_crossing_records_are_reported() {
    let source = "import a from 'abc'";
    let result = ParseResult::new(vec![
        ImportRecord {
            n: Some("abc".to_string()),
            s: 15,
            e: 18,
            ss: 0,
            se: 19,
            d: -1,
            a: -1,
        },
        ImportRecord {
            n: None,
            s: 10,
            e: 16,
            ss: 10,
            se: 16,
            d: -2,
            a: -1,
        },
    ]);

    let err = Pipeline::new().reconcile(source, &result).unwrap_err();
    assert_eq!(
        err,
        ReconcileError::CrossingIntervals {
            existing: 15..18,
            inserted: 10..16,
        }
    );
}
