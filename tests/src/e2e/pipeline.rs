use shroud_core::seed::Seed;
use shroud_core::{Capacity, LayoutAttrs, LayoutDecision, RecordDecl, RecordKind, TranslationUnit};
use shroud_tests::{bitfield_struct, flexible_struct, init_tracing, int_struct, FIXED_SEED};
use shroud_transform::randomizer::{randomize_record, randomize_unit, stream_label, RandomizeConfig};
use shroud_transform::Strategy;

const ABCDEF: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

fn config() -> RandomizeConfig {
    RandomizeConfig::with_seed(Seed::from_hex(FIXED_SEED).unwrap())
}

#[test]
fn unmarked_structures_are_not_randomized() {
    let record = int_struct("dont_randomize_me", &ABCDEF).with_attrs(LayoutAttrs::default());
    let outcome = randomize_record(&record, &config()).unwrap();
    assert_eq!(outcome.decision, LayoutDecision::Unmarked);
    assert!(!outcome.changed());
    assert_eq!(outcome.record, record);
}

#[test]
fn conflicting_attributes_leave_layout_unchanged() {
    init_tracing();
    let record = int_struct("test_struct", &["a", "b", "c"]).with_attrs(LayoutAttrs {
        randomize_layout: true,
        no_randomize_layout: true,
        ..LayoutAttrs::default()
    });
    let outcome = randomize_record(&record, &config()).unwrap();
    assert_eq!(outcome.decision, LayoutDecision::Conflict);
    assert_eq!(outcome.final_fields, vec!["a", "b", "c"]);
}

#[test]
fn unions_keep_declared_order() {
    let mut record = int_struct("test_union", &["a", "b", "c", "d", "e", "f", "g"]);
    record.kind = RecordKind::Union;
    let outcome = randomize_record(&record, &config()).unwrap();
    assert_eq!(outcome.decision, LayoutDecision::Union);
    assert!(!outcome.changed());
}

#[test]
fn marked_structure_is_permuted_and_attrs_survive() {
    init_tracing();
    let mut record = int_struct("test_struct", &ABCDEF);
    record.attrs.packed = true;
    record.attrs.aligned = Some(16);

    let outcome = randomize_record(&record, &config()).unwrap();
    assert_eq!(outcome.decision, LayoutDecision::Randomize);
    let mut names = outcome.final_fields.clone();
    names.sort();
    assert_eq!(names, ABCDEF.to_vec());
    assert_eq!(outcome.record.attrs, record.attrs);
}

#[test]
fn fixed_seed_is_reproducible() {
    for strategy in [Strategy::CacheLine, Strategy::Plain] {
        let mut config = config();
        config.strategy = strategy;
        let first = randomize_record(&bitfield_struct(), &config).unwrap();
        let second = randomize_record(&bitfield_struct(), &config).unwrap();
        assert_eq!(first.final_fields, second.final_fields);
    }
}

#[test]
fn records_draw_independent_streams() {
    let target = int_struct("target", &ABCDEF);
    let alone = TranslationUnit {
        records: vec![target.clone()],
    };
    let crowded = TranslationUnit {
        records: vec![
            flexible_struct(),
            int_struct("noise", &["p", "q", "r", "s"]),
            target,
        ],
    };

    let config = config();
    let alone = randomize_unit(&alone, &config).unwrap();
    let crowded = randomize_unit(&crowded, &config).unwrap();
    assert_eq!(
        alone.records[0].final_fields,
        crowded.records[2].final_fields
    );
}

#[test]
fn anonymous_and_repeated_records_draw_distinct_streams() {
    let names: Vec<String> = (0..16).map(|idx| format!("f{idx}")).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let unit = TranslationUnit {
        records: vec![
            int_struct("", &names),
            int_struct("", &names),
            int_struct("twin", &names),
            int_struct("twin", &names),
        ],
    };

    let labels: Vec<Vec<u8>> = (0..unit.records.len())
        .map(|index| stream_label(&unit, index))
        .collect();
    assert_eq!(labels[0], b"#0");
    assert_eq!(labels[2], b"twin#2");
    assert_ne!(labels[0], labels[1]);
    assert_ne!(labels[2], labels[3]);

    let report = randomize_unit(&unit, &config()).unwrap();
    assert!(report.records.iter().all(|outcome| outcome.changed()));
    assert_ne!(report.records[0].final_fields, report.records[1].final_fields);
    assert_ne!(report.records[2].final_fields, report.records[3].final_fields);
}

#[test]
fn unique_names_label_streams_by_name_alone() {
    let unit = TranslationUnit {
        records: vec![int_struct("noise", &ABCDEF), int_struct("target", &ABCDEF)],
    };
    assert_eq!(stream_label(&unit, 1), b"target");
    assert!(stream_label(&unit, 7).is_empty());
}

#[test]
fn unit_report_serializes() {
    let unit = TranslationUnit {
        records: vec![
            flexible_struct(),
            RecordDecl::new("empty", RecordKind::Struct),
        ],
    };
    let mut config = config();
    config.capacity = Capacity::new(128).unwrap();

    let report = randomize_unit(&unit, &config).unwrap();
    assert_eq!(report.seed, FIXED_SEED);
    assert_eq!(report.capacity, 128);
    assert_eq!(report.conflicts().count(), 0);

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"strategy\":\"cache_line\""));

    let unit = report.into_unit();
    assert_eq!(
        unit.record("test_struct")
            .unwrap()
            .field_names()
            .last()
            .map(String::as_str),
        Some("name")
    );
}
