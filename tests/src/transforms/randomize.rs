use rand::rngs::StdRng;
use rand::SeedableRng;
use shroud_core::seed::Seed;
use shroud_core::{Capacity, DeclId, FieldDecl, OtherDecl, RecordDecl, RecordKind};
use shroud_tests::{bitfield_struct, flexible_struct, int_struct, is_subsequence, randomized};
use shroud_transform::{randomize_layout, CacheLine, Plain, Reorganizer};

const ABCDEF: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

/// Field names of `record` after committing `order`.
fn names_after(record: &RecordDecl, order: &[DeclId]) -> Vec<String> {
    let mut record = record.clone();
    record.commit(order).unwrap();
    record.field_names()
}

fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names
}

#[test]
fn plain_fields_are_permuted() {
    let record = int_struct("test_struct", &ABCDEF);
    let capacity = Capacity::new(6 * 32).unwrap();

    for state in 0..50 {
        let mut rng = StdRng::seed_from_u64(state);
        let order = randomize_layout(&record, capacity, &mut rng);
        assert_eq!(sorted(names_after(&record, &order)), ABCDEF.to_vec());
    }
}

#[test]
fn different_seeds_rarely_reproduce_declared_order() {
    let record = int_struct("test_struct", &ABCDEF);
    let declared: Vec<String> = ABCDEF.iter().map(|name| name.to_string()).collect();

    let unchanged = (0..200)
        .filter(|trial| {
            let seed = Seed::from_phrase(&format!("trial-{trial}"));
            let mut rng = seed.create_deterministic_rng();
            let order = randomize_layout(&record, Capacity::default(), &mut rng);
            names_after(&record, &order) == declared
        })
        .count();

    // Identity has probability 1/48 per trial with 64-bit buckets.
    assert!(unchanged < 40, "declared order kept in {unchanged} of 200 trials");
}

#[test]
fn adjacent_bitfields_remain_adjacent() {
    let record = bitfield_struct();
    let xyz = ["x", "y", "z"].map(String::from);

    for state in 0..200 {
        let mut rng = StdRng::seed_from_u64(state);
        let order = randomize_layout(&record, Capacity::default(), &mut rng);
        let names = names_after(&record, &order);
        assert!(is_subsequence(&names, &xyz), "{names:?}");
    }
}

#[test]
fn zero_width_bitfield_breaks_adjacency() {
    let record = RecordDecl::new("test_struct", RecordKind::Struct)
        .with_attrs(randomized())
        .with_decl(FieldDecl::new("a", 32))
        .with_decl(FieldDecl::bitfield("", 32, 0))
        .with_decl(FieldDecl::new("b", 32));
    let declared = ["a", "", "b"].map(String::from);

    for state in 0..200 {
        let mut rng = StdRng::seed_from_u64(state);
        let order = randomize_layout(&record, Capacity::default(), &mut rng);
        let names = names_after(&record, &order);
        assert_eq!(names.len(), 3, "barrier must be retained");
        assert!(!is_subsequence(&names, &declared), "{names:?}");
    }
}

#[test]
fn zero_width_bitfield_follows_the_run_it_ends() {
    let record = RecordDecl::new("test_struct", RecordKind::Struct)
        .with_attrs(randomized())
        .with_decl(FieldDecl::bitfield("a", 32, 1))
        .with_decl(FieldDecl::bitfield("", 32, 0))
        .with_decl(FieldDecl::bitfield("b", 32, 1));
    let pinned = ["a", ""].map(String::from);

    for state in 0..100 {
        let mut rng = StdRng::seed_from_u64(state);
        let order = randomize_layout(&record, Capacity::default(), &mut rng);
        assert!(is_subsequence(&names_after(&record, &order), &pinned));
    }
}

#[test]
fn flexible_array_member_stays_last() {
    let record = flexible_struct();
    for state in 0..200 {
        let mut rng = StdRng::seed_from_u64(state);
        let order = randomize_layout(&record, Capacity::default(), &mut rng);
        assert_eq!(order.last(), Some(&DeclId(3)));
        assert_eq!(
            names_after(&record, &order).last().map(String::as_str),
            Some("name")
        );
    }
}

#[test]
fn structural_declarations_stay_first_in_order() {
    let record = RecordDecl::new("with_types", RecordKind::Struct)
        .with_attrs(randomized())
        .with_decl(FieldDecl::new("a", 32))
        .with_decl(OtherDecl {
            name: "inner_t".into(),
        })
        .with_decl(FieldDecl::new("b", 32))
        .with_decl(OtherDecl {
            name: "assert_size".into(),
        })
        .with_decl(FieldDecl::new("c", 32));

    for state in 0..50 {
        let mut rng = StdRng::seed_from_u64(state);
        let order = randomize_layout(&record, Capacity::default(), &mut rng);
        assert_eq!(&order[..2], &[DeclId(1), DeclId(3)]);
        assert_eq!(order.len(), 5);
    }
}

#[test]
fn oversized_member_is_never_split_from_itself() {
    let record = RecordDecl::new("big", RecordKind::Struct)
        .with_attrs(randomized())
        .with_decl(FieldDecl::new("a", 8))
        .with_decl(FieldDecl::new("buf", 4096))
        .with_decl(FieldDecl::new("b", 8));

    for state in 0..50 {
        let mut rng = StdRng::seed_from_u64(state);
        let order = randomize_layout(&record, Capacity::default(), &mut rng);
        let names = names_after(&record, &order);
        // a and b share a bucket; buf sits before or after them.
        assert!(names[0] == "buf" || names[2] == "buf", "{names:?}");
    }
}

#[test]
fn reorganizers_honour_pinned_members() {
    let reorganizers: Vec<Box<dyn Reorganizer>> =
        vec![Box::new(CacheLine::default()), Box::new(Plain)];
    let record = bitfield_struct().with_decl(FieldDecl::flexible_array("tail", 8));
    let xyz = ["x", "y", "z"].map(String::from);

    for reorganizer in &reorganizers {
        for state in 0..100 {
            let mut rng = StdRng::seed_from_u64(state);
            let order = reorganizer.reorganize(&record, &mut rng).unwrap();
            let names = names_after(&record, &order);
            assert_eq!(names.last().map(String::as_str), Some("tail"));
            assert!(is_subsequence(&names, &xyz), "{}: {names:?}", reorganizer.name());
        }
    }
}
