//! End-to-end scenarios exercising long chains of group operations.

use kindred_core::{DisjointMap, DisjointSet, PartitionConfig, Verification};
use rstest::{fixture, rstest};

fn verifying() -> PartitionConfig {
    PartitionConfig::default().with_verification(Verification::AfterMutation)
}

fn verified_set(groups: &[&[&'static str]]) -> DisjointSet<&'static str> {
    let mut set = DisjointSet::with_config(verifying());
    set.extend(groups.iter().map(|group| group.iter().copied()));
    set
}

#[fixture]
fn world() -> DisjointSet<&'static str> {
    verified_set(&[
        &["chi", "prc", "shx", "xsm", "gxc", "sik"],
        &["jap", "man", "men"],
        &["ger"],
        &["eng", "can", "raj", "ast", "nzl", "saf"],
        &["sov", "mon", "tan"],
        &["usa", "phi"],
        &["fra"],
        &["ita"],
        &["aus", "cze", "pol"],
        &["hol", "bel", "lux"],
        &["rom", "hun", "bul", "gre", "yog"],
    ])
}

/// Plays 1938 to 1941 and returns the five remaining blocs.
fn world_in_1941(mut world: DisjointSet<&'static str>) -> DisjointSet<&'static str> {
    assert_eq!(world.len(), 34);
    assert_eq!(world.classification(), 11);

    assert!(world.del("aus"));
    assert!(world.del("cze"));
    assert!(world.join_to("fra", "eng"));
    assert_eq!(world.classification(), 10);

    assert!(world.join_to("pol", "fra"));
    assert!(world.join_to("ita", "ger"));
    assert_eq!(world.classification(), 8);

    assert!(world.merge("hol", "eng"));
    for member in ["hun", "rom", "bul"] {
        assert!(world.join_to(member, "ger"));
    }
    assert!(world.merge("gre", "eng"));
    assert!(world.is_sibling("hol", "can"));
    assert!(world.contains("pol"));

    assert!(world.merge("usa", "eng"));
    assert!(world.is_sibling("phi", "lux"));
    assert_eq!(world.len(), 32);
    assert_eq!(world.classification(), 5);
    world
}

#[rstest]
fn world_war_main_line(world: DisjointSet<&'static str>) {
    let mut world = world_in_1941(world);

    assert!(world.join_to("ita", "eng"));
    assert!(!world.is_sibling("ita", "ger"));

    assert!(world.del("tan"));
    for member in ["rom", "hun", "bul"] {
        assert!(world.join_to(member, "sov"));
    }
    assert!(world.join("prc"));
    assert!(world.del_except("chi"));
    assert!(world.del_except("jap"));
    assert!(world.del_except("ger"));
    assert!(world.join_to("pol", "sov"));
    assert!(!world.join_to("cze", "sov"));
    assert!(world.add_to("cze", "sov"));
    assert!(world.join_to("ita", "usa"));
    assert!(world.join("yog"));

    assert!(world.is_sibling("pol", "mon"));
    assert!(!world.contains("xsm"));
    assert_eq!(world.len(), 26);
    assert_eq!(world.classification(), 7);
    assert_eq!(world.invariants().check_all(), Ok(()));
}

#[rstest]
fn world_war_alternate_line(world: DisjointSet<&'static str>) {
    let world = world_in_1941(world);
    let mut tno = world.clone();
    assert_eq!(tno, world);

    assert!(tno.join_to("mon", "jap"));
    assert!(tno.del_all("sov"));
    assert_eq!(tno.classification(), 4);
    assert_eq!(world.classification(), 5);

    assert!(tno.join("usa"));
    for member in ["can", "ast", "nzl"] {
        assert!(tno.join_to(member, "usa"));
    }
    assert!(tno.join("raj"));
    assert!(tno.join_to("phi", "jap"));
    assert!(tno.join_to("eng", "ger"));
    assert!(tno.join_to("fra", "ger"));
    assert!(tno.join_to("gre", "ita"));
    assert!(tno.join_to("yog", "ita"));
    assert!(tno.del_all("pol"));
    assert!(!tno.contains("pol"));

    assert!(tno.merge("chi", "jap"));
    assert!(tno.del("prc"));
    assert!(tno.join("xsm"));
    assert!(tno.join("sik"));
    assert_eq!(tno.len(), 24);
    assert_eq!(tno.classification(), 6);
    assert_ne!(tno, world);
}

#[test]
fn countries_merge_into_four_blocs() {
    let mut countries = verified_set(&[
        &["chi", "prc"],
        &["jap"],
        &["ger"],
        &["eng", "fra", "pol"],
        &["sov"],
        &["usa"],
    ]);
    assert!(countries.add_to("ita", "ger"));
    assert!(countries.add_to("phi", "usa"));
    assert!(countries.merge("usa", "eng"));
    assert!(countries.merge("chi", "eng"));

    assert_eq!(countries.classification(), 4);
    assert!(countries.is_sibling("prc", "pol"));
    assert!(!countries.add_to("ita", "eng"));
    assert!(!countries.is_sibling("ita", "phi"));
}

#[fixture]
fn digits() -> DisjointMap<u32, &'static str> {
    let mut digits = DisjointMap::with_config(verifying());
    digits.extend([
        vec![(2, "two"), (4, "four"), (6, "six"), (8, "eight")],
        vec![(1, "first"), (3, "three"), (5, "five"), (7, "seven")],
    ]);
    assert_eq!(digits.len(), 8);
    assert_eq!(digits.classification(), 2);

    assert!(digits.add_to(0, "ZERO", &2));
    *digits.get_or_insert_with(0, || "unused") = "zero";
    *digits.get_or_insert_with(9, || "unused") = "nine";
    assert!(digits.merge(&1, &9));
    assert!(digits.update(&1, "one"));
    digits
}

#[rstest]
fn digits_split_into_odd_and_even(digits: DisjointMap<u32, &'static str>) {
    assert_eq!(digits.len(), 10);
    assert_eq!(digits.classification(), 2);
    assert_eq!(digits[&0], "zero");
    assert_eq!(digits[&1], "one");
    assert_eq!(digits[&9], "nine");
    assert_eq!(digits.sibling_count(&3), 5);
}

#[rstest]
fn prime_and_length_partitions_converge(digits: DisjointMap<u32, &'static str>) {
    let mut prime = digits.clone();
    assert!(prime.join(&0));
    assert!(prime.join(&1));
    assert!(prime.join_to(&2, &3));
    assert!(prime.join_to(&9, &4));
    assert_eq!(prime.len(), 10);
    assert_eq!(prime.classification(), 4);
    assert!(prime.is_sibling(&2, &7));
    assert_eq!(prime.sibling_count(&3), 4);
    assert_ne!(prime, digits);
    assert_eq!(prime[&1], digits[&1]);

    let mut length = digits.clone();
    assert!(length.join(&2));
    assert!(length.join_to(&6, &2));
    assert!(length.join_to(&1, &2));
    assert!(length.join_to(&9, &0));
    assert!(length.join_to(&5, &4));
    assert!(length.join_to(&8, &3));
    assert_eq!(length.sibling_count(&1), 3);
    assert_eq!(length.sibling_count(&0), 4);
    assert_eq!(length.sibling_count(&3), 3);

    for (key, target) in [(2, 1), (0, 4), (5, 9), (6, 2), (8, 3)] {
        assert!(prime.join_to(&key, &target));
    }
    assert_eq!(length, prime);
}
