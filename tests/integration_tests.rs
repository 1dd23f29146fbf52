// Integration tests for Coffee Roulette

use coffee_roulette::core::{
    is_eligible, parse_forced_pairs, FixedOrder, IdentityOrder, Matcher, RosterModel, SeededShuffle,
};
use coffee_roulette::models::{Assignment, AssignmentResult, MatchStrategy, Person};
use coffee_roulette::services::{assignments_to_csv, read_roster_csv, render_preview};
use std::collections::HashMap;

fn office(size: usize) -> RosterModel {
    RosterModel::from_people((0..size).map(|i| {
        let mut person = Person::new(
            &format!("Person {}", i),
            &format!("team{}", i % 5),
            &format!("site{}", i % 3),
        );
        // Everyone has met their immediate neighbour
        person = person.with_past_partner(&format!("person {}", (i + 1) % size));
        person
    }))
}

/// Every roster member not reserved by a forced pair appears exactly once
fn assert_coverage(roster: &RosterModel, forced_text: &str, result: &AssignmentResult) {
    let forced = parse_forced_pairs(forced_text);
    for person in roster.people() {
        let reserved = forced
            .iter()
            .any(|p| p.first.eq_ignore_ascii_case(&person.name) || p.second.eq_ignore_ascii_case(&person.name));
        let appearances = result
            .matched()
            .iter()
            .chain(result.unmatched())
            .filter(|a| a.involves(&person.name))
            .count();

        if reserved {
            assert_eq!(appearances, 0, "{} is reserved but was re-matched", person.name);
        } else {
            assert_eq!(appearances, 1, "{} appears {} times", person.name, appearances);
        }
    }
}

fn assert_pairs_eligible(roster: &RosterModel, result: &AssignmentResult) {
    for assignment in result.matched() {
        let a = roster.get(&assignment.first).unwrap();
        let b = roster.get(assignment.second.as_deref().unwrap()).unwrap();
        assert!(is_eligible(a, b), "{} and {} should not be paired", a.name, b.name);
    }
}

#[test]
fn test_integration_end_to_end_from_csv() {
    let csv = "Staff Name,Team #,Site,Previous match #1,Previous match #2\n\
               Jane Doe,1,North,Tom Carroll,\n\
               Tom Carroll,2,South,,\n\
               Aga Karczewska,3,East,,\n\
               John Smith,1,West,aga karczewska,\n\
               Mia Wong,2,North,,\n\
               Ravi Patel,4,South,,\n";
    let forced_text = "Mia Wong, Guest Speaker\nnot a pair";

    let rows = read_roster_csv(csv.as_bytes()).unwrap();
    let roster = RosterModel::build(&rows).unwrap();
    let forced = parse_forced_pairs(forced_text);

    let result = Matcher::default().generate(&roster, &forced, &mut IdentityOrder);

    assert_eq!(result.forced(), &[Assignment::pair("Mia Wong", "Guest Speaker")]);
    // Jane has met Tom, so she takes Aga; Tom then takes John; Ravi is left
    assert_eq!(
        result.matched(),
        &[
            Assignment::pair("Jane Doe", "Aga Karczewska"),
            Assignment::pair("Tom Carroll", "John Smith"),
        ]
    );
    assert_eq!(result.unmatched(), &[Assignment::unmatched("Ravi Patel")]);

    assert_coverage(&roster, forced_text, &result);
    assert_pairs_eligible(&roster, &result);

    let sheet = assignments_to_csv(&result).unwrap();
    assert!(sheet.starts_with("Person 1,Person 2\nMia Wong,Guest Speaker\nJane Doe,Aga Karczewska\n"));
    assert_eq!(render_preview(&result)[0], "Mia Wong ↔ Guest Speaker");
}

#[test]
fn test_coverage_holds_across_seeds() {
    let roster = office(41);
    let forced_text = "Person 3, Person 4\nperson 10, Visitor";
    let forced = parse_forced_pairs(forced_text);
    let matcher = Matcher::default();

    for seed in 0..25 {
        let result = matcher.generate(&roster, &forced, &mut SeededShuffle::with_seed(seed));

        assert_eq!(result.forced().len(), 2);
        assert_coverage(&roster, forced_text, &result);
        assert_pairs_eligible(&roster, &result);
    }
}

#[test]
fn test_no_name_used_twice() {
    let roster = office(30);
    let result = Matcher::default().generate(&roster, &[], &mut SeededShuffle::with_seed(5));

    let mut seen: HashMap<String, usize> = HashMap::new();
    for assignment in result.matched().iter().chain(result.unmatched()) {
        *seen.entry(assignment.first.to_lowercase()).or_default() += 1;
        if let Some(second) = &assignment.second {
            *seen.entry(second.to_lowercase()).or_default() += 1;
        }
    }

    assert_eq!(seen.len(), 30);
    assert!(seen.values().all(|&count| count == 1));
}

#[test]
fn test_same_order_same_result() {
    let roster = office(12);
    let order: Vec<usize> = (0..12).rev().collect();
    let matcher = Matcher::default();

    let a = matcher.generate(&roster, &[], &mut FixedOrder(order.clone()));
    let b = matcher.generate(&roster, &[], &mut FixedOrder(order));

    assert_eq!(a, b);
}

#[test]
fn test_all_reserved_roster() {
    let roster = RosterModel::from_people([Person::new("A", "1", "X"), Person::new("B", "1", "X")]);
    let forced = parse_forced_pairs("a, b");

    let result = Matcher::default().generate(&roster, &forced, &mut IdentityOrder);

    assert_eq!(result.assignments(), &[Assignment::pair("a", "b")]);
}

#[test]
fn test_maximum_never_matches_fewer_than_greedy() {
    let roster = office(25);

    for seed in 0..10 {
        let greedy = Matcher::new(MatchStrategy::Greedy)
            .generate(&roster, &[], &mut SeededShuffle::with_seed(seed));
        let maximum = Matcher::new(MatchStrategy::Maximum)
            .generate(&roster, &[], &mut SeededShuffle::with_seed(seed));

        assert!(maximum.matched().len() >= greedy.matched().len());
        assert_coverage(&roster, "", &maximum);
        assert_pairs_eligible(&roster, &maximum);
    }
}
