use crate::core::{
    blossom::maximum_matching,
    filters::is_eligible,
    forced::reserved_names,
    roster::RosterModel,
    shuffle::PoolOrder,
};
use crate::models::{Assignment, AssignmentResult, ForcedPair, MatchStrategy, Person};

/// Pairs produced from the pool, plus the people left without a partner
#[derive(Debug, Default)]
pub struct PoolOutcome {
    pub pairs: Vec<Assignment>,
    pub unmatched: Vec<Assignment>,
}

/// Main matching orchestrator
///
/// # Stages
/// 1. Reserve every name named in a forced pair
/// 2. Build the pool from unreserved roster members and arrange it
/// 3. Pair the pool with the configured strategy
/// 4. Assemble forced pairs, matched pairs, then unmatched singles
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    strategy: MatchStrategy,
}

impl Matcher {
    pub fn new(strategy: MatchStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Produce the full assignment for one run
    ///
    /// # Arguments
    /// * `roster` - Normalized roster
    /// * `forced` - Operator-mandated pairs, emitted verbatim and never re-matched
    /// * `order` - Arranges the pool before pairing
    pub fn generate<O: PoolOrder>(
        &self,
        roster: &RosterModel,
        forced: &[ForcedPair],
        order: &mut O,
    ) -> AssignmentResult {
        let reserved = reserved_names(forced);

        let mut pool: Vec<&Person> = roster
            .people()
            .iter()
            .filter(|person| !reserved.contains(&person.key()))
            .collect();

        tracing::debug!(
            "Pool has {} of {} roster members ({} names reserved by forced pairs)",
            pool.len(),
            roster.len(),
            reserved.len()
        );

        order.arrange(&mut pool);

        let outcome = match self.strategy {
            MatchStrategy::Greedy => greedy_pairs(&pool),
            MatchStrategy::Maximum => maximum_pairs(&pool),
        };

        tracing::debug!(
            "{} strategy produced {} pairs and {} unmatched",
            self.strategy,
            outcome.pairs.len(),
            outcome.unmatched.len()
        );

        AssignmentResult::assemble(
            forced.iter().map(Assignment::from).collect(),
            outcome.pairs,
            outcome.unmatched,
        )
    }
}

/// First-fit greedy pairing over an already-arranged pool.
///
/// Each unused person takes the first later unused person they are
/// eligible with. No backtracking: someone may stay unmatched even when a
/// different global pairing would have placed them.
pub fn greedy_pairs(pool: &[&Person]) -> PoolOutcome {
    let mut used = vec![false; pool.len()];
    let mut outcome = PoolOutcome::default();

    for i in 0..pool.len() {
        if used[i] {
            continue;
        }
        let p1 = pool[i];

        let partner = (i + 1..pool.len()).find(|&j| !used[j] && is_eligible(p1, pool[j]));

        match partner {
            Some(j) => {
                used[i] = true;
                used[j] = true;
                outcome.pairs.push(Assignment::pair(&p1.name, &pool[j].name));
            }
            None => {
                used[i] = true;
                outcome.unmatched.push(Assignment::unmatched(&p1.name));
            }
        }
    }

    outcome
}

/// Maximum-cardinality pairing over an already-arranged pool.
///
/// Pairs are listed by the pool position of their earlier member, which
/// is also the `first` side; unmatched people follow in pool order.
pub fn maximum_pairs(pool: &[&Person]) -> PoolOutcome {
    let adjacency: Vec<Vec<usize>> = (0..pool.len())
        .map(|i| {
            (0..pool.len())
                .filter(|&j| j != i && is_eligible(pool[i], pool[j]))
                .collect()
        })
        .collect();

    let mate = maximum_matching(&adjacency);
    let mut outcome = PoolOutcome::default();

    for (i, partner) in mate.iter().enumerate() {
        match *partner {
            Some(j) if j > i => outcome
                .pairs
                .push(Assignment::pair(&pool[i].name, &pool[j].name)),
            Some(_) => {}
            None => outcome.unmatched.push(Assignment::unmatched(&pool[i].name)),
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shuffle::{FixedOrder, IdentityOrder, SeededShuffle};

    fn roster(people: Vec<Person>) -> RosterModel {
        RosterModel::from_people(people)
    }

    #[test]
    fn test_first_eligible_partner_wins() {
        let roster = roster(vec![
            Person::new("A", "team1", "siteX"),
            Person::new("B", "team2", "siteY"),
            Person::new("C", "team1", "siteY"),
        ]);

        let result = Matcher::default().generate(&roster, &[], &mut IdentityOrder);

        assert_eq!(
            result.assignments(),
            &[Assignment::pair("A", "B"), Assignment::unmatched("C")]
        );
    }

    #[test]
    fn test_history_blocks_pairing() {
        let roster = roster(vec![
            Person::new("A", "team1", "siteX").with_past_partner("b"),
            Person::new("B", "team2", "siteY"),
        ]);

        let result = Matcher::default().generate(&roster, &[], &mut IdentityOrder);

        assert_eq!(
            result.assignments(),
            &[Assignment::unmatched("A"), Assignment::unmatched("B")]
        );
    }

    #[test]
    fn test_forced_pairs_first_and_reserved() {
        let roster = roster(vec![
            Person::new("A", "1", "X"),
            Person::new("B", "2", "Y"),
            Person::new("C", "3", "Z"),
            Person::new("D", "4", "W"),
        ]);
        // "Ghost" is not on the roster; the pair is still emitted verbatim
        let forced = vec![ForcedPair::new("a", "Ghost")];

        let result = Matcher::default().generate(&roster, &forced, &mut IdentityOrder);

        assert_eq!(result.forced(), &[Assignment::pair("a", "Ghost")]);
        assert_eq!(result.matched(), &[Assignment::pair("B", "C")]);
        assert_eq!(result.unmatched(), &[Assignment::unmatched("D")]);
        assert_eq!(result.occurrences("A"), 1);
    }

    #[test]
    fn test_unmatched_single_follows_pairs() {
        let roster = roster(vec![
            Person::new("A", "1", "X"),
            Person::new("B", "1", "X"),
            Person::new("C", "2", "Y"),
        ]);

        // A cannot pair with B, so A takes C and B is left over
        let result = Matcher::default().generate(&roster, &[], &mut IdentityOrder);

        assert_eq!(result.matched(), &[Assignment::pair("A", "C")]);
        assert_eq!(result.unmatched(), &[Assignment::unmatched("B")]);
    }

    #[test]
    fn test_fixed_order_changes_outcome() {
        let roster = roster(vec![
            Person::new("A", "1", "X"),
            Person::new("B", "2", "Y"),
            Person::new("C", "3", "Z"),
        ]);

        let result = Matcher::default().generate(&roster, &[], &mut FixedOrder(vec![2, 1, 0]));

        assert_eq!(result.matched(), &[Assignment::pair("C", "B")]);
        assert_eq!(result.unmatched(), &[Assignment::unmatched("A")]);
    }

    #[test]
    fn test_empty_roster_yields_only_forced() {
        let forced = vec![ForcedPair::new("X", "Y")];
        let result = Matcher::default().generate(&RosterModel::default(), &forced, &mut IdentityOrder);

        assert_eq!(result.assignments(), &[Assignment::pair("X", "Y")]);

        let empty = Matcher::default().generate(&RosterModel::default(), &[], &mut IdentityOrder);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_seeded_runs_are_deterministic() {
        let people: Vec<Person> = (0..30)
            .map(|i| Person::new(&format!("P{}", i), &(i % 4).to_string(), &(i % 3).to_string()))
            .collect();
        let roster = roster(people);
        let matcher = Matcher::default();

        let a = matcher.generate(&roster, &[], &mut SeededShuffle::with_seed(99));
        let b = matcher.generate(&roster, &[], &mut SeededShuffle::with_seed(99));

        assert_eq!(a, b);
    }

    #[test]
    fn test_maximum_strategy_beats_greedy_trap() {
        // Identity order: greedy pairs A-B, stranding C and D.
        // A-C and B-D is a perfect pairing.
        let roster = roster(vec![
            Person::new("A", "1", "X"),
            Person::new("B", "2", "Y"),
            Person::new("C", "2", "Z").with_past_partner("d"),
            Person::new("D", "1", "W"),
        ]);

        let greedy = Matcher::new(MatchStrategy::Greedy).generate(&roster, &[], &mut IdentityOrder);
        assert_eq!(greedy.matched(), &[Assignment::pair("A", "B")]);
        assert_eq!(greedy.unmatched().len(), 2);

        let maximum = Matcher::new(MatchStrategy::Maximum).generate(&roster, &[], &mut IdentityOrder);
        assert_eq!(maximum.matched().len(), 2);
        assert!(maximum.unmatched().is_empty());
        for assignment in maximum.matched() {
            let a = roster.get(&assignment.first).unwrap();
            let b = roster.get(assignment.second.as_deref().unwrap()).unwrap();
            assert!(is_eligible(a, b));
        }
    }
}
