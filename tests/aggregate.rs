use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fifa_h2h::{ExclusionRule, MatchRecord, OutcomeCounts, PairKey, aggregate, aggregate_with};

const TEAMS: &[&str] = &[
    "Brazil",
    "Germany",
    "Italy",
    "Argentina",
    "France",
    "Uruguay",
    "Spain",
];

fn random_history(seed: u64, n: usize) -> Vec<MatchRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let a = TEAMS[rng.gen_range(0..TEAMS.len())];
            let mut b = TEAMS[rng.gen_range(0..TEAMS.len())];
            while b == a {
                b = TEAMS[rng.gen_range(0..TEAMS.len())];
            }
            MatchRecord::new(a, rng.gen_range(0..5), b, rng.gen_range(0..5))
        })
        .collect()
}

#[test]
fn team_counts_sum_to_appearances() {
    let rows = random_history(7, 400);
    let t = aggregate(&rows, 0);

    let mut appearances: HashMap<&str, u32> = HashMap::new();
    for m in &rows {
        *appearances.entry(&m.competitor_a).or_default() += 1;
        *appearances.entry(&m.competitor_b).or_default() += 1;
    }
    assert_eq!(t.teams.len(), appearances.len());
    for (name, counts) in t.teams.iter() {
        assert_eq!(counts.total(), appearances[name], "{name}");
    }
    assert_eq!(t.processed, 400);
    assert_eq!(t.excluded, 0);
}

#[test]
fn pair_counts_sum_to_meetings_and_agree_with_team_view() {
    let rows = random_history(11, 300);
    let t = aggregate(&rows, 0);

    let mut meetings: HashMap<PairKey, u32> = HashMap::new();
    for m in &rows {
        *meetings
            .entry(PairKey::new(&m.competitor_a, &m.competitor_b))
            .or_default() += 1;
    }
    assert_eq!(t.pairs.len(), meetings.len());
    for (key, counts) in t.pairs.iter() {
        assert_eq!(counts.total(), meetings[key], "{key}");
    }

    // Wins of the reference side across all pairings equal its team-level wins.
    for (name, team) in t.teams.iter() {
        let from_pairs = t
            .pairs
            .iter()
            .filter(|(k, _)| k.first() == name || k.second() == name)
            .map(|(k, c)| if k.is_reference(name) { *c } else { c.reversed() })
            .fold(OutcomeCounts::default(), |acc, c| OutcomeCounts {
                win: acc.win + c.win,
                lose: acc.lose + c.lose,
                draw: acc.draw + c.draw,
            });
        assert_eq!(from_pairs, *team, "{name}");
    }
}

#[test]
fn regional_rows_do_not_change_tallies() {
    let rows = random_history(3, 120);
    let baseline = aggregate(&rows, 0);

    let mut injected = rows.clone();
    injected.insert(10, MatchRecord::new("West Germany", 3, "Brazil", 0));
    injected.insert(50, MatchRecord::new("Italy", 1, "East Germany", 1));
    injected.insert(90, MatchRecord::new("West Germany", 2, "East Germany", 2));
    let with_regional = aggregate(&injected, 0);

    assert_eq!(with_regional.teams, baseline.teams);
    assert_eq!(with_regional.pairs, baseline.pairs);
    assert_eq!(with_regional.excluded, 3);
    assert!(!with_regional.teams.contains("West Germany"));
}

#[test]
fn held_out_tail_is_not_aggregated() {
    let rows = vec![
        MatchRecord::new("Brazil", 1, "Italy", 0),
        MatchRecord::new("Brazil", 0, "Italy", 2),
        MatchRecord::new("Spain", 1, "France", 0),
    ];
    let t = aggregate(&rows, 1);
    assert_eq!(t.processed, 2);
    assert!(!t.teams.contains("Spain"));
    assert_eq!(
        *t.teams.get("Brazil").unwrap(),
        OutcomeCounts {
            win: 1,
            lose: 1,
            draw: 0
        }
    );

    let empty = aggregate(&rows, 10);
    assert!(empty.teams.is_empty());
    assert!(empty.pairs.is_empty());
    assert_eq!(empty.processed, 0);
}

#[test]
fn draw_counts_for_both_sides() {
    let t = aggregate(&[MatchRecord::new("Uruguay", 2, "Spain", 2)], 0);
    assert_eq!(t.teams.get("Uruguay").unwrap().draw, 1);
    assert_eq!(t.teams.get("Spain").unwrap().draw, 1);
    assert_eq!(t.pairs.get(&PairKey::new("Spain", "Uruguay")).unwrap().draw, 1);
}

#[test]
fn custom_exclusion_rule_is_honoured() {
    let rows = vec![
        MatchRecord::new("West Germany", 1, "Italy", 0),
        MatchRecord::new("North Korea", 0, "Italy", 1),
    ];
    let t = aggregate_with(&rows, 0, &ExclusionRule::new(["North"]));
    assert!(t.teams.contains("West Germany"));
    assert!(!t.teams.contains("North Korea"));
    assert_eq!(t.excluded, 1);

    let all = aggregate_with(&rows, 0, &ExclusionRule::none());
    assert_eq!(all.teams.get("Italy").unwrap().total(), 2);
}
