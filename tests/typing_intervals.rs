use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use autotype::interval::{delay_for_char, pick_interval, TYPING_INTERVALS_MS};

#[test]
fn intervals_stay_in_the_candidate_set() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..1000 {
        let interval = pick_interval(&TYPING_INTERVALS_MS, &mut rng);
        assert!(
            TYPING_INTERVALS_MS.contains(&interval),
            "unexpected interval {interval}"
        );
    }
}

#[test]
fn every_candidate_interval_is_reachable() {
    let mut rng = StdRng::seed_from_u64(12);

    let seen: HashSet<u64> = (0..1000)
        .map(|_| pick_interval(&TYPING_INTERVALS_MS, &mut rng))
        .collect();

    assert_eq!(
        seen,
        TYPING_INTERVALS_MS.iter().copied().collect(),
        "expected every candidate interval to appear over many draws"
    );
}

#[test]
fn whitespace_types_instantly() {
    let mut rng = StdRng::seed_from_u64(13);

    for c in [' ', '\t', '\n'] {
        assert_eq!(
            delay_for_char(c, &TYPING_INTERVALS_MS, &mut rng),
            0,
            "whitespace {c:?} must not be delayed"
        );
    }

    for c in ['a', '{', ';'] {
        let delay = delay_for_char(c, &TYPING_INTERVALS_MS, &mut rng);
        assert!(
            TYPING_INTERVALS_MS.contains(&delay),
            "visible character {c:?} must use a candidate interval, got {delay}"
        );
    }
}
