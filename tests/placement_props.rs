use broadside::{random_fleet, retry, FLEET_CELLS, FLEET_SHIPS};
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_fleets_satisfy_the_manifest(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = random_fleet(&mut rng).expect("placement terminates within budget");

        prop_assert_eq!(board.ships().len(), FLEET_SHIPS);
        prop_assert_eq!(board.occupied().count(), FLEET_CELLS);

        let mut lengths: Vec<u8> = board.ships().iter().map(|s| s.class().length()).collect();
        lengths.sort_unstable();
        prop_assert_eq!(lengths, vec![1, 1, 1, 1, 2, 2, 2, 3, 3, 4]);

        // no two ships share a cell or touch, diagonals included
        for (i, a) in board.ships().iter().enumerate() {
            for b in board.ships().iter().skip(i + 1) {
                prop_assert!(
                    !a.halo().intersects(b.footprint()),
                    "ships touch: {} and {}", a, b
                );
            }
        }
    }
}

#[test]
fn test_retry_stops_at_first_success() {
    let mut calls = 0;
    let out = retry(10, |i| {
        calls += 1;
        (i == 3).then_some(i)
    });
    assert_eq!(out, Some(3));
    assert_eq!(calls, 4);
}

#[test]
fn test_retry_respects_the_cap() {
    let mut calls = 0u32;
    let out: Option<()> = retry(5, |_| {
        calls += 1;
        None
    });
    assert_eq!(out, None);
    assert_eq!(calls, 5);
}
