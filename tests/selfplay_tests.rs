use broadside::{play_duel, GameId, HeatSeeker, TOTAL_SHIP_CELLS};
use rand::{rngs::SmallRng, SeedableRng};

#[test]
fn test_duels_finish_with_a_winner() {
    for seed in [1u64, 7, 42, 1234] {
        let mut rng = SmallRng::seed_from_u64(seed);
        let summary = play_duel::<12, _, _>(GameId(seed), &mut HeatSeeker, &mut HeatSeeker, &mut rng).unwrap();
        assert!(!summary.stalled, "seed {} stalled", seed);
        let winner = summary.winner.clone().expect("duel should have a winner");
        let seat = summary.seats.iter().find(|s| s.name == winner).unwrap();
        assert_eq!(seat.hits, TOTAL_SHIP_CELLS);
        assert_eq!(seat.sunk, 10);
        for s in &summary.seats {
            // single shots never repeat a cell; only ability cells can
            assert!(s.shots <= 144 + 12 + 2 * 12 + 21);
            assert!(s.ability_usage.plane <= 1 && s.ability_usage.splatter <= 2 && s.ability_usage.comb <= 1);
        }
    }
}

#[test]
fn test_duel_is_reproducible() {
    let run = |seed| {
        let mut rng = SmallRng::seed_from_u64(seed);
        play_duel::<12, _, _>(GameId(1), &mut HeatSeeker, &mut HeatSeeker, &mut rng).unwrap()
    };
    assert_eq!(run(5), run(5));
}

#[test]
fn test_duel_summary_json() {
    let mut rng = SmallRng::seed_from_u64(3);
    let summary = play_duel::<12, _, _>(GameId(1), &mut HeatSeeker, &mut HeatSeeker, &mut rng).unwrap();
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["seats"].as_array().map(|s| s.len()), Some(2));
    assert!(json["abilityUsage"].is_null());
    assert!(json["seats"][0]["abilityUsage"]["plane"].is_number());
}
