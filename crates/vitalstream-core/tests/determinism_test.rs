//! End-to-end determinism and bounds properties for the simulation
//! engine.
//!
//! These tests exercise the public crate API the way the schedulers
//! use it: seed from an identity, tick repeatedly, snapshot readings,
//! and verify that equal identities reproduce equal trajectories and
//! that every metric stays inside its declared range.

use std::sync::Arc;

use vitalstream_core::{
    seed_from_identity, FleetGenerator, MemoryRepository, SeededRng, SubjectRegistry,
    SubjectState, VitalsRepository, GENERATION_PERIOD,
};

/// Reading sequences from independently constructed states are
/// identical for the same identity, over many ticks.
#[test]
fn equal_identities_produce_equal_reading_sequences() {
    for identity in ["user-42", "patient-7", "", "🌡️-unicode"] {
        let mut a = SubjectState::from_identity(identity);
        let mut b = SubjectState::from_identity(identity);

        for _ in 0..200 {
            a.tick();
            b.tick();
            let ra = a.snapshot(identity);
            let rb = b.snapshot(identity);
            assert_eq!(ra.heart_rate, rb.heart_rate);
            assert_eq!(ra.spo2, rb.spo2);
            assert_eq!(ra.systolic, rb.systolic);
            assert_eq!(ra.diastolic, rb.diastolic);
            assert_eq!(ra.temperature, rb.temperature);
        }
    }
}

/// Rounded reading fields respect the metric ranges for any tick count.
#[test]
fn readings_stay_in_declared_ranges() {
    let mut state = SubjectState::from_identity("range-sweep");
    for _ in 0..2000 {
        state.tick();
        let r = state.snapshot("range-sweep");
        assert!((60..=100).contains(&r.heart_rate));
        assert!((95.0..=100.0).contains(&r.spo2));
        assert!((100..=140).contains(&r.systolic));
        assert!((60..=90).contains(&r.diastolic));
        assert!((97.0..=100.0).contains(&r.temperature));
    }
}

/// The seed and stream are stable: the golden scenario from the
/// construction, checked through the public API.
#[test]
fn golden_seed_and_stream_for_user_42() {
    let seed = seed_from_identity("user-42");
    assert_eq!(seed, 39_875_499);

    let mut stream = SeededRng::new(seed);
    let draws: Vec<f64> = (0..4).map(|_| stream.next_f64()).collect();
    let expected = [
        0.316_380_786_476_656_8,
        0.488_577_598_473_057_15,
        0.374_984_296_970_069_4,
        0.315_384_679_473_936_56,
    ];
    for (got, want) in draws.iter().zip(expected) {
        assert!((got - want).abs() < 1e-15, "got {got}, want {want}");
    }
}

/// Registries driven by different schedulers are independent: the same
/// identity in two registries evolves separately.
#[test]
fn independent_registries_do_not_share_state() {
    let fleet = SubjectRegistry::new();
    let connections = SubjectRegistry::new();

    let a = fleet.get_or_create("user-42");
    let b = connections.get_or_create("user-42");

    a.lock().tick();
    // Only the fleet entry advanced.
    let a_metrics = a.lock().raw_metrics();
    let b_metrics = b.lock().raw_metrics();
    assert_ne!(a_metrics.map(f64::to_bits), b_metrics.map(f64::to_bits));
}

/// A generator cycle is equivalent to ticking each rostered subject
/// once, and the persisted batch carries one reading per subject.
#[tokio::test]
async fn generator_cycle_matches_direct_ticks() {
    let repo = Arc::new(MemoryRepository::new());
    repo.register_subject("a").await.unwrap();
    repo.register_subject("b").await.unwrap();

    let generator = FleetGenerator::new(repo.clone(), GENERATION_PERIOD);
    generator.run_cycle().await;
    generator.run_cycle().await;
    assert_eq!(repo.count_readings().await.unwrap(), 4);

    let mut reference = SubjectState::from_identity("a");
    reference.tick();
    let first = reference.snapshot("a");
    reference.tick();
    let second = reference.snapshot("a");

    let rows = repo
        .readings_for_subject("a", chrono::Utc::now() - chrono::Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    let persisted: Vec<(u32, f64, u32)> = rows
        .iter()
        .map(|r| (r.heart_rate, r.spo2, r.systolic))
        .collect();
    for expected in [&first, &second] {
        assert!(
            persisted.contains(&(expected.heart_rate, expected.spo2, expected.systolic)),
            "persisted rows should contain the reading from each direct tick"
        );
    }
}
