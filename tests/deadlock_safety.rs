use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use schedulix_model::{BankerState, Error, InputError, check_safety};

fn textbook() -> BankerState {
    BankerState {
        resources: vec![10, 5, 7],
        max: vec![
            vec![7, 5, 3],
            vec![3, 2, 2],
            vec![9, 0, 2],
            vec![2, 2, 2],
            vec![4, 3, 3],
        ],
        allocation: vec![
            vec![0, 1, 0],
            vec![2, 0, 0],
            vec![3, 0, 2],
            vec![2, 1, 1],
            vec![0, 0, 2],
        ],
    }
}

#[test]
fn safe_summary_lists_matrices_and_sequence() {
    let report = check_safety(&textbook()).unwrap();
    let summary = report.to_string();

    assert!(summary.contains("Resource Instances: [R1=10, R2=5, R3=7]"));
    assert!(summary.contains("Available Resources: [R1=3, R2=3, R3=2]"));
    assert!(summary.contains("Need Matrix (Max - Allocation):\n  P1: [7, 4, 3]"));
    assert!(summary.contains("Result: NO DEADLOCK - System is in a SAFE STATE"));
    assert!(summary.ends_with("Safe Sequence: P2 -> P4 -> P5 -> P1 -> P3"));
}

#[test]
fn raising_a_claim_can_deadlock_the_textbook_state() {
    let mut state = textbook();
    // Everyone but P4 now claims all ten units of R1.
    state.max[1] = vec![10, 2, 2];
    state.max[0] = vec![10, 5, 3];
    state.max[2] = vec![10, 0, 2];
    state.max[4] = vec![10, 3, 3];
    let report = check_safety(&state).unwrap();

    assert!(report.deadlock());
    assert_eq!(report.safe_sequence, vec![3]);
    assert_eq!(report.blocked, vec![0, 1, 2, 4]);
    let summary = report.to_string();
    assert!(summary.contains("Result: DEADLOCK DETECTED"));
    assert!(summary.ends_with("Blocked Processes: P1, P2, P3, P5"));
}

#[test]
fn payload_uses_plain_field_names() {
    let payload = r#"{
        "resources": [3],
        "max": [[2], [2]],
        "allocation": [[1], [1]]
    }"#;
    let report = check_safety(&BankerState::from_json(payload).unwrap()).unwrap();

    assert_eq!(report.available, vec![1]);
    assert_eq!(report.safe_sequence, vec![0, 1]);
}

#[test]
fn over_allocation_is_an_input_error() {
    let mut state = textbook();
    state.allocation[2] = vec![9, 0, 2];
    assert!(matches!(
        check_safety(&state),
        Err(Error::Input(InputError::OverAllocated { resource: 0, total: 10 }))
    ));
}

proptest! {
    #[test]
    fn safe_sequence_replays_and_partitions(
        seed in any::<u64>(),
        processes in 1usize..7,
        resources in 1usize..4,
    ) {
        let state = BankerState::random(&mut StdRng::seed_from_u64(seed), processes, resources);
        let report = check_safety(&state).unwrap();

        let mut seen: Vec<usize> = report
            .safe_sequence
            .iter()
            .chain(&report.blocked)
            .copied()
            .collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..processes).collect::<Vec<_>>());

        // Every step in the sequence must fit what was free at that point.
        let mut work = report.available.clone();
        for &p in &report.safe_sequence {
            for j in 0..resources {
                prop_assert!(report.need[p][j] <= work[j]);
                prop_assert_eq!(report.need[p][j] + state.allocation[p][j], state.max[p][j]);
            }
            for j in 0..resources {
                work[j] += state.allocation[p][j];
            }
        }
        for &p in &report.blocked {
            prop_assert!((0..resources).any(|j| report.need[p][j] > work[j]));
        }
    }
}
