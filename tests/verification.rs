use pretty_assertions::assert_eq;
use proptest::prelude::*;
use schedulix_model::{
    Algorithm, CpuConfig, CpuQuestion, Error, InputError, Process, compute_schedule,
    verify::{from_wire, to_wire, verify},
};

#[test]
fn single_wrong_cell_is_reported() {
    let canonical = from_wire(&[0, 0, 1, 1, -1]).unwrap();
    let submitted = from_wire(&[0, 0, 1, -1, -1]).unwrap();
    let verdict = verify(&canonical, &submitted).unwrap();

    assert!(!verdict.ok);
    assert_eq!(verdict.mismatched, vec![3]);
    assert!((verdict.accuracy() - 0.8).abs() < 1e-9);
}

#[test]
fn empty_cells_are_not_wildcards() {
    let canonical = from_wire(&[-1, 2]).unwrap();
    let submitted = from_wire(&[0, 2]).unwrap();

    assert_eq!(verify(&canonical, &submitted).unwrap().mismatched, vec![0]);
}

#[test]
fn grids_of_different_problems_are_rejected() {
    let err = verify(&[Some(0); 30], &[Some(0); 29]).unwrap_err();
    assert!(err.is_input());
    assert!(matches!(
        err,
        Error::Input(InputError::LengthMismatch { expected: 30, submitted: 29 })
    ));
}

#[test]
fn stored_question_scores_a_student_grid() {
    let question = CpuQuestion {
        algorithm: "SRTF".into(),
        quantum: None,
        num_processes: 2,
        processes: vec![Process::new("P1", 0, 6), Process::new("P2", 1, 2)],
    };
    let mut grid = vec![-1; 30];
    grid[..8].copy_from_slice(&[0, 1, 1, 0, 0, 0, 0, 0]);
    assert!(question.check(&from_wire(&grid).unwrap()).unwrap().ok);

    // Running P1 without preemption misses the two P2 cells and the P1 cells after them.
    grid[..8].copy_from_slice(&[0, 0, 0, 0, 0, 0, 1, 1]);
    let verdict = question.check(&from_wire(&grid).unwrap()).unwrap();
    assert_eq!(verdict.mismatched, vec![1, 2, 6, 7]);
}

proptest! {
    #[test]
    fn canonical_answer_always_verifies(
        bursts in prop::collection::vec((0u64..6, 1u64..6), 1..6),
        pick in 0usize..Algorithm::ALL.len(),
    ) {
        let processes: Vec<Process> = bursts
            .iter()
            .enumerate()
            .map(|(i, &(arrival, burst))| Process::new(format!("P{i}"), arrival, burst))
            .collect();
        let algorithm = Algorithm::ALL[pick];
        let quantum = (algorithm == Algorithm::RoundRobin).then_some(2);
        let config = CpuConfig::new(algorithm, quantum).unwrap();
        let answer = compute_schedule(&processes, &config).unwrap().canonical_answer();

        let wire = to_wire(&answer);
        prop_assert!(wire.iter().all(|&c| c >= -1));
        let verdict = verify(&answer, &from_wire(&wire).unwrap()).unwrap();
        prop_assert!(verdict.ok);
        prop_assert_eq!(verdict.accuracy(), 1.0);
    }

    #[test]
    fn flipping_one_cell_is_caught(
        cells in prop::collection::vec(-1i64..4, 1..30),
        index in any::<prop::sample::Index>(),
    ) {
        let canonical = from_wire(&cells).unwrap();
        let i = index.index(cells.len());
        let mut submitted = canonical.clone();
        submitted[i] = match submitted[i] {
            Some(p) => Some(p + 1),
            None => Some(0),
        };

        let verdict = verify(&canonical, &submitted).unwrap();
        prop_assert_eq!(verdict.mismatched, vec![i]);
    }
}
