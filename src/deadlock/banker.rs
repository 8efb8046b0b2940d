use super::{BankerState, SafetyReport, Units};
use crate::error::{Error, InputError, Result};

/// Run the banker's safety algorithm over `state`.
///
/// Each pass scans processes in index order and lets every one whose need
/// fits the work vector finish and return its holding. Passes repeat until
/// all have finished or a full pass makes no progress; whoever is left is
/// deadlocked.
pub fn check_safety(state: &BankerState) -> Result<SafetyReport> {
    let available = validate(state)?;
    let need: Vec<Vec<Units>> = state
        .max
        .iter()
        .zip(&state.allocation)
        .map(|(max, held)| max.iter().zip(held).map(|(m, h)| m - h).collect())
        .collect();

    let n = state.num_processes();
    let mut work = available.clone();
    let mut finished = vec![false; n];
    let mut safe_sequence = Vec::with_capacity(n);

    loop {
        let mut progressed = false;
        for i in 0..n {
            if finished[i] || need[i].iter().zip(&work).any(|(want, have)| want > have) {
                continue;
            }
            // Holdings are bounded by the totals, so work never exceeds them
            for (w, h) in work.iter_mut().zip(&state.allocation[i]) {
                *w += h;
            }
            finished[i] = true;
            safe_sequence.push(i);
            progressed = true;
            tracing::trace!(process = i, ?work, "process can finish");
        }
        if !progressed || safe_sequence.len() == n {
            break;
        }
    }

    let blocked: Vec<usize> = (0..n).filter(|&i| !finished[i]).collect();
    tracing::debug!(
        processes = n,
        resources = state.num_resources(),
        safe = blocked.is_empty(),
        "checked banker state"
    );

    Ok(SafetyReport {
        state: state.clone(),
        available,
        need,
        safe_sequence,
        blocked,
    })
}

// Returns the available vector once shapes and totals check out.
fn validate(state: &BankerState) -> Result<Vec<Units>> {
    let m = state.num_resources();
    if m == 0 {
        return Err(InputError::NoResources.into());
    }
    if state.max.is_empty() {
        return Err(InputError::NoProcesses.into());
    }
    if state.allocation.len() != state.max.len() {
        return Err(InputError::RowCountMismatch {
            max: state.max.len(),
            allocation: state.allocation.len(),
        }
        .into());
    }

    for (matrix, rows) in [("max", &state.max), ("allocation", &state.allocation)] {
        if let Some((process, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != m) {
            return Err(InputError::RowWidth {
                matrix,
                process,
                len: row.len(),
                expected: m,
            }
            .into());
        }
    }

    for (process, (max, held)) in state.max.iter().zip(&state.allocation).enumerate() {
        if let Some(resource) = (0..m).find(|&j| held[j] > max[j]) {
            return Err(InputError::AllocationExceedsMax { process, resource }.into());
        }
    }

    (0..m)
        .map(|j| {
            let total = state.resources[j];
            state
                .allocation
                .iter()
                .try_fold(0 as Units, |sum, row| sum.checked_add(row[j]))
                .and_then(|held| total.checked_sub(held))
                .ok_or_else(|| Error::from(InputError::OverAllocated { resource: j, total }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(resources: &[Units], max: &[&[Units]], allocation: &[&[Units]]) -> BankerState {
        BankerState {
            resources: resources.to_vec(),
            max: max.iter().map(|r| r.to_vec()).collect(),
            allocation: allocation.iter().map(|r| r.to_vec()).collect(),
        }
    }

    #[test]
    fn textbook_state_is_safe() {
        let s = state(
            &[10, 5, 7],
            &[&[7, 5, 3], &[3, 2, 2], &[9, 0, 2], &[2, 2, 2], &[4, 3, 3]],
            &[&[0, 1, 0], &[2, 0, 0], &[3, 0, 2], &[2, 1, 1], &[0, 0, 2]],
        );
        let report = check_safety(&s).unwrap();

        assert_eq!(report.available, vec![3, 3, 2]);
        assert_eq!(report.need[0], vec![7, 4, 3]);
        assert_eq!(report.need[4], vec![4, 3, 1]);
        assert_eq!(report.safe_sequence, vec![1, 3, 4, 0, 2]);
        assert!(report.is_safe());
    }

    #[test]
    fn circular_wait_is_a_deadlock() {
        let s = state(&[1, 1], &[&[1, 1], &[1, 1]], &[&[1, 0], &[0, 1]]);
        let report = check_safety(&s).unwrap();

        assert!(report.deadlock());
        assert!(report.safe_sequence.is_empty());
        assert_eq!(report.blocked, vec![0, 1]);
    }

    #[test]
    fn partial_progress_reports_the_stuck_processes() {
        let s = state(&[2], &[&[1], &[3], &[2]], &[&[1], &[0], &[1]]);
        let report = check_safety(&s).unwrap();

        assert_eq!(report.safe_sequence, vec![0, 2]);
        assert_eq!(report.blocked, vec![1]);
    }

    #[test]
    fn malformed_states_are_rejected() {
        let err = |s: BankerState| match check_safety(&s) {
            Err(Error::Input(e)) => e,
            other => panic!("expected input error, got {other:?}"),
        };

        assert_eq!(err(state(&[], &[&[]], &[&[]])), InputError::NoResources);
        assert_eq!(err(state(&[3], &[], &[])), InputError::NoProcesses);
        assert_eq!(
            err(state(&[3], &[&[1], &[1]], &[&[0]])),
            InputError::RowCountMismatch { max: 2, allocation: 1 }
        );
        assert_eq!(
            err(state(&[3, 3], &[&[1, 1]], &[&[0]])),
            InputError::RowWidth {
                matrix: "allocation",
                process: 0,
                len: 1,
                expected: 2
            }
        );
        assert_eq!(
            err(state(&[3], &[&[1]], &[&[2]])),
            InputError::AllocationExceedsMax { process: 0, resource: 0 }
        );
        assert_eq!(
            err(state(&[3], &[&[2], &[2]], &[&[2], &[2]])),
            InputError::OverAllocated { resource: 0, total: 3 }
        );
        assert_eq!(
            err(state(&[Units::MAX], &[&[Units::MAX], &[1]], &[&[Units::MAX], &[1]])),
            InputError::OverAllocated {
                resource: 0,
                total: Units::MAX
            }
        );
    }
}
