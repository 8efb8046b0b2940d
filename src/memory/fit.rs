use super::{Allocation, Hole, HoleId, MemoryProcess, Policy, Size};
use crate::error::{InputError, Result};

/// Place `processes`, in input order, into `holes` under `policy`.
///
/// Processes that fit nowhere are left unallocated; that is a normal result,
/// not an error.
pub fn compute_allocation(
    holes: &[Hole],
    processes: &[MemoryProcess],
    policy: Policy,
) -> Result<Allocation> {
    validate(holes, processes)?;

    let mut by_hole = vec![None; holes.len()];
    let mut by_process = Vec::with_capacity(processes.len());

    for (index, process) in processes.iter().enumerate() {
        let chosen = pick_hole(holes, &by_hole, process.size, policy);
        if let Some(hole) = chosen {
            by_hole[hole] = Some(index);
        }
        tracing::trace!(pid = %process.pid, size = process.size, hole = ?chosen, "placed process");
        by_process.push(chosen);
    }

    let allocation = Allocation {
        policy,
        holes: holes.to_vec(),
        processes: processes.to_vec(),
        by_process,
        by_hole,
    };
    tracing::debug!(
        policy = policy.name(),
        holes = holes.len(),
        processes = processes.len(),
        unallocated = allocation.unallocated().count(),
        "computed allocation"
    );
    Ok(allocation)
}

fn validate(holes: &[Hole], processes: &[MemoryProcess]) -> Result<()> {
    if let Some(index) = holes.iter().position(|h| h.size == 0) {
        return Err(InputError::ZeroHoleSize { index }.into());
    }
    if let Some(p) = processes.iter().find(|p| p.size == 0) {
        return Err(InputError::ZeroProcessSize { pid: p.pid.clone() }.into());
    }
    // Holes are laid out back to back from address 0
    holes
        .iter()
        .try_fold(0 as Size, |total, h| total.checked_add(h.size))
        .ok_or(InputError::MemoryOverflow)?;
    Ok(())
}

// Ties go to the lowest hole index: candidates are scanned in order and only
// a strictly better leftover replaces the current pick.
fn pick_hole(holes: &[Hole], taken: &[Option<usize>], need: Size, policy: Policy) -> Option<HoleId> {
    let mut candidates = holes
        .iter()
        .enumerate()
        .filter(|&(i, h)| taken[i].is_none() && h.size >= need)
        .map(|(i, h)| (i, h.size - need));

    match policy {
        Policy::FirstFit => candidates.next().map(|(i, _)| i),
        Policy::BestFit => candidates
            .reduce(|best, c| if c.1 < best.1 { c } else { best })
            .map(|(i, _)| i),
        Policy::WorstFit => candidates
            .reduce(|worst, c| if c.1 > worst.1 { c } else { worst })
            .map(|(i, _)| i),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn holes(sizes: &[Size]) -> Vec<Hole> {
        sizes.iter().copied().map(Hole::new).collect()
    }

    fn procs(sizes: &[Size]) -> Vec<MemoryProcess> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &s)| MemoryProcess::new(format!("P{}", i + 1), s))
            .collect()
    }

    #[test]
    fn best_fit_tie_goes_to_lowest_index() {
        let alloc = compute_allocation(&holes(&[30, 20, 20]), &procs(&[15]), Policy::BestFit).unwrap();
        assert_eq!(alloc.by_process, vec![Some(1)]);
    }

    #[test]
    fn worst_fit_tie_goes_to_lowest_index() {
        let alloc =
            compute_allocation(&holes(&[10, 40, 40]), &procs(&[5, 5]), Policy::WorstFit).unwrap();
        assert_eq!(alloc.by_process, vec![Some(1), Some(2)]);
    }

    #[test]
    fn leftover_is_not_reused() {
        let alloc =
            compute_allocation(&holes(&[100]), &procs(&[10, 10]), Policy::FirstFit).unwrap();
        assert_eq!(alloc.by_process, vec![Some(0), None]);
        assert_eq!(alloc.leftover(0), 90);
        assert_eq!(alloc.total_leftover(), 90);
        assert!(!alloc.all_allocated());
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(matches!(
            compute_allocation(&holes(&[10, 0]), &procs(&[1]), Policy::FirstFit),
            Err(Error::Input(InputError::ZeroHoleSize { index: 1 }))
        ));
        assert!(matches!(
            compute_allocation(&holes(&[10]), &procs(&[0]), Policy::FirstFit),
            Err(Error::Input(InputError::ZeroProcessSize { .. }))
        ));
    }

    #[test]
    fn rejects_holes_past_the_address_space() {
        assert!(matches!(
            compute_allocation(&holes(&[Size::MAX, 2]), &procs(&[1]), Policy::FirstFit),
            Err(Error::Input(InputError::MemoryOverflow))
        ));

        let alloc = compute_allocation(&holes(&[Size::MAX - 2, 2]), &procs(&[2]), Policy::WorstFit)
            .unwrap();
        assert!(alloc.to_string().contains("Total Memory Range: 0 to 18446744073709551615"));
        assert_eq!(alloc.layout().last().map(|r| r.end), Some(Size::MAX));
    }

    #[test]
    fn no_holes_leaves_everyone_unallocated() {
        let alloc = compute_allocation(&[], &procs(&[1, 2]), Policy::BestFit).unwrap();
        assert_eq!(alloc.by_process, vec![None, None]);
        assert!(alloc.dense().is_empty());
    }
}
