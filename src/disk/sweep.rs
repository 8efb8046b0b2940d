use super::{Cylinder, DiskAlgorithm, DiskConfig, Direction};

/// Visit order for `requests`, starting with the head position.
///
/// Requests on the head's own cylinder count as lying ahead of it, so they are
/// served first whatever the direction.
pub fn traverse(requests: &[Cylinder], config: &DiskConfig) -> Vec<Cylinder> {
    let head = config.head;
    let mut traversal = Vec::with_capacity(requests.len() + 3);
    traversal.push(head);

    match config.algorithm {
        DiskAlgorithm::Fcfs => traversal.extend_from_slice(requests),
        DiskAlgorithm::Sstf => shortest_seek_first(requests, head, &mut traversal),
        algorithm => sweep(requests, config, algorithm, &mut traversal),
    }

    traversal
}

// Nearest pending request next; equal distances go to the lower cylinder.
fn shortest_seek_first(requests: &[Cylinder], head: Cylinder, traversal: &mut Vec<Cylinder>) {
    let mut pending = requests.to_vec();
    let mut at = head;
    loop {
        let Some(index) = pending
            .iter()
            .enumerate()
            .min_by_key(|&(_, &c)| (c.abs_diff(at), c))
            .map(|(index, _)| index)
        else {
            break;
        };
        at = pending.swap_remove(index);
        traversal.push(at);
    }
}

fn sweep(
    requests: &[Cylinder],
    config: &DiskConfig,
    algorithm: DiskAlgorithm,
    traversal: &mut Vec<Cylinder>,
) {
    let head = config.head;
    let (far_end, near_end) = match config.direction {
        Direction::Up => (config.last_cylinder, 0),
        Direction::Down => (0, config.last_cylinder),
    };

    let (mut ahead, mut behind): (Vec<Cylinder>, Vec<Cylinder>) =
        requests.iter().partition(|&&c| match config.direction {
            Direction::Up => c >= head,
            Direction::Down => c <= head,
        });

    // `ahead` in travel order; `behind` in the order a reversing arm meets it
    match config.direction {
        Direction::Up => {
            ahead.sort_unstable();
            behind.sort_unstable_by(|a, b| b.cmp(a));
        }
        Direction::Down => {
            ahead.sort_unstable_by(|a, b| b.cmp(a));
            behind.sort_unstable();
        }
    }

    traversal.extend_from_slice(&ahead);
    if behind.is_empty() {
        return;
    }

    match algorithm {
        DiskAlgorithm::Scan => {
            push_stop(traversal, far_end);
            traversal.extend_from_slice(&behind);
        }
        DiskAlgorithm::Look => traversal.extend_from_slice(&behind),
        DiskAlgorithm::CScan => {
            push_stop(traversal, far_end);
            push_stop(traversal, near_end);
            traversal.extend(behind.iter().rev());
        }
        DiskAlgorithm::CLook => traversal.extend(behind.iter().rev()),
        DiskAlgorithm::Fcfs | DiskAlgorithm::Sstf => {
            debug_assert!(false, "{algorithm} is not a sweeping algorithm");
            traversal.extend_from_slice(&behind);
        }
    }
}

// Turning points are not requests; skip them when the arm is already there.
fn push_stop(traversal: &mut Vec<Cylinder>, cylinder: Cylinder) {
    if traversal.last() != Some(&cylinder) {
        traversal.push(cylinder);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::seek_distance;

    const QUEUE: [Cylinder; 8] = [98, 183, 37, 122, 14, 124, 65, 67];

    fn run(algorithm: DiskAlgorithm, direction: Direction) -> (Vec<Cylinder>, u64) {
        let config = DiskConfig::new(algorithm, 53, 199).heading(direction);
        let traversal = traverse(&QUEUE, &config);
        let seek = seek_distance(&traversal);
        (traversal, seek)
    }

    #[test]
    fn fcfs_textbook_queue() {
        assert_eq!(run(DiskAlgorithm::Fcfs, Direction::Up).1, 640);
    }

    #[test]
    fn sstf_textbook_queue() {
        let (traversal, seek) = run(DiskAlgorithm::Sstf, Direction::Up);
        assert_eq!(traversal, vec![53, 65, 67, 37, 14, 98, 122, 124, 183]);
        assert_eq!(seek, 236);
    }

    #[test]
    fn scan_toward_zero_touches_the_end() {
        let (traversal, seek) = run(DiskAlgorithm::Scan, Direction::Down);
        assert_eq!(traversal, vec![53, 37, 14, 0, 65, 67, 98, 122, 124, 183]);
        assert_eq!(seek, 236);
    }

    #[test]
    fn cscan_counts_the_return_jump() {
        let (traversal, seek) = run(DiskAlgorithm::CScan, Direction::Up);
        assert_eq!(
            traversal,
            vec![53, 65, 67, 98, 122, 124, 183, 199, 0, 14, 37]
        );
        assert_eq!(seek, 146 + 199 + 37);
    }

    #[test]
    fn look_and_clook_turn_at_last_request() {
        let (look, look_seek) = run(DiskAlgorithm::Look, Direction::Up);
        assert_eq!(look, vec![53, 65, 67, 98, 122, 124, 183, 37, 14]);
        assert_eq!(look_seek, 130 + 169);

        let (clook, clook_seek) = run(DiskAlgorithm::CLook, Direction::Up);
        assert_eq!(clook, vec![53, 65, 67, 98, 122, 124, 183, 14, 37]);
        assert_eq!(clook_seek, 130 + 169 + 23);
    }

    #[test]
    fn scan_without_reversal_stops_at_last_request() {
        let config = DiskConfig::new(DiskAlgorithm::Scan, 10, 99);
        assert_eq!(traverse(&[20, 15], &config), vec![10, 15, 20]);
    }
}
