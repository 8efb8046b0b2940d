use serde::Serialize;

use crate::error::{Error, InputError, Result};

/// One cell of an answer grid: the index of the process occupying it, or
/// `None` for an idle tick / free hole.
pub type Slot = Option<usize>;

/// Sentinel used for empty cells when grids travel as plain integers.
pub const EMPTY_CELL: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub ok: bool,
    pub mismatched: Vec<usize>,
    pub len: usize,
}

impl Verdict {
    /// Fraction of cells answered correctly. An empty grid counts as fully correct.
    pub fn accuracy(&self) -> f64 {
        if self.len == 0 {
            return 1.0;
        }
        (self.len - self.mismatched.len()) as f64 / self.len as f64
    }
}

/// Compare two grids of the same length.
///
/// Empty cells are compared like any other value; they are never wildcards.
/// A length mismatch means the grids describe different problems and is
/// rejected rather than scored.
pub fn verify<T: PartialEq>(canonical: &[T], submitted: &[T]) -> Result<Verdict> {
    if canonical.len() != submitted.len() {
        return Err(InputError::LengthMismatch {
            expected: canonical.len(),
            submitted: submitted.len(),
        }
        .into());
    }

    let mismatched: Vec<usize> = canonical
        .iter()
        .zip(submitted)
        .enumerate()
        .filter_map(|(i, (want, got))| (want != got).then_some(i))
        .collect();

    tracing::debug!(
        len = canonical.len(),
        mismatched = mismatched.len(),
        "verified answer"
    );

    Ok(Verdict {
        ok: mismatched.is_empty(),
        mismatched,
        len: canonical.len(),
    })
}

pub fn to_wire(cells: &[Slot]) -> Vec<i64> {
    cells
        .iter()
        .map(|cell| match cell {
            Some(index) => i64::try_from(*index).unwrap_or(i64::MAX),
            None => EMPTY_CELL,
        })
        .collect()
}

/// Decode an integer grid where `-1` marks an empty cell.
pub fn from_wire(cells: &[i64]) -> Result<Vec<Slot>> {
    cells
        .iter()
        .enumerate()
        .map(|(index, &value)| match value {
            EMPTY_CELL => Ok(None),
            v => usize::try_from(v)
                .map(Some)
                .map_err(|_| Error::from(InputError::InvalidCell { index, value })),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_every_mismatch() {
        let canonical = [Some(0), None, Some(1), Some(1)];
        let submitted = [Some(1), None, Some(1), None];
        let verdict = verify(&canonical, &submitted).unwrap();

        assert!(!verdict.ok);
        assert_eq!(verdict.mismatched, vec![0, 3]);
        assert!((verdict.accuracy() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_grids_match() {
        let verdict = verify::<Slot>(&[], &[]).unwrap();
        assert!(verdict.ok);
        assert_eq!(verdict.accuracy(), 1.0);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        assert!(matches!(
            verify::<Slot>(&[None, None], &[None]),
            Err(Error::Input(InputError::LengthMismatch {
                expected: 2,
                submitted: 1
            }))
        ));
    }

    #[test]
    fn wire_rejects_negative_cells_other_than_sentinel() {
        assert_eq!(from_wire(&[2, -1, 0]).unwrap(), vec![Some(2), None, Some(0)]);
        assert!(matches!(
            from_wire(&[0, -3]),
            Err(Error::Input(InputError::InvalidCell { index: 1, value: -3 }))
        ));
        assert_eq!(to_wire(&[None, Some(4)]), vec![-1, 4]);
    }
}
