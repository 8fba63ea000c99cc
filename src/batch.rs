use rayon::prelude::*;

use crate::{
    diff::{Differ, EditScript, Outcome},
    error::Result,
};

/// Diffs independent pairs in parallel. Each rayon worker owns its own
/// [`Differ`], so frontier storage is reused within a worker but never
/// shared between calls in flight.
pub fn diff_batch<T>(pairs: &[(&[T], &[T])], max_distance: usize) -> Vec<Result<(Outcome, EditScript)>>
where
    T: PartialEq + Sync,
{
    pairs
        .par_iter()
        .map_init(
            || Differ::new().with_max_distance(max_distance),
            |differ, &(a, b)| -> Result<(Outcome, EditScript)> {
                let outcome = differ.diff(a, b)?;
                Ok((outcome, differ.take_script()))
            },
        )
        .collect()
}

/// Like [`diff_batch`] but only computes distances.
pub fn distance_batch<T>(pairs: &[(&[T], &[T])], max_distance: usize) -> Vec<Result<Outcome>>
where
    T: PartialEq + Sync,
{
    pairs
        .par_iter()
        .map_init(
            || Differ::new().with_max_distance(max_distance),
            |differ, &(a, b)| differ.distance(a, b),
        )
        .collect()
}
