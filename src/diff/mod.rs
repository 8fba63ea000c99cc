//! Shortest edit scripts between two sequences.
//!
//! This is Myers' O(ND) difference algorithm with the linear space
//! refinement: each sub-problem is split at a middle snake found by meeting
//! forward and reverse searches, as described in
//!
//!   E. Myers, ``An O(ND) Difference Algorithm and Its Variations,''
//!   Algorithmica 1, 2 (1986), 251-266.

mod accessor;
mod frontier;
mod script;
mod ses;
mod snake;

pub use accessor::{Accessor, CompareFn, IndexFn, Seq};
pub use frontier::Frontier;
pub use script::{Edit, EditOp, EditScript};

use crate::error::Result;
use accessor::Equality;
use ses::{Context, Step};

/// Result of a diff that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The exact edit distance, and the number of runs written when a script
    /// was requested.
    Complete { distance: usize, runs: Option<usize> },
    /// The distance is larger than `bound`; any script written is partial.
    Truncated { bound: usize },
}

impl Outcome {
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    /// Exact distance, or `None` when truncated.
    pub fn distance(&self) -> Option<usize> {
        match self {
            Self::Complete { distance, .. } => Some(*distance),
            Self::Truncated { .. } => None,
        }
    }
}

/// Computes the shortest edit script turning `a` into `b`.
///
/// `max_distance` is the largest distance accepted, inclusive: a distance
/// equal to it completes, one above it stops early with
/// [`Outcome::Truncated`]. `0` means unbounded. Without `script` only the
/// distance is computed. `scratch` lets repeated calls reuse frontier
/// storage.
pub fn diff<T, E>(
    a: Seq<'_, T>,
    b: Seq<'_, T>,
    accessor: &Accessor<'_, T, E>,
    max_distance: usize,
    script: Option<&mut EditScript>,
    scratch: Option<&mut Frontier>,
) -> Result<Outcome> {
    let mut local = Frontier::new();
    let frontier = scratch.unwrap_or(&mut local);
    let (abase, bbase) = (a.base(), b.base());
    match accessor.equality()? {
        Equality::Raw(equal) => run(
            |i, j| equal(&abase[i], &bbase[j]),
            a,
            b,
            max_distance,
            script,
            frontier,
        ),
        Equality::Custom(index, compare) => run(
            |i, j| compare(&index(abase, i), &index(bbase, j)),
            a,
            b,
            max_distance,
            script,
            frontier,
        ),
    }
}

fn run<T, F>(
    eq: F,
    a: Seq<'_, T>,
    b: Seq<'_, T>,
    max_distance: usize,
    mut script: Option<&mut EditScript>,
    frontier: &mut Frontier,
) -> Result<Outcome>
where
    F: Fn(usize, usize) -> bool,
{
    let (aoff, n, boff, m) = (a.offset(), a.len(), b.offset(), b.len());
    if let Some(script) = script.as_deref_mut() {
        script.clear();
        script.reserve_for(n, m)?;
    }
    let dmax = match max_distance {
        0 => isize::MAX,
        max => isize::try_from(max).map_or(isize::MAX, |max| max.saturating_add(1)),
    };

    // The builder expects every sub-problem to start or end with an edit,
    // which eating the common prefix guarantees for the outermost one.
    let mut prefix = 0;
    while prefix < n && prefix < m && eq(aoff + prefix, boff + prefix) {
        prefix += 1;
    }

    let mut ctx = Context::new(eq, frontier, script, dmax);
    ctx.edit(EditOp::Match, aoff, prefix);
    let step = ses::build(&mut ctx, aoff + prefix, n - prefix, boff + prefix, m - prefix)?;
    let runs = ctx.script.as_deref().map(EditScript::len);

    let outcome = match step {
        Step::Distance(d) if (d as isize) < dmax => Outcome::Complete { distance: d, runs },
        _ => Outcome::Truncated {
            bound: max_distance,
        },
    };
    log::debug!(
        "diff {}+{} vs {}+{}: prefix {}, {:?}",
        aoff,
        n,
        boff,
        m,
        prefix,
        outcome
    );
    Ok(outcome)
}

/// A reusable diff engine owning its frontier storage and output script.
///
/// One `Differ` serves one call at a time; use one per thread to diff in
/// parallel.
#[derive(Debug, Default, Clone)]
pub struct Differ {
    frontier: Frontier,
    script: EditScript,
    max_distance: usize,
}

impl Differ {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_distance(mut self, max_distance: usize) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn diff<T: PartialEq>(&mut self, a: &[T], b: &[T]) -> Result<Outcome> {
        self.diff_with(Seq::whole(a), Seq::whole(b), &Accessor::raw())
    }

    pub fn diff_with<T, E>(
        &mut self,
        a: Seq<'_, T>,
        b: Seq<'_, T>,
        accessor: &Accessor<'_, T, E>,
    ) -> Result<Outcome> {
        diff(
            a,
            b,
            accessor,
            self.max_distance,
            Some(&mut self.script),
            Some(&mut self.frontier),
        )
    }

    pub fn distance<T: PartialEq>(&mut self, a: &[T], b: &[T]) -> Result<Outcome> {
        self.distance_with(Seq::whole(a), Seq::whole(b), &Accessor::raw())
    }

    pub fn distance_with<T, E>(
        &mut self,
        a: Seq<'_, T>,
        b: Seq<'_, T>,
        accessor: &Accessor<'_, T, E>,
    ) -> Result<Outcome> {
        diff(
            a,
            b,
            accessor,
            self.max_distance,
            None,
            Some(&mut self.frontier),
        )
    }

    /// Script of the last [`diff`](Self::diff) call.
    pub fn script(&self) -> &EditScript {
        &self.script
    }

    pub fn take_script(&mut self) -> EditScript {
        std::mem::take(&mut self.script)
    }
}

/// Unbounded diff of two slices.
pub fn diff_slices<T: PartialEq>(a: &[T], b: &[T]) -> Result<EditScript> {
    let mut differ = Differ::new();
    differ.diff(a, b)?;
    Ok(differ.take_script())
}

/// Edit distance between two slices, without building a script.
pub fn distance<T: PartialEq>(a: &[T], b: &[T], max_distance: usize) -> Result<Outcome> {
    diff(
        Seq::whole(a),
        Seq::whole(b),
        &Accessor::raw(),
        max_distance,
        None,
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiffError;
    use crate::util::test::{assert_valid_script, create_test_bytes, edit_distance};

    #[test]
    fn test_classic_example() {
        let (a, b) = (b"ABCABBA", b"CBABAC");
        let mut differ = Differ::new();
        let outcome = differ.diff(a, b).unwrap();
        assert_eq!(outcome.distance(), Some(5));
        let script = differ.script();
        assert_eq!(outcome, Outcome::Complete { distance: 5, runs: Some(script.len()) });
        assert_eq!(script.replay(a, b).unwrap(), b.to_vec());
        assert_eq!(script.matched(), (a.len() + b.len() - 5) / 2);
        assert_valid_script(script, a, b);
    }

    #[test]
    fn test_identical() {
        let a = b"identical";
        let script = diff_slices(a, a).unwrap();
        assert_eq!(script.runs(), &[Edit::new(EditOp::Match, 0, a.len())]);
        assert!(script.is_identical());
        assert_eq!(distance(a, a, 0).unwrap().distance(), Some(0));
    }

    #[test]
    fn test_both_empty() {
        let mut differ = Differ::new();
        let empty: &[u8] = &[];
        assert_eq!(
            differ.diff(empty, empty).unwrap(),
            Outcome::Complete {
                distance: 0,
                runs: Some(0)
            }
        );
    }

    #[test]
    fn test_one_side_empty() {
        let a = b"abc";
        let empty: &[u8] = &[];
        assert_eq!(
            diff_slices(a, empty).unwrap().runs(),
            &[Edit::new(EditOp::Delete, 0, 3)]
        );
        assert_eq!(
            diff_slices(empty, a).unwrap().runs(),
            &[Edit::new(EditOp::Insert, 0, 3)]
        );
        assert_eq!(distance(a, empty, 0).unwrap().distance(), Some(3));
    }

    #[test]
    fn test_prefix_then_insert() {
        assert_eq!(
            diff_slices(b"abc", b"abxc").unwrap().runs(),
            &[
                Edit::new(EditOp::Match, 0, 2),
                Edit::new(EditOp::Insert, 2, 1),
                Edit::new(EditOp::Match, 2, 1),
            ]
        );
        assert_eq!(
            diff_slices(b"ba", b"b").unwrap().runs(),
            &[
                Edit::new(EditOp::Match, 0, 1),
                Edit::new(EditOp::Delete, 1, 1),
            ]
        );
    }

    #[test]
    fn test_offsets_are_absolute() {
        let a = b"..xaby..";
        let b = b"---acb";
        let mut script = EditScript::new();
        let outcome = diff(
            Seq::new(&a[..], 2, 4).unwrap(),
            Seq::new(&b[..], 3, 3).unwrap(),
            &Accessor::raw(),
            0,
            Some(&mut script),
            None,
        )
        .unwrap();
        assert_eq!(outcome.distance(), Some(edit_distance(b"xaby", b"acb")));
        let rebuilt = script.replay(a, b).unwrap();
        assert_eq!(rebuilt, b"acb".to_vec());
        assert!(script.iter().all(|e| match e.op {
            EditOp::Insert => e.off >= 3 && e.end() <= 6,
            _ => e.off >= 2 && e.end() <= 6,
        }));
    }

    #[test]
    fn test_budget() {
        let (a, b) = (b"ABCABBA", b"CBABAC");
        for max in 1..5 {
            assert_eq!(
                distance(a, b, max).unwrap(),
                Outcome::Truncated { bound: max }
            );
            let mut differ = Differ::new().with_max_distance(max);
            assert!(differ.diff(a, b).unwrap().is_truncated());
        }
        for max in [5, 6, 100] {
            let mut differ = Differ::new().with_max_distance(max);
            assert_eq!(differ.diff(a, b).unwrap().distance(), Some(5));
            assert_eq!(differ.script().replay(a, b).unwrap(), b.to_vec());
        }
    }

    #[test]
    fn test_budget_applies_to_empty_side() {
        let empty: &[u8] = &[];
        assert_eq!(
            distance(b"abcd", empty, 2).unwrap(),
            Outcome::Truncated { bound: 2 }
        );
        assert_eq!(distance(b"abcd", empty, 4).unwrap().distance(), Some(4));
    }

    #[test]
    fn test_custom_accessor() {
        let a = b"Hello World";
        let b = b"hello, world";
        let index = |s: &[u8], i: usize| s[i].to_ascii_lowercase();
        let compare = |x: &u8, y: &u8| x == y;
        let accessor = Accessor::<u8, u8>::custom(&index, &compare);
        let mut differ = Differ::new();
        let outcome = differ
            .diff_with(Seq::whole(a), Seq::whole(b), &accessor)
            .unwrap();
        assert_eq!(outcome.distance(), Some(1));
        assert_eq!(
            differ.script().diffs().collect::<Vec<_>>(),
            vec![&Edit::new(EditOp::Insert, 5, 1)]
        );
    }

    #[test]
    fn test_custom_accessor_needs_no_equality_on_elements() {
        struct Tok {
            text: String,
        }
        let toks = |s: &str| -> Vec<Tok> {
            s.split(' ')
                .map(|w| Tok {
                    text: w.to_string(),
                })
                .collect()
        };
        let (a, b) = (toks("let x = 1 ;"), toks("let y = 1 ;"));
        let index = |s: &[Tok], i: usize| s[i].text.clone();
        let compare = |x: &String, y: &String| x == y;
        let accessor = Accessor::<Tok, String>::custom(&index, &compare);

        let mut differ = Differ::new();
        let outcome = differ
            .diff_with(Seq::whole(a.as_slice()), Seq::whole(b.as_slice()), &accessor)
            .unwrap();
        assert_eq!(outcome.distance(), Some(2));
        assert_eq!(
            differ.script().runs(),
            &[
                Edit::new(EditOp::Match, 0, 1),
                Edit::new(EditOp::Delete, 1, 1),
                Edit::new(EditOp::Insert, 1, 1),
                Edit::new(EditOp::Match, 2, 3),
            ]
        );
        let outcome = differ
            .distance_with(Seq::whole(a.as_slice()), Seq::whole(b.as_slice()), &accessor)
            .unwrap();
        assert_eq!(outcome, Outcome::Complete { distance: 2, runs: None });
    }

    #[test]
    fn test_lone_capability_is_rejected() {
        let compare = |x: &u8, y: &u8| x == y;
        let accessor = Accessor::<u8, u8>::new(None, Some(&compare));
        let mut differ = Differ::new();
        let err = differ
            .diff_with(Seq::whole(b"ab"), Seq::whole(b"ba"), &accessor)
            .unwrap_err();
        assert!(matches!(err, DiffError::InvalidArgument(_)));
    }

    #[test]
    fn test_scratch_is_reused() {
        let mut frontier = Frontier::with_capacity(0);
        let mut script = EditScript::new();
        let (a, b) = (b"the quick brown fox", b"a quick brown dog");
        diff(
            Seq::whole(a),
            Seq::whole(b),
            &Accessor::raw(),
            0,
            Some(&mut script),
            Some(&mut frontier),
        )
        .unwrap();
        let grown = frontier.slots();
        assert!(grown > 0);
        let first = script.clone();

        let outcome = diff(
            Seq::whole(a),
            Seq::whole(b),
            &Accessor::raw(),
            0,
            Some(&mut script),
            Some(&mut frontier),
        )
        .unwrap();
        assert_eq!(frontier.slots(), grown);
        assert_eq!(script, first);
        assert_eq!(outcome.distance(), Some(script.distance()));
    }

    #[test]
    fn test_random_against_reference() {
        let mut old_iter = create_test_bytes(114514, 10);
        let mut new_iter = create_test_bytes(1919810, 10);
        let mut differ = Differ::new();
        for _ in 0..20_000 {
            let old = old_iter.next().unwrap();
            let new = new_iter.next().unwrap();
            let expected = edit_distance(&old, &new);
            let outcome = differ.diff(&old, &new).unwrap();
            assert_eq!(outcome.distance(), Some(expected), "old: {:?}; new: {:?}", old, new);
            assert_valid_script(differ.script(), &old, &new);
            assert_eq!(
                distance(&old, &new, 0).unwrap().distance(),
                Some(expected),
                "old: {:?}; new: {:?}",
                old,
                new
            );
        }
    }

    #[test]
    fn test_random_longer_against_reference() {
        let mut old_iter = create_test_bytes(19260817, 50);
        let mut new_iter = create_test_bytes(998244353, 50);
        let mut differ = Differ::new();
        for _ in 0..2_000 {
            let old = old_iter.next().unwrap();
            let new = new_iter.next().unwrap();
            let expected = edit_distance(&old, &new);
            assert_eq!(differ.diff(&old, &new).unwrap().distance(), Some(expected));
            assert_valid_script(differ.script(), &old, &new);
        }
    }

    #[test]
    fn test_random_budget() {
        let mut old_iter = create_test_bytes(42, 20);
        let mut new_iter = create_test_bytes(4242, 20);
        for _ in 0..2_000 {
            let old = old_iter.next().unwrap();
            let new = new_iter.next().unwrap();
            let expected = edit_distance(&old, &new);
            if expected > 1 {
                let mut differ = Differ::new().with_max_distance(expected - 1);
                assert_eq!(
                    differ.diff(&old, &new).unwrap(),
                    Outcome::Truncated {
                        bound: expected - 1
                    }
                );
            }
            if expected > 0 {
                let mut differ = Differ::new().with_max_distance(expected);
                assert_eq!(differ.diff(&old, &new).unwrap().distance(), Some(expected));
                assert_valid_script(differ.script(), &old, &new);
            }
        }
    }
}
