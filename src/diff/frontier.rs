use crate::error::{DiffError, Result};

/// Search direction of a frontier value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dir {
    Forward = 0,
    Reverse = 1,
}

/// Furthest-reaching x per diagonal, for both search directions, packed
/// into one growable buffer.
///
/// Diagonal `k` in direction `r` lives at `-4k + r` when `k <= 0` and at
/// `4k + r - 2` otherwise, so both signs of `k` and both directions
/// interleave without collisions. The buffer is reused by every sub-problem
/// of a call (and across calls, when owned by a [`Differ`](super::Differ));
/// it only ever grows.
#[derive(Debug, Default, Clone)]
pub struct Frontier {
    buf: Vec<isize>,
}

fn slot(k: isize, dir: Dir) -> usize {
    let r = dir as isize;
    let j = if k <= 0 { -k * 4 + r } else { k * 4 + r - 2 };
    j as usize
}

impl Frontier {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(diagonals: usize) -> Self {
        Self {
            buf: Vec::with_capacity(diagonals.saturating_mul(4)),
        }
    }

    /// Number of slots currently backed by storage.
    pub fn slots(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn get(&self, k: isize, dir: Dir) -> isize {
        // Slots never written read as zero.
        self.buf.get(slot(k, dir)).copied().unwrap_or(0)
    }

    pub(crate) fn set(&mut self, k: isize, dir: Dir, val: isize) -> Result<()> {
        let j = slot(k, dir);
        if j >= self.buf.len() {
            self.grow(j + 1)?;
        }
        self.buf[j] = val;
        Ok(())
    }

    pub(crate) fn fv(&self, k: isize) -> isize {
        self.get(k, Dir::Forward)
    }

    pub(crate) fn rv(&self, k: isize) -> isize {
        self.get(k, Dir::Reverse)
    }

    fn grow(&mut self, min_len: usize) -> Result<()> {
        let target = min_len.max(self.buf.len().saturating_mul(2)).max(16);
        self.buf
            .try_reserve(target - self.buf.len())
            .map_err(|_| DiffError::AllocationFailure { requested: target })?;
        self.buf.resize(target, 0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_disjoint() {
        let mut seen = std::collections::HashSet::new();
        for k in -50..=50 {
            for dir in [Dir::Forward, Dir::Reverse] {
                assert!(seen.insert(slot(k, dir)), "k={} dir={:?}", k, dir);
            }
        }
    }

    #[test]
    fn test_packing_matches_layout() {
        assert_eq!(slot(0, Dir::Forward), 0);
        assert_eq!(slot(0, Dir::Reverse), 1);
        assert_eq!(slot(1, Dir::Forward), 2);
        assert_eq!(slot(1, Dir::Reverse), 3);
        assert_eq!(slot(-1, Dir::Forward), 4);
        assert_eq!(slot(-1, Dir::Reverse), 5);
        assert_eq!(slot(2, Dir::Forward), 6);
    }

    #[test]
    fn test_set_grows_and_get_reads_back() {
        let mut frontier = Frontier::new();
        assert_eq!(frontier.slots(), 0);
        assert_eq!(frontier.fv(-7), 0);
        frontier.set(-7, Dir::Reverse, 42).unwrap();
        frontier.set(300, Dir::Forward, 9).unwrap();
        assert_eq!(frontier.rv(-7), 42);
        assert_eq!(frontier.fv(300), 9);
        assert_eq!(frontier.fv(-7), 0);
        assert!(frontier.slots() > slot(300, Dir::Forward));
    }

    #[test]
    fn test_growth_never_truncates() {
        let mut frontier = Frontier::new();
        frontier.set(40, Dir::Forward, 1).unwrap();
        let cap = frontier.slots();
        frontier.set(1, Dir::Forward, 2).unwrap();
        assert_eq!(frontier.slots(), cap);
        assert_eq!(frontier.fv(40), 1);
    }
}
