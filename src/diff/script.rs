use crate::error::{DiffError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOp {
    /// Run shared by both sequences; `off` indexes A.
    Match,
    /// Run taken from B; `off` indexes B.
    Insert,
    /// Run dropped from A; `off` indexes A.
    Delete,
}

/// One run of an edit script. `off` is an absolute position in the base
/// buffer, so a diff over a sub-range reports positions inside that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edit {
    pub op: EditOp,
    pub off: usize,
    pub len: usize,
}

impl Edit {
    pub fn new(op: EditOp, off: usize, len: usize) -> Self {
        Self { op, off, len }
    }

    pub fn end(&self) -> usize {
        self.off + self.len
    }
}

/// Ordered, coalesced runs turning A into B.
///
/// No two adjacent runs share an [`EditOp`] and every run is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditScript {
    runs: Vec<Edit>,
}

impl EditScript {
    pub fn new() -> Self {
        Self { runs: Vec::new() }
    }

    pub fn runs(&self) -> &[Edit] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn clear(&mut self) {
        self.runs.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edit> {
        self.runs.iter()
    }

    /// Appends a run, extending the last one when it has the same op.
    pub fn push(&mut self, op: EditOp, off: usize, len: usize) {
        if len == 0 {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.op == op => last.len += len,
            _ => self.runs.push(Edit::new(op, off, len)),
        }
    }

    /// Makes room for the worst case of `2 * min(n, m) + 1` runs.
    pub(crate) fn reserve_for(&mut self, n: usize, m: usize) -> Result<()> {
        let worst = n.min(m).saturating_mul(2).saturating_add(1);
        self.runs
            .try_reserve(worst.saturating_sub(self.runs.len()))
            .map_err(|_| DiffError::AllocationFailure { requested: worst })
    }

    /// Runs that change something, i.e. everything except matches.
    pub fn diffs(&self) -> impl Iterator<Item = &Edit> {
        self.runs.iter().filter(|e| e.op != EditOp::Match)
    }

    pub fn is_identical(&self) -> bool {
        self.diffs().next().is_none()
    }

    /// Total inserted plus deleted length.
    pub fn distance(&self) -> usize {
        self.diffs().map(|e| e.len).sum()
    }

    pub fn matched(&self) -> usize {
        self.runs
            .iter()
            .filter(|e| e.op == EditOp::Match)
            .map(|e| e.len)
            .sum()
    }

    /// Rebuilds B by copying matches from `a`, skipping deletions and copying
    /// insertions from `b`. Offsets are read as absolute positions in the two
    /// buffers.
    pub fn replay<T: Clone>(&self, a: &[T], b: &[T]) -> Result<Vec<T>> {
        let mut out = Vec::new();
        for edit in &self.runs {
            let src = match edit.op {
                EditOp::Match => a,
                EditOp::Insert => b,
                EditOp::Delete => continue,
            };
            let run = src.get(edit.off..edit.end()).ok_or_else(|| {
                DiffError::invalid(format!(
                    "{:?} run {}+{} exceeds its sequence of {} elements",
                    edit.op,
                    edit.off,
                    edit.len,
                    src.len()
                ))
            })?;
            out.extend_from_slice(run);
        }
        Ok(out)
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a Edit;
    type IntoIter = std::slice::Iter<'a, Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.iter()
    }
}
