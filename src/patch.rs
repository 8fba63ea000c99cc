use crate::{
    diff::{Differ, EditOp, EditScript},
    error::{DiffError, Result},
};

/// A self-contained difference: the replaced regions together with the
/// elements they removed and inserted, enough to go from old to new and
/// back without the other side at hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch<T> {
    old_text: Vec<T>,
    new_text: Vec<T>,
    replaces: Vec<Replace>,
    old_len: usize,
    new_len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Replace {
    old_idx: usize,
    old_len: usize,
    new_idx: usize,
    new_len: usize,
}

impl<T: Clone + PartialEq> Patch<T> {
    pub fn from_compare(old: &[T], new: &[T]) -> Result<Self> {
        let mut differ = Differ::new();
        differ.diff(old, new)?;
        Self::from_script(differ.script(), old, new)
    }

    /// Collects each stretch of consecutive deletions and insertions of a
    /// complete whole-slice script into one replaced region.
    pub fn from_script(script: &EditScript, old: &[T], new: &[T]) -> Result<Self> {
        let mut patch = Self {
            old_text: Vec::new(),
            new_text: Vec::new(),
            replaces: Vec::new(),
            old_len: old.len(),
            new_len: new.len(),
        };
        let mut old_ptr = 0;
        let mut new_ptr = 0;
        let mut open: Option<Replace> = None;
        for edit in script {
            match edit.op {
                EditOp::Match => {
                    if let Some(replace) = open.take() {
                        patch.replaces.push(replace);
                    }
                    old_ptr += edit.len;
                    new_ptr += edit.len;
                }
                EditOp::Delete | EditOp::Insert => {
                    let (src, start) = match edit.op {
                        EditOp::Delete => (old, old_ptr),
                        _ => (new, new_ptr),
                    };
                    let run = src.get(start..start + edit.len).ok_or_else(|| {
                        DiffError::invalid("edit script does not describe these sequences")
                    })?;
                    let replace = open.get_or_insert(Replace {
                        old_idx: old_ptr,
                        old_len: 0,
                        new_idx: new_ptr,
                        new_len: 0,
                    });
                    if edit.op == EditOp::Delete {
                        patch.old_text.extend_from_slice(run);
                        replace.old_len += edit.len;
                        old_ptr += edit.len;
                    } else {
                        patch.new_text.extend_from_slice(run);
                        replace.new_len += edit.len;
                        new_ptr += edit.len;
                    }
                }
            }
        }
        if let Some(replace) = open {
            patch.replaces.push(replace);
        }
        if old_ptr != old.len() || new_ptr != new.len() {
            return Err(DiffError::invalid(
                "edit script does not cover both sequences",
            ));
        }
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.replaces.is_empty()
    }

    /// Number of replaced regions.
    pub fn regions(&self) -> usize {
        self.replaces.len()
    }

    pub fn patch(&self, old: &[T]) -> Result<Vec<T>> {
        if old.len() != self.old_len {
            return Err(DiffError::invalid(format!(
                "patch expects {} old elements, got {}",
                self.old_len,
                old.len()
            )));
        }
        let mut patched = Vec::with_capacity(self.new_len);
        let mut old_ptr = 0;
        let mut new_text_ptr = 0;
        for replace in &self.replaces {
            patched.extend_from_slice(&old[old_ptr..replace.old_idx]);
            patched.extend_from_slice(&self.new_text[new_text_ptr..new_text_ptr + replace.new_len]);
            old_ptr = replace.old_idx + replace.old_len;
            new_text_ptr += replace.new_len;
        }
        patched.extend_from_slice(&old[old_ptr..]);
        Ok(patched)
    }

    pub fn revert(&self, new: &[T]) -> Result<Vec<T>> {
        if new.len() != self.new_len {
            return Err(DiffError::invalid(format!(
                "revert expects {} new elements, got {}",
                self.new_len,
                new.len()
            )));
        }
        let mut reverted = Vec::with_capacity(self.old_len);
        let mut new_ptr = 0;
        let mut old_text_ptr = 0;
        for replace in &self.replaces {
            reverted.extend_from_slice(&new[new_ptr..replace.new_idx]);
            reverted.extend_from_slice(&self.old_text[old_text_ptr..old_text_ptr + replace.old_len]);
            new_ptr = replace.new_idx + replace.new_len;
            old_text_ptr += replace.old_len;
        }
        reverted.extend_from_slice(&new[new_ptr..]);
        Ok(reverted)
    }
}
