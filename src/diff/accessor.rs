use crate::error::{DiffError, Result};

/// Maps a sequence buffer and an absolute position to a comparable element.
pub type IndexFn<'f, T, E> = dyn Fn(&[T], usize) -> E + 'f;
/// Equality between two element handles produced by an [`IndexFn`].
pub type CompareFn<'f, E> = dyn Fn(&E, &E) -> bool + 'f;

/// A read-only window `[offset, offset + len)` over a caller-owned buffer.
#[derive(Debug)]
pub struct Seq<'a, T> {
    base: &'a [T],
    offset: usize,
    len: usize,
}

impl<T> Clone for Seq<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Seq<'_, T> {}

impl<'a, T> Seq<'a, T> {
    pub fn new(base: &'a [T], offset: usize, len: usize) -> Result<Self> {
        match offset.checked_add(len) {
            Some(end) if end <= base.len() => Ok(Self { base, offset, len }),
            _ => Err(DiffError::invalid(format!(
                "range {}+{} is out of bounds for a sequence of {} elements",
                offset,
                len,
                base.len()
            ))),
        }
    }

    pub fn whole(base: &'a [T]) -> Self {
        Self {
            base,
            offset: 0,
            len: base.len(),
        }
    }

    pub fn base(&self) -> &'a [T] {
        self.base
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &'a [T] {
        &self.base[self.offset..self.offset + self.len]
    }
}

impl<'a, T> From<&'a [T]> for Seq<'a, T> {
    fn from(base: &'a [T]) -> Self {
        Self::whole(base)
    }
}

/// How elements of the two sequences are fetched and compared.
///
/// Either both capabilities are present, or neither is. Without them the
/// elements of the buffers are compared directly with `PartialEq`, which for
/// byte buffers is plain byte equality; only that fallback needs the bound,
/// so [`Accessor::custom`] works for any element type.
pub struct Accessor<'f, T, E = ()> {
    index: Option<&'f IndexFn<'f, T, E>>,
    compare: Option<&'f CompareFn<'f, E>>,
    raw: Option<fn(&T, &T) -> bool>,
}

/// The equality a diff runs with, once the capabilities are validated.
pub(crate) enum Equality<'f, T, E> {
    Raw(fn(&T, &T) -> bool),
    Custom(&'f IndexFn<'f, T, E>, &'f CompareFn<'f, E>),
}

fn raw_eq<T: PartialEq>(x: &T, y: &T) -> bool {
    x == y
}

impl<'f, T: PartialEq> Accessor<'f, T> {
    pub fn raw() -> Self {
        Self {
            index: None,
            compare: None,
            raw: Some(raw_eq::<T>),
        }
    }
}

impl<'f, T: PartialEq, E> Accessor<'f, T, E> {
    /// Accepts any combination; a lone capability is rejected when the
    /// accessor is used, and neither falls back to `PartialEq`.
    pub fn new(index: Option<&'f IndexFn<'f, T, E>>, compare: Option<&'f CompareFn<'f, E>>) -> Self {
        Self {
            index,
            compare,
            raw: Some(raw_eq::<T>),
        }
    }
}

impl<'f, T, E> Accessor<'f, T, E> {
    pub fn custom(index: &'f IndexFn<'f, T, E>, compare: &'f CompareFn<'f, E>) -> Self {
        Self {
            index: Some(index),
            compare: Some(compare),
            raw: None,
        }
    }

    pub(crate) fn equality(&self) -> Result<Equality<'f, T, E>> {
        match (self.index, self.compare) {
            (Some(index), Some(compare)) => Ok(Equality::Custom(index, compare)),
            (None, None) => self.raw.map(Equality::Raw).ok_or_else(|| {
                DiffError::invalid("elements without equality need an index and a compare capability")
            }),
            (Some(_), None) => Err(DiffError::invalid(
                "an index capability was supplied without a compare capability",
            )),
            (None, Some(_)) => Err(DiffError::invalid(
                "a compare capability was supplied without an index capability",
            )),
        }
    }
}

impl<T, E> std::fmt::Debug for Accessor<'_, T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accessor")
            .field("index", &self.index.is_some())
            .field("compare", &self.compare.is_some())
            .field("raw", &self.raw.is_some())
            .finish()
    }
}
