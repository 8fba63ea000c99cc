use super::frontier::Frontier;
use super::script::{EditOp, EditScript};
use super::snake::{Search, find_middle_snake};
use crate::error::Result;

/// State shared by every sub-problem of one top-level diff.
///
/// `eq` compares absolute positions of A and B. `dmax` is exclusive: a
/// distance that reaches it is reported as exceeded.
pub(crate) struct Context<'s, F> {
    pub(crate) eq: F,
    pub(crate) frontier: &'s mut Frontier,
    pub(crate) script: Option<&'s mut EditScript>,
    pub(crate) dmax: isize,
}

impl<'s, F> Context<'s, F>
where
    F: Fn(usize, usize) -> bool,
{
    pub(crate) fn new(
        eq: F,
        frontier: &'s mut Frontier,
        script: Option<&'s mut EditScript>,
        dmax: isize,
    ) -> Self {
        Self {
            eq,
            frontier,
            script,
            dmax,
        }
    }

    pub(crate) fn edit(&mut self, op: EditOp, off: usize, len: usize) {
        if let Some(script) = self.script.as_deref_mut() {
            script.push(op, off, len);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Distance(usize),
    Exceeded,
}

enum Task {
    Solve {
        aoff: usize,
        n: usize,
        boff: usize,
        m: usize,
    },
    Match {
        off: usize,
        len: usize,
    },
}

/// Builds the script for `a[aoff..aoff+n]` against `b[boff..boff+m]` and
/// returns its edit distance.
///
/// Sub-problems are kept on an explicit stack (left half, snake, right half)
/// so highly dissimilar inputs cannot exhaust the call stack. Without a
/// script only the outermost distance is computed.
pub(crate) fn build<F>(
    ctx: &mut Context<'_, F>,
    aoff: usize,
    n: usize,
    boff: usize,
    m: usize,
) -> Result<Step>
where
    F: Fn(usize, usize) -> bool,
{
    let mut stack = vec![Task::Solve { aoff, n, boff, m }];
    let mut total = None;
    while let Some(task) = stack.pop() {
        match task {
            Task::Match { off, len } => ctx.edit(EditOp::Match, off, len),
            Task::Solve { aoff, n, boff, m } => match solve(ctx, aoff, n, boff, m, &mut stack)? {
                Step::Exceeded => return Ok(Step::Exceeded),
                Step::Distance(d) => {
                    total.get_or_insert(d);
                }
            },
        }
    }
    Ok(Step::Distance(total.unwrap_or(0)))
}

fn solve<F>(
    ctx: &mut Context<'_, F>,
    aoff: usize,
    n: usize,
    boff: usize,
    m: usize,
    stack: &mut Vec<Task>,
) -> Result<Step>
where
    F: Fn(usize, usize) -> bool,
{
    if n == 0 {
        ctx.edit(EditOp::Insert, boff, m);
        return Ok(Step::Distance(m));
    }
    if m == 0 {
        ctx.edit(EditOp::Delete, aoff, n);
        return Ok(Step::Distance(n));
    }

    let (d, ms) = match find_middle_snake(ctx, aoff, n, boff, m)? {
        Search::Exceeded => return Ok(Step::Exceeded),
        Search::Found { distance, .. } if distance >= ctx.dmax => return Ok(Step::Exceeded),
        Search::Found { distance, snake } => (distance as usize, snake),
    };
    if ctx.script.is_none() {
        return Ok(Step::Distance(d));
    }

    let (x, y, u, v) = (ms.x as usize, ms.y as usize, ms.u as usize, ms.v as usize);
    if d > 1 {
        stack.push(Task::Solve {
            aoff: aoff + u,
            n: n - u,
            boff: boff + v,
            m: m - v,
        });
        stack.push(Task::Match {
            off: aoff + x,
            len: u - x,
        });
        stack.push(Task::Solve {
            aoff,
            n: x,
            boff,
            m: y,
        });
        return Ok(Step::Distance(d));
    }

    // One edit left, at the near or far end of the longer side:
    //
    //   n > m   m > n
    //
    //     -       |
    //      \       \    x != u
    //       \       \
    //
    //     \       \
    //      \       \    x == u
    //       -       |
    if m > n {
        if x == u {
            ctx.edit(EditOp::Match, aoff, n);
            ctx.edit(EditOp::Insert, boff + (m - 1), 1);
        } else {
            ctx.edit(EditOp::Insert, boff, 1);
            ctx.edit(EditOp::Match, aoff, n);
        }
    } else if x == u {
        ctx.edit(EditOp::Match, aoff, m);
        ctx.edit(EditOp::Delete, aoff + (n - 1), 1);
    } else {
        ctx.edit(EditOp::Delete, aoff, 1);
        ctx.edit(EditOp::Match, aoff + 1, m);
    }
    Ok(Step::Distance(d))
}
