use super::frontier::Dir;
use super::ses::Context;
use crate::error::{DiffError, Result};

/// A diagonal run some shortest path crosses: `(x, y)` is where it starts
/// after the last edit, `(u, v)` where greedy matching left it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MiddleSnake {
    pub x: isize,
    pub y: isize,
    pub u: isize,
    pub v: isize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Search {
    Found { distance: isize, snake: MiddleSnake },
    Exceeded,
}

/// Runs the forward and reverse searches over `a[aoff..aoff+n]` and
/// `b[boff..boff+m]` until their frontiers overlap.
///
/// Both `n` and `m` must be non-zero. The neighbour chosen on each diagonal
/// decides which of several minimal scripts comes out, so the comparisons
/// below are order-sensitive.
pub(crate) fn find_middle_snake<F>(
    ctx: &mut Context<'_, F>,
    aoff: usize,
    n: usize,
    boff: usize,
    m: usize,
) -> Result<Search>
where
    F: Fn(usize, usize) -> bool,
{
    let (n, m) = (n as isize, m as isize);
    let delta = n - m;
    let odd = delta & 1 == 1;
    let mid = (n + m) / 2 + (odd as isize);
    let eq = |x: isize, y: isize| (ctx.eq)(aoff + x as usize, boff + y as usize);

    ctx.frontier.set(1, Dir::Forward, 0)?;
    ctx.frontier.set(delta - 1, Dir::Reverse, n)?;

    let mut ms = MiddleSnake::default();
    for d in 0..=mid {
        if 2 * d - 1 >= ctx.dmax {
            return Ok(Search::Exceeded);
        }

        let mut k = d;
        while k >= -d {
            let fv = &ctx.frontier;
            let mut x = if k == -d || (k != d && fv.fv(k - 1) < fv.fv(k + 1)) {
                fv.fv(k + 1)
            } else {
                fv.fv(k - 1) + 1
            };
            let mut y = x - k;

            ms.x = x;
            ms.y = y;
            while x < n && y < m && eq(x, y) {
                x += 1;
                y += 1;
            }
            ctx.frontier.set(k, Dir::Forward, x)?;

            if odd && k >= delta - (d - 1) && k <= delta + (d - 1) && x >= ctx.frontier.rv(k) {
                ms.u = x;
                ms.v = y;
                log::trace!("middle snake {:?} at depth {} (forward)", ms, d);
                return Ok(Search::Found {
                    distance: 2 * d - 1,
                    snake: ms,
                });
            }
            k -= 2;
        }

        let mut k = d;
        while k >= -d {
            let kr = delta + k;
            let rv = &ctx.frontier;
            let mut x = if k == d || (k != -d && rv.rv(kr - 1) < rv.rv(kr + 1)) {
                rv.rv(kr - 1)
            } else {
                rv.rv(kr + 1) - 1
            };
            let mut y = x - kr;

            ms.u = x;
            ms.v = y;
            while x > 0 && y > 0 && eq(x - 1, y - 1) {
                x -= 1;
                y -= 1;
            }
            ctx.frontier.set(kr, Dir::Reverse, x)?;

            if !odd && kr >= -d && kr <= d && x <= ctx.frontier.fv(kr) {
                ms.x = x;
                ms.y = y;
                log::trace!("middle snake {:?} at depth {} (reverse)", ms, d);
                return Ok(Search::Found {
                    distance: 2 * d,
                    snake: ms,
                });
            }
            k -= 2;
        }
    }

    // Only reachable when the compare capability is not an equivalence.
    Err(DiffError::SearchExhausted {
        n: n as usize,
        m: m as usize,
    })
}
