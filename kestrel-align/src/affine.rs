//! Global alignment with affine gap penalties.
//!
//! Three grids hold the best score ending in a match column (`M`), a gap in
//! `s2` (`Ix`) or a gap in `s1` (`Iy`). A gap run of length `l` costs
//! `open + (l - 1) * extend`. Gaps switch rows only through `M`.

use kestrel_core::Result;

use crate::engine::check_penalty;
use crate::scoring::{Scorer, GAP};
use crate::types::Alignment;

const NEG_INF: i32 = i32::MIN / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    M,
    Ix,
    Iy,
}

/// Index of the first maximum.
fn first_max(c: &[i32]) -> usize {
    let mut best = 0;
    for k in 1..c.len() {
        if c[k] > c[best] {
            best = k;
        }
    }
    best
}

/// Global alignment of `s1` and `s2` with gap-open and gap-extend penalties.
///
/// Ties prefer `M`, then `Ix`, then `Iy`; within a gap grid opening wins
/// over extending.
///
/// # Errors
///
/// Returns an error if either penalty is negative.
pub fn align_affine<S: Scorer + ?Sized>(s1: &[u8], s2: &[u8], scorer: &S, open: i32, extend: i32) -> Result<Alignment> {
    check_penalty("gap open", open)?;
    check_penalty("gap extend", extend)?;
    let (n, m) = (s1.len(), s2.len());
    let stride = m + 1;
    let size = (n + 1) * stride;

    let mut mg = vec![NEG_INF; size];
    let mut ix = vec![NEG_INF; size];
    let mut iy = vec![NEG_INF; size];
    let mut back_m = vec![State::M; size];
    let mut back_x = vec![State::M; size];
    let mut back_y = vec![State::M; size];

    mg[0] = 0;
    for i in 1..=n {
        let x = i * stride;
        ix[x] = -open - (i as i32 - 1) * extend;
        back_x[x] = if i == 1 { State::M } else { State::Ix };
    }
    for j in 1..=m {
        iy[j] = -open - (j as i32 - 1) * extend;
        back_y[j] = if j == 1 { State::M } else { State::Iy };
    }

    const FROM: [State; 3] = [State::M, State::Ix, State::Iy];
    for i in 1..=n {
        for j in 1..=m {
            let x = i * stride + j;
            let (diag, up, left) = (x - stride - 1, x - stride, x - 1);

            let c = [mg[diag], ix[diag], iy[diag]];
            let k = first_max(&c);
            mg[x] = c[k] + scorer.score(s1[i - 1], s2[j - 1]);
            back_m[x] = FROM[k];

            let c = [mg[up] - open, ix[up] - extend];
            let k = first_max(&c);
            ix[x] = c[k];
            back_x[x] = [State::M, State::Ix][k];

            let c = [mg[left] - open, iy[left] - extend];
            let k = first_max(&c);
            iy[x] = c[k];
            back_y[x] = [State::M, State::Iy][k];
        }
    }

    let last = size - 1;
    let c = [mg[last], ix[last], iy[last]];
    let k = first_max(&c);
    let score = c[k];
    let mut state = FROM[k];

    let (mut i, mut j) = (n, m);
    let mut t1 = Vec::with_capacity(n + m);
    let mut t2 = Vec::with_capacity(n + m);
    while i > 0 || j > 0 {
        let x = i * stride + j;
        let prev = match state {
            State::M => {
                t1.push(s1[i - 1]);
                t2.push(s2[j - 1]);
                i -= 1;
                j -= 1;
                back_m[x]
            }
            State::Ix => {
                t1.push(s1[i - 1]);
                t2.push(GAP);
                i -= 1;
                back_x[x]
            }
            State::Iy => {
                t1.push(GAP);
                t2.push(s2[j - 1]);
                j -= 1;
                back_y[x]
            }
        };
        state = prev;
    }
    t1.reverse();
    t2.reverse();
    Ok(Alignment {
        score,
        aligned1: t1,
        aligned2: t2,
    })
}
