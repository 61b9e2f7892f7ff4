//! Linear-space global alignment.
//!
//! Divide and conquer over the middle column of `s2`: forward and reverse
//! score columns locate a middle node and the edge leaving it, and the two
//! sub-rectangles on either side are solved the same way. Pending work is an
//! explicit stack so output is emitted left to right.

use std::ops::Range;

use kestrel_core::Result;

use crate::engine::{check_penalty, Grid};
use crate::scoring::{linear_gap_score, Scorer, GAP};
use crate::types::{Alignment, Mode};

enum Task {
    Solve { a: Range<usize>, b: Range<usize> },
    Emit(u8, u8),
}

/// Global scores of `a[..i]` against all of `b`, for every `i`.
///
/// With `reverse` set both slices are read back to front.
fn last_column<S: Scorer + ?Sized>(a: &[u8], b: &[u8], reverse: bool, scorer: &S, indel: i32) -> Vec<i32> {
    let at = |s: &[u8], i: usize| if reverse { s[s.len() - 1 - i] } else { s[i] };
    let mut col: Vec<i32> = (0..=a.len() as i32).map(|i| -indel * i).collect();
    let mut next = vec![0i32; a.len() + 1];
    for j in 0..b.len() {
        let bj = at(b, j);
        next[0] = col[0] - indel;
        for i in 1..=a.len() {
            let g2 = next[i - 1] - indel;
            let g1 = col[i] - indel;
            let mm = col[i - 1] + scorer.score(at(a, i - 1), bj);
            next[i] = g2.max(g1).max(mm);
        }
        std::mem::swap(&mut col, &mut next);
    }
    col
}

/// Global alignment in memory linear in `|s1| + |s2|`.
///
/// The score always equals [`Mode::Global`] scoring; the alignment itself may
/// differ from the full-grid traceback among equally scoring ones.
///
/// # Errors
///
/// Returns an error if `indel` is negative.
pub fn align_linear_space<S: Scorer + ?Sized>(s1: &[u8], s2: &[u8], scorer: &S, indel: i32) -> Result<Alignment> {
    check_penalty("indel", indel)?;
    let cap = s1.len() + s2.len();
    let mut t1 = Vec::with_capacity(cap);
    let mut t2 = Vec::with_capacity(cap);
    let mut stack = vec![Task::Solve {
        a: 0..s1.len(),
        b: 0..s2.len(),
    }];

    while let Some(task) = stack.pop() {
        let (ar, br) = match task {
            Task::Emit(x, y) => {
                t1.push(x);
                t2.push(y);
                continue;
            }
            Task::Solve { a, b } => (a, b),
        };
        let (a, b) = (&s1[ar.clone()], &s2[br.clone()]);
        if a.is_empty() {
            t1.extend(std::iter::repeat(GAP).take(b.len()));
            t2.extend_from_slice(b);
            continue;
        }
        if b.is_empty() {
            t1.extend_from_slice(a);
            t2.extend(std::iter::repeat(GAP).take(a.len()));
            continue;
        }
        if b.len() == 1 {
            let grid = Grid::fill_unchecked(Mode::Global, a, b, scorer, indel);
            let sub = grid.traceback(grid.end());
            t1.extend_from_slice(&sub.aligned1);
            t2.extend_from_slice(&sub.aligned2);
            continue;
        }

        let n = a.len();
        let mc = b.len() / 2;
        let fwd = last_column(a, &b[..mc], false, scorer, indel);
        let rev = last_column(a, &b[mc..], true, scorer, indel);
        let mut mi = 0;
        for i in 1..=n {
            if fwd[i] + rev[n - i] > fwd[mi] + rev[n - mi] {
                mi = i;
            }
        }

        // middle edge as (score, rows consumed, columns consumed); ties go
        // to the gap in s2, then the gap in s1
        let past = last_column(a, &b[mc + 1..], true, scorer, indel);
        let mut edge = (fwd[mi] - indel + past[n - mi], 0, 1);
        if mi < n {
            let g2 = fwd[mi] - indel + rev[n - mi - 1];
            if g2 >= edge.0 {
                edge = (g2, 1, 0);
            }
            let mm = fwd[mi] + scorer.score(a[mi], b[mc]) + past[n - mi - 1];
            if mm > edge.0 {
                edge = (mm, 1, 1);
            }
        }
        let (_, da, db) = edge;
        log::trace!(
            "split rows {:?} cols {:?} at ({}, {}), stack depth {}",
            ar,
            br,
            ar.start + mi,
            br.start + mc,
            stack.len()
        );

        let x = if da == 1 { a[mi] } else { GAP };
        let y = if db == 1 { b[mc] } else { GAP };
        stack.push(Task::Solve {
            a: ar.start + mi + da..ar.end,
            b: br.start + mc + db..br.end,
        });
        stack.push(Task::Emit(x, y));
        stack.push(Task::Solve {
            a: ar.start..ar.start + mi,
            b: br.start..br.start + mc,
        });
    }

    let score = linear_gap_score(&t1, &t2, scorer, indel)?;
    Ok(Alignment {
        score,
        aligned1: t1,
        aligned2: t2,
    })
}
