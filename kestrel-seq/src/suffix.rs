//! Suffix arrays by sorting, LCP arrays and multi-string longest common
//! substring.

use kestrel_core::{KestrelError, Result};

/// Start positions of the suffixes of `text` in lexicographic order.
pub fn suffix_array<T: Ord>(text: &[T]) -> Vec<usize> {
    let mut sa: Vec<usize> = (0..text.len()).collect();
    sa.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
    sa
}

/// Kasai LCP array: `lcp[i]` is the common prefix length of the suffixes at
/// `sa[i - 1]` and `sa[i]`; `lcp[0]` is zero.
pub fn lcp_array<T: Eq>(text: &[T], sa: &[usize]) -> Vec<usize> {
    let n = text.len();
    let mut rank = vec![0usize; n];
    for (i, &p) in sa.iter().enumerate() {
        rank[p] = i;
    }
    let mut lcp = vec![0usize; n];
    let mut h = 0usize;
    for p in 0..n {
        if rank[p] == 0 {
            h = 0;
            continue;
        }
        let q = sa[rank[p] - 1];
        while p + h < n && q + h < n && text[p + h] == text[q + h] {
            h += 1;
        }
        lcp[rank[p]] = h;
        h = h.saturating_sub(1);
    }
    lcp
}

/// Longest substring occurring at least twice in `text`. The
/// lexicographically smallest wins ties.
pub fn longest_repeat(text: &[u8]) -> &[u8] {
    let sa = suffix_array(text);
    let lcp = lcp_array(text, &sa);
    let mut best = (0, 0);
    for (i, &h) in lcp.iter().enumerate() {
        if h > best.1 {
            best = (sa[i], h);
        }
    }
    &text[best.0..best.0 + best.1]
}

/// Longest substring shared by every string.
///
/// The strings are joined with unique separators and the tagged suffixes
/// sorted; the answer is the best LCP over a window of suffixes covering all
/// strings. The lexicographically smallest substring wins ties.
///
/// # Errors
///
/// Returns an error if `strings` is empty.
pub fn longest_common_substring(strings: &[&[u8]]) -> Result<Vec<u8>> {
    if strings.is_empty() {
        return Err(KestrelError::InvalidInput(
            "no strings for common substring".into(),
        ));
    }
    if strings.len() == 1 {
        return Ok(strings[0].to_vec());
    }

    let mut joined: Vec<u32> = Vec::new();
    let mut owner: Vec<usize> = Vec::new();
    for (i, s) in strings.iter().enumerate() {
        joined.extend(s.iter().map(|&b| b as u32));
        joined.push(256 + i as u32);
        owner.extend(std::iter::repeat(i).take(s.len() + 1));
    }
    let sa = suffix_array(&joined);
    let lcp = lcp_array(&joined, &sa);

    let k = strings.len();
    let mut seen = vec![0usize; k];
    let mut covered = 0;
    let mut window: std::collections::VecDeque<(usize, usize)> = Default::default();
    let mut best = (0usize, 0usize);
    let mut lo = 0;
    for hi in 0..sa.len() {
        let o = owner[sa[hi]];
        if seen[o] == 0 {
            covered += 1;
        }
        seen[o] += 1;
        // sliding minimum of lcp[lo+1..=hi]
        if hi > lo {
            while window.back().map_or(false, |&(_, v)| v >= lcp[hi]) {
                window.pop_back();
            }
            window.push_back((hi, lcp[hi]));
        }
        while covered == k {
            while window.front().map_or(false, |&(i, _)| i <= lo) {
                window.pop_front();
            }
            let h = window.front().map_or(0, |&(_, v)| v);
            if h > best.1 {
                best = (sa[lo], h);
            }
            let o = owner[sa[lo]];
            seen[o] -= 1;
            if seen[o] == 0 {
                covered -= 1;
            }
            lo += 1;
        }
    }
    Ok(joined[best.0..best.0 + best.1]
        .iter()
        .map(|&c| c as u8)
        .collect())
}
