//! Knuth-Morris-Pratt exact matching.

use crate::types::Seq;

/// KMP failure function: `fail[i]` is the length of the longest proper
/// prefix of `pattern[..=i]` that is also a suffix of it.
pub fn kmp_failure(pattern: &[u8]) -> Vec<usize> {
    let m = pattern.len();
    let mut fail = vec![0usize; m];
    let mut k = 0usize;
    for i in 1..m {
        while k > 0 && pattern[k] != pattern[i] {
            k = fail[k - 1];
        }
        if pattern[k] == pattern[i] {
            k += 1;
        }
        fail[i] = k;
    }
    fail
}

/// All overlapping occurrences of `pattern` in `text`, in order.
pub fn kmp_all_index(text: &[u8], pattern: &[u8]) -> Vec<usize> {
    let m = pattern.len();
    if m == 0 || m > text.len() {
        return vec![];
    }
    let fail = kmp_failure(pattern);
    let mut results = Vec::new();
    let mut q = 0usize;
    for (i, &c) in text.iter().enumerate() {
        while q > 0 && pattern[q] != c {
            q = fail[q - 1];
        }
        if pattern[q] == c {
            q += 1;
        }
        if q == m {
            results.push(i + 1 - m);
            q = fail[q - 1];
        }
    }
    results
}

impl Seq {
    /// Overlapping occurrences of `m` found with the KMP automaton.
    pub fn kmp_all_index(&self, m: &[u8]) -> Vec<usize> {
        kmp_all_index(self, m)
    }
}
