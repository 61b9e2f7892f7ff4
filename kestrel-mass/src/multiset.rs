//! Multisets of integer masses.

use std::collections::BTreeMap;

/// Masses with multiplicities, ordered by mass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MassCounts {
    counts: BTreeMap<u32, usize>,
}

impl MassCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one copy of `mass`.
    pub fn add(&mut self, mass: u32) {
        self.add_count(mass, 1);
    }

    /// Add `count` copies of `mass`.
    pub fn add_count(&mut self, mass: u32, count: usize) {
        if count > 0 {
            *self.counts.entry(mass).or_insert(0) += count;
        }
    }

    /// Remove `other` from `self`, clamping multiplicities at zero.
    pub fn subtract(&mut self, other: &MassCounts) {
        for (&m, &c) in &other.counts {
            if let Some(have) = self.counts.get_mut(&m) {
                if *have <= c {
                    self.counts.remove(&m);
                } else {
                    *have -= c;
                }
            }
        }
    }

    /// Whether every mass of `self` occurs in `other` at least as often.
    pub fn is_subset(&self, other: &MassCounts) -> bool {
        self.counts.iter().all(|(m, &c)| other.get(*m) >= c)
    }

    /// Size of the multiset intersection.
    pub fn intersection_cardinality(&self, other: &MassCounts) -> usize {
        let (small, large) = if self.counts.len() <= other.counts.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.counts.iter().map(|(m, &c)| c.min(large.get(*m))).sum()
    }

    /// Multiplicity of `mass`.
    pub fn get(&self, mass: u32) -> usize {
        self.counts.get(&mass).copied().unwrap_or(0)
    }

    /// Total number of masses counting multiplicity.
    pub fn len(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of distinct masses.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// `(mass, multiplicity)` pairs in ascending mass order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.counts.iter().map(|(&m, &c)| (m, c))
    }
}

impl FromIterator<u32> for MassCounts {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut mc = MassCounts::new();
        for m in iter {
            mc.add(m);
        }
        mc
    }
}

impl<'a> FromIterator<&'a u32> for MassCounts {
    fn from_iter<I: IntoIterator<Item = &'a u32>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_lengths() {
        let mc: MassCounts = [0, 113, 113, 128].iter().collect();
        assert_eq!(mc.get(113), 2);
        assert_eq!(mc.get(57), 0);
        assert_eq!(mc.len(), 4);
        assert_eq!(mc.distinct(), 3);
        assert_eq!(mc.iter().collect::<Vec<_>>(), vec![(0, 1), (113, 2), (128, 1)]);
    }

    #[test]
    fn subset_and_intersection() {
        let spec: MassCounts = [0, 113, 114, 128, 129, 242, 242, 257].iter().collect();
        let a: MassCounts = [0, 113, 242, 242].iter().collect();
        let b: MassCounts = [0, 113, 113, 300].iter().collect();
        assert!(a.is_subset(&spec));
        assert!(!b.is_subset(&spec));
        assert!(MassCounts::new().is_subset(&spec));
        assert_eq!(b.intersection_cardinality(&spec), 2);
        assert_eq!(spec.intersection_cardinality(&b), 2);
        assert_eq!(a.intersection_cardinality(&spec), 4);
    }

    #[test]
    fn subtract_clamps() {
        let mut mc: MassCounts = [57, 57, 71].iter().collect();
        let other: MassCounts = [57, 71, 71, 99].iter().collect();
        mc.subtract(&other);
        assert_eq!(mc.iter().collect::<Vec<_>>(), vec![(57, 1)]);
        mc.add_count(99, 0);
        assert_eq!(mc.distinct(), 1);
    }
}
