//! Distance matrices: validation, additivity and limb lengths.

use kestrel_core::{KestrelError, Result};
use kestrel_seq::types::hamming8;
use kestrel_seq::Dna8;

const EPS: f64 = 1e-9;

/// Equality up to a relative tolerance of `1e-9`.
pub(crate) fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPS * a.abs().max(b.abs()).max(1.0)
}

/// A square matrix of pairwise distances, stored row-major.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Wrap `n * n` row-major values.
    ///
    /// # Errors
    ///
    /// Returns [`KestrelError::ShapeViolation`] if `data` does not hold
    /// exactly `n * n` values.
    pub fn new(n: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != n * n {
            return Err(KestrelError::ShapeViolation(format!(
                "{} values cannot fill a {}x{} matrix",
                data.len(),
                n,
                n
            )));
        }
        Ok(Self { n, data })
    }

    /// Build from rows.
    ///
    /// # Errors
    ///
    /// Returns [`KestrelError::ShapeViolation`] if the rows are not square.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != n {
                return Err(KestrelError::ShapeViolation(format!(
                    "row {} has {} entries, expected {}",
                    i,
                    r.len(),
                    n
                )));
            }
            data.extend_from_slice(r);
        }
        Ok(Self { n, data })
    }

    /// All-zero `n x n` matrix.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Pairwise Hamming distances between equal-length sequences.
    ///
    /// # Errors
    ///
    /// Returns [`KestrelError::LengthMismatch`] if the lengths differ.
    pub fn from_hamming(seqs: &[Dna8]) -> Result<Self> {
        let mut m = Self::zeros(seqs.len());
        for i in 0..seqs.len() {
            for j in i + 1..seqs.len() {
                if seqs[i].len() != seqs[j].len() {
                    return Err(KestrelError::length_mismatch(seqs[i].len(), seqs[j].len()));
                }
                m.set(i, j, hamming8(&seqs[i], &seqs[j]) as f64);
            }
        }
        Ok(m)
    }

    /// Number of rows.
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Set `(i, j)` and `(j, i)`.
    pub fn set(&mut self, i: usize, j: usize, d: f64) {
        self.data[i * self.n + j] = d;
        self.data[j * self.n + i] = d;
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Check that the matrix is a metric: zero diagonal, non-negative,
    /// symmetric and obeying the triangle inequality.
    ///
    /// # Errors
    ///
    /// Returns [`KestrelError::ShapeViolation`] naming the first offending
    /// entry. NaN anywhere is a violation.
    pub fn validate(&self) -> Result<()> {
        let n = self.n;
        for i in 0..n {
            for j in 0..n {
                let d = self.get(i, j);
                if d.is_nan() {
                    return Err(KestrelError::ShapeViolation(format!("NaN at ({}, {})", i, j)));
                }
                if d < 0.0 {
                    return Err(KestrelError::ShapeViolation(format!(
                        "negative distance {} at ({}, {})",
                        d, i, j
                    )));
                }
                if i == j && d != 0.0 {
                    return Err(KestrelError::ShapeViolation(format!(
                        "non-zero diagonal {} at {}",
                        d, i
                    )));
                }
                if !close(d, self.get(j, i)) {
                    return Err(KestrelError::ShapeViolation(format!(
                        "asymmetric at ({}, {})",
                        i, j
                    )));
                }
            }
        }
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    let direct = self.get(i, k);
                    let via = self.get(i, j) + self.get(j, k);
                    if direct > via && !close(direct, via) {
                        return Err(KestrelError::ShapeViolation(format!(
                            "triangle inequality fails for ({}, {}, {})",
                            i, j, k
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Four-point condition: for every quadruple the two largest of the
    /// three pair sums are equal. Matrices that fail [`validate`] are not
    /// additive.
    ///
    /// [`validate`]: DistanceMatrix::validate
    pub fn is_additive(&self) -> bool {
        if self.validate().is_err() {
            return false;
        }
        let n = self.n;
        for i in 0..n {
            for j in i + 1..n {
                for k in j + 1..n {
                    for l in k + 1..n {
                        let mut s = [
                            self.get(i, j) + self.get(k, l),
                            self.get(i, k) + self.get(j, l),
                            self.get(i, l) + self.get(j, k),
                        ];
                        s.sort_by(f64::total_cmp);
                        if !close(s[1], s[2]) {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    /// Length of the edge joining leaf `j` to the tree fitted to this
    /// (additive) matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if `j` is out of range or the matrix has fewer than
    /// three rows.
    pub fn limb_length(&self, j: usize) -> Result<f64> {
        if self.n < 3 {
            return Err(KestrelError::InvalidInput(format!(
                "limb length needs at least 3 leaves, got {}",
                self.n
            )));
        }
        if j >= self.n {
            return Err(KestrelError::InvalidInput(format!(
                "leaf {} out of range ({})",
                j, self.n
            )));
        }
        Ok(self.limb_length_within(j, self.n - 1))
    }

    /// Limb length of `j` among leaves `0..=last`. Needs three leaves.
    pub(crate) fn limb_length_within(&self, j: usize, last: usize) -> f64 {
        let mut best = f64::INFINITY;
        for i in (0..=last).filter(|&i| i != j) {
            for k in (i + 1..=last).filter(|&k| k != j) {
                let v = (self.get(i, j) + self.get(j, k) - self.get(i, k)) / 2.0;
                if v < best {
                    best = v;
                }
            }
        }
        best
    }
}
