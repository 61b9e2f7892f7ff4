//! Generic case-preserving sequence type.
//!
//! [`ValidatedSeq<A>`] is a newtype over `Vec<u8>` parameterized by an
//! [`Alphabet`] marker type. Construction checks every byte once; bytes are
//! stored exactly as given, so upper and lower case coexist and the DNA8 bit
//! helpers can rely on the alphabet after construction.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Deref, Range};

use kestrel_core::{KestrelError, Sequence, Summarizable};

use crate::alphabet::Alphabet;

/// A sequence whose bytes all belong to alphabet `A`.
#[derive(Clone)]
pub struct ValidatedSeq<A: Alphabet> {
    data: Vec<u8>,
    _alphabet: PhantomData<A>,
}

impl<A: Alphabet> ValidatedSeq<A> {
    /// Create a sequence from raw bytes, checking every byte against `A`.
    pub fn new(bytes: impl AsRef<[u8]>) -> kestrel_core::Result<Self> {
        let data = bytes.as_ref().to_vec();
        if let Some((i, &b)) = data.iter().enumerate().find(|(_, &b)| !A::is_valid(b)) {
            return Err(KestrelError::InvalidInput(format!(
                "invalid {} byte '{}' (0x{:02X}) at position {}",
                A::NAME,
                b.escape_ascii(),
                b,
                i
            )));
        }
        Ok(Self::from_validated(data))
    }

    /// Create a sequence from bytes already known to belong to `A`.
    pub(crate) fn from_validated(data: Vec<u8>) -> Self {
        Self {
            data,
            _alphabet: PhantomData,
        }
    }

    /// Mutable access for operations that map the alphabet onto itself.
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the sequence and return the inner byte vector.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Copy of the bytes in `range`, still known to belong to `A`. `None`
    /// when the range is out of bounds.
    pub fn subseq(&self, range: Range<usize>) -> Option<Self> {
        self.data.get(range).map(|b| Self::from_validated(b.to_vec()))
    }

    /// The sequence as text. Non-UTF-8 bytes are replaced.
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

impl<A: Alphabet> Default for ValidatedSeq<A> {
    fn default() -> Self {
        Self::from_validated(Vec::new())
    }
}

impl<A: Alphabet> Deref for ValidatedSeq<A> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl<A: Alphabet> AsRef<[u8]> for ValidatedSeq<A> {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl<A: Alphabet> Sequence for ValidatedSeq<A> {
    fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl<A: Alphabet> Summarizable for ValidatedSeq<A> {
    fn summary(&self) -> String {
        let preview_len = self.data.len().min(20);
        let preview = String::from_utf8_lossy(&self.data[..preview_len]);
        if self.data.len() > 20 {
            format!("{} sequence ({} bp): {}...", A::NAME, self.data.len(), preview)
        } else {
            format!("{} sequence ({} bp): {}", A::NAME, self.data.len(), preview)
        }
    }
}

impl<A: Alphabet> fmt::Debug for ValidatedSeq<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(\"{}\")", A::NAME, String::from_utf8_lossy(&self.data))
    }
}

impl<A: Alphabet> fmt::Display for ValidatedSeq<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.data))
    }
}

impl<A: Alphabet> PartialEq for ValidatedSeq<A> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<A: Alphabet> Eq for ValidatedSeq<A> {}

impl<A: Alphabet> PartialOrd for ValidatedSeq<A> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: Alphabet> Ord for ValidatedSeq<A> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.data.cmp(&other.data)
    }
}

impl<A: Alphabet> Hash for ValidatedSeq<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.hash(state);
    }
}

impl<A: Alphabet> std::str::FromStr for ValidatedSeq<A> {
    type Err = KestrelError;

    fn from_str(s: &str) -> kestrel_core::Result<Self> {
        Self::new(s)
    }
}

#[cfg(feature = "serde")]
impl<A: Alphabet> serde::Serialize for ValidatedSeq<A> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let s = std::str::from_utf8(&self.data).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(s)
    }
}

#[cfg(feature = "serde")]
impl<'de, A: Alphabet> serde::Deserialize<'de> for ValidatedSeq<A> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s.as_bytes()).map_err(serde::de::Error::custom)
    }
}
