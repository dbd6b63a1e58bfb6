//! BitPool - Fixed-capacity bitmap used to declare and track id availability.
//!
//! A set bit is a member of the pool: in a config record it means "this id is
//! part of the declared range", in an operational record it means "this id is
//! free". Capacity is fixed at construction and never resized.
//!
//! On the wire a pool is `{"capacity": N, "bits": "<base64>"}` where the
//! payload is the little-endian bytes of the backing `u64` words. Storage size
//! depends only on capacity, never on how many ids are allocated.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bitvec::prelude::{BitVec, Lsb0};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const WORD_BYTES: usize = std::mem::size_of::<u64>();

/// Error type for bit pool operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitPoolError {
    #[error("index {index} out of range for pool of capacity {capacity}")]
    OutOfRange { index: usize, capacity: usize },
    #[error("malformed bit pool encoding: {0}")]
    Encoding(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BitPoolRecord", into = "BitPoolRecord")]
pub struct BitPool {
    bits: BitVec<u64, Lsb0>,
}

impl BitPool {
    /// A pool of `capacity` slots, all clear.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, capacity),
        }
    }

    /// A pool of `capacity` slots, all set.
    pub fn full(capacity: usize) -> Self {
        Self {
            bits: BitVec::repeat(true, capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Lowest set index, scanning a word at a time.
    pub fn first_set(&self) -> Option<usize> {
        self.bits.first_one()
    }

    pub fn is_set(&self, index: usize) -> bool {
        self.bits.get(index).map(|bit| *bit).unwrap_or(false)
    }

    /// Set `index`. Returns whether the bit was already set.
    pub fn set(&mut self, index: usize) -> Result<bool, BitPoolError> {
        self.check(index)?;
        Ok(self.bits.replace(index, true))
    }

    /// Clear `index`. Returns whether the bit was set before.
    pub fn clear(&mut self, index: usize) -> Result<bool, BitPoolError> {
        self.check(index)?;
        Ok(self.bits.replace(index, false))
    }

    pub fn count_set(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    fn check(&self, index: usize) -> Result<(), BitPoolError> {
        if index < self.bits.len() {
            Ok(())
        } else {
            Err(BitPoolError::OutOfRange {
                index,
                capacity: self.bits.len(),
            })
        }
    }
}

#[derive(Serialize, Deserialize)]
struct BitPoolRecord {
    capacity: usize,
    bits: String,
}

impl From<BitPool> for BitPoolRecord {
    fn from(pool: BitPool) -> Self {
        let capacity = pool.capacity();
        let mut bits = pool.bits;
        // Slack bits in the last word are not part of the pool.
        bits.set_uninitialized(false);
        let bytes: Vec<u8> = bits
            .into_vec()
            .into_iter()
            .flat_map(u64::to_le_bytes)
            .collect();
        BitPoolRecord {
            capacity,
            bits: STANDARD.encode(bytes),
        }
    }
}

impl TryFrom<BitPoolRecord> for BitPool {
    type Error = BitPoolError;

    fn try_from(record: BitPoolRecord) -> Result<Self, Self::Error> {
        let bytes = STANDARD
            .decode(record.bits.as_bytes())
            .map_err(|e| BitPoolError::Encoding(e.to_string()))?;
        let words_needed = record.capacity.div_ceil(64);
        if bytes.len() != words_needed * WORD_BYTES {
            return Err(BitPoolError::Encoding(format!(
                "{} bytes cannot hold exactly {} bits",
                bytes.len(),
                record.capacity
            )));
        }
        let words: Vec<u64> = bytes
            .chunks_exact(WORD_BYTES)
            .map(|chunk| {
                let mut word = [0u8; WORD_BYTES];
                word.copy_from_slice(chunk);
                u64::from_le_bytes(word)
            })
            .collect();
        let mut bits = BitVec::<u64, Lsb0>::from_vec(words);
        bits.truncate(record.capacity);
        Ok(BitPool { bits })
    }
}
