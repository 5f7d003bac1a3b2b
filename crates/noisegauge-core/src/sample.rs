//! Sample sequence model: literal symbols and their bitstring expansion.
//!
//! A [`SampleBuffer`] holds one analysis unit's worth of samples in two
//! parallel forms:
//!
//! - `symbols`: one byte per sample, translated to a dense alphabet
//!   `[0, alph_size)` that preserves value order;
//! - `bsymbols`: the MSB-first expansion of each translated symbol into its
//!   `word_size` constituent bits, one byte per bit.
//!
//! Estimators borrow one of the two forms; the buffer is never mutated after
//! construction.

use crate::error::Error;

/// Minimum number of samples an analysis unit must provide.
pub const MIN_SIZE: usize = 1_000_000;

/// An immutable sequence of samples over an alphabet of at most 2^word_size
/// values, in literal and bitstring form.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    symbols: Vec<u8>,
    bsymbols: Vec<u8>,
    word_size: u8,
    alph_size: usize,
}

impl SampleBuffer {
    /// Build a sample buffer from raw bytes.
    ///
    /// Each input byte holds one sample right-aligned in its low `word_size`
    /// bits; higher bits are masked off. `word_size == 0` infers the smallest
    /// width in `1..=8` that covers every input byte. Observed values that
    /// form a proper subset of `[0, 2^word_size)` are remapped to a dense
    /// alphabet, preserving order; the bitstring is expanded from the
    /// translated symbols so that re-packing it MSB-first reproduces
    /// `symbols` exactly.
    pub fn from_bytes(raw: &[u8], word_size: u8) -> Result<Self, Error> {
        if raw.is_empty() {
            return Err(Error::InsufficientSamples { got: 0, need: 1 });
        }
        debug_assert!(word_size <= 8);

        let word_size = if word_size == 0 {
            infer_word_size(raw)
        } else {
            word_size
        };
        let mask: u8 = if word_size == 8 {
            0xff
        } else {
            (1u8 << word_size) - 1
        };

        // Observed-value histogram drives the dense translation.
        let mut seen = [false; 256];
        for &b in raw {
            seen[(b & mask) as usize] = true;
        }
        let mut translate = [0u8; 256];
        let mut alph_size = 0usize;
        for (value, &present) in seen.iter().enumerate() {
            if present {
                translate[value] = alph_size as u8;
                alph_size += 1;
            }
        }

        let symbols: Vec<u8> = raw.iter().map(|&b| translate[(b & mask) as usize]).collect();

        let mut bsymbols = Vec::with_capacity(symbols.len() * word_size as usize);
        for &s in &symbols {
            for shift in (0..word_size).rev() {
                bsymbols.push((s >> shift) & 1);
            }
        }

        Ok(Self {
            symbols,
            bsymbols,
            word_size,
            alph_size,
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True when the buffer holds no samples (never the case post-construction).
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of bits in the bitstring form (`len * word_size`).
    pub fn blen(&self) -> usize {
        self.bsymbols.len()
    }

    /// Bits per sample.
    pub fn word_size(&self) -> u8 {
        self.word_size
    }

    /// Count of distinct values actually observed.
    pub fn alph_size(&self) -> usize {
        self.alph_size
    }

    /// Literal form: one translated symbol per sample.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Bitstring form: one byte per bit, values in `{0, 1}`.
    pub fn bsymbols(&self) -> &[u8] {
        &self.bsymbols
    }
}

/// Smallest `w` in `1..=8` such that every byte fits in its low `w` bits.
fn infer_word_size(raw: &[u8]) -> u8 {
    let max = raw.iter().copied().max().unwrap_or(0);
    let mut w = 1;
    while w < 8 && max >> w != 0 {
        w += 1;
    }
    w
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_word_size_from_max_value() {
        assert_eq!(infer_word_size(&[0, 1, 0, 1]), 1);
        assert_eq!(infer_word_size(&[0, 3, 2]), 2);
        assert_eq!(infer_word_size(&[7]), 3);
        assert_eq!(infer_word_size(&[0, 200]), 8);
        assert_eq!(infer_word_size(&[0, 0]), 1);
    }

    #[test]
    fn masks_high_bits_when_width_given() {
        let data = SampleBuffer::from_bytes(&[0xff, 0x00, 0xfe], 1).unwrap();
        assert_eq!(data.symbols(), &[1, 0, 0]);
        assert_eq!(data.alph_size(), 2);
    }

    #[test]
    fn translates_sparse_alphabet_preserving_order() {
        // Observed {3, 9, 200} under word_size 8 becomes {0, 1, 2}.
        let data = SampleBuffer::from_bytes(&[200, 3, 9, 3], 8).unwrap();
        assert_eq!(data.symbols(), &[2, 0, 1, 0]);
        assert_eq!(data.alph_size(), 3);
        assert_eq!(data.word_size(), 8);
    }

    #[test]
    fn bitstring_is_msb_first_expansion() {
        // Symbols 0..4 under 3 bits: 000 001 010 011.
        let data = SampleBuffer::from_bytes(&[0, 1, 2, 3], 3).unwrap();
        assert_eq!(data.blen(), 12);
        assert_eq!(
            data.bsymbols(),
            &[0, 0, 0, 0, 0, 1, 0, 1, 0, 0, 1, 1]
        );
    }

    #[test]
    fn bitstring_round_trips_to_symbols() {
        let raw: Vec<u8> = (0u16..1000).map(|i| (i * 37 % 61) as u8).collect();
        let data = SampleBuffer::from_bytes(&raw, 6).unwrap();
        let w = data.word_size() as usize;
        let repacked: Vec<u8> = data
            .bsymbols()
            .chunks(w)
            .map(|bits| bits.iter().fold(0u8, |acc, &b| (acc << 1) | b))
            .collect();
        assert_eq!(repacked, data.symbols());
    }

    #[test]
    fn binary_input_is_identity() {
        let raw = [0u8, 1, 1, 0, 1];
        let data = SampleBuffer::from_bytes(&raw, 0).unwrap();
        assert_eq!(data.word_size(), 1);
        assert_eq!(data.symbols(), &raw);
        assert_eq!(data.bsymbols(), &raw);
    }

    #[test]
    fn empty_input_rejected() {
        assert!(matches!(
            SampleBuffer::from_bytes(&[], 8),
            Err(Error::InsufficientSamples { got: 0, .. })
        ));
    }

    #[test]
    fn degenerate_alphabet_is_representable() {
        // The buffer itself accepts constant input; rejection is driver policy.
        let data = SampleBuffer::from_bytes(&[5u8; 100], 8).unwrap();
        assert_eq!(data.alph_size(), 1);
        assert_eq!(data.symbols(), &[0u8; 100]);
    }
}
