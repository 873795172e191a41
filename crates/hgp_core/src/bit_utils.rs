pub struct BitPack;

impl BitPack {
    /// Number of `u64` words needed to hold `bits` bits.
    #[inline(always)]
    pub fn words_for(bits: usize) -> usize {
        bits.div_ceil(64)
    }

    #[inline(always)]
    pub fn get(storage: &[u64], index: usize) -> bool {
        let word = storage[index / 64];
        let bit = index % 64;
        (word >> bit) & 1 == 1
    }

    #[inline(always)]
    pub fn toggle(storage: &mut [u64], index: usize) {
        let word_idx = index / 64;
        let bit_idx = index % 64;
        storage[word_idx] ^= 1 << bit_idx;
    }

    #[inline(always)]
    pub fn set(storage: &mut [u64], index: usize, val: bool) {
        let word_idx = index / 64;
        let bit_idx = index % 64;
        if val {
            storage[word_idx] |= 1 << bit_idx;
        } else {
            storage[word_idx] &= !(1 << bit_idx);
        }
    }

    /// `dst ^= src`, word by word. Both slices must have the same length.
    #[inline(always)]
    pub fn xor_into(dst: &mut [u64], src: &[u64]) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d ^= *s;
        }
    }

    /// GF(2) inner product of two packed vectors.
    #[inline(always)]
    pub fn dot(a: &[u64], b: &[u64]) -> bool {
        let ones: u32 = a.iter().zip(b).map(|(x, y)| (x & y).count_ones()).sum();
        ones & 1 == 1
    }

    #[inline(always)]
    pub fn count_ones(storage: &[u64]) -> usize {
        storage.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline(always)]
    pub fn is_zero(storage: &[u64]) -> bool {
        storage.iter().all(|&w| w == 0)
    }

    /// Index of the lowest set bit, if any.
    pub fn first_one(storage: &[u64]) -> Option<usize> {
        storage
            .iter()
            .enumerate()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| i * 64 + w.trailing_zeros() as usize)
    }

    /// Packs a 0/1 byte slice. Any non-zero byte is treated as a one.
    pub fn pack(bits: &[u8]) -> Vec<u64> {
        let mut words = vec![0u64; Self::words_for(bits.len())];
        for (i, &b) in bits.iter().enumerate() {
            if b != 0 {
                words[i / 64] |= 1 << (i % 64);
            }
        }
        words
    }

    pub fn unpack(storage: &[u64], len: usize) -> Vec<u8> {
        (0..len).map(|i| Self::get(storage, i) as u8).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::BitPack;

    #[test]
    fn pack_unpack_crosses_word_boundary() {
        let mut bits = vec![0u8; 130];
        bits[0] = 1;
        bits[63] = 1;
        bits[64] = 1;
        bits[129] = 1;
        let words = BitPack::pack(&bits);
        assert_eq!(words.len(), 3);
        assert_eq!(BitPack::count_ones(&words), 4);
        assert_eq!(BitPack::unpack(&words, 130), bits);
    }

    #[test]
    fn dot_is_parity_of_overlap() {
        let a = BitPack::pack(&[1, 1, 0, 1]);
        let b = BitPack::pack(&[1, 1, 1, 0]);
        let c = BitPack::pack(&[1, 0, 1, 0]);
        assert!(!BitPack::dot(&a, &b));
        assert!(BitPack::dot(&a, &c));
    }

    #[test]
    fn first_one_skips_zero_words() {
        let mut words = vec![0u64; 3];
        assert_eq!(BitPack::first_one(&words), None);
        BitPack::set(&mut words, 150, true);
        BitPack::set(&mut words, 170, true);
        assert_eq!(BitPack::first_one(&words), Some(150));
        BitPack::toggle(&mut words, 150);
        assert_eq!(BitPack::first_one(&words), Some(170));
    }
}
