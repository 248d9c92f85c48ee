//! The Keccak-p\[1600\] permutation, parameterized with the number of rounds.

use byteorder::{ByteOrder, LittleEndian};

use crate::Permutation;

/// The 12-round Keccak-p\[1600,12\] permutation used by KangarooTwelve.
///
/// Not to be confused with the full 24-round Keccak-f\[1600\] permutation from
/// SHA-3.
pub type KeccakP1600_12 = KeccakP1600<12>;

/// The generic Keccak-p\[1600\] permutation: a 200-byte state viewed as 25
/// little-endian 64-bit lanes in a 5×5 grid.
#[derive(Clone)]
#[repr(align(8))]
pub struct KeccakP1600<const R: usize>([u8; 200]);

impl<const R: usize> Default for KeccakP1600<R> {
    fn default() -> Self {
        KeccakP1600([0u8; 200])
    }
}

impl<const R: usize> Permutation<200> for KeccakP1600<R> {
    fn state(&self) -> &[u8; 200] {
        &self.0
    }

    fn state_mut(&mut self) -> &mut [u8; 200] {
        &mut self.0
    }

    #[inline(always)]
    fn permute(&mut self) {
        let mut lanes = [0u64; 25];
        LittleEndian::read_u64_into(&self.0, &mut lanes);
        keccak_p1600::<R>(&mut lanes);
        LittleEndian::write_u64_into(&lanes, &mut self.0);
    }
}

const MAX_ROUNDS: usize = 24;

#[allow(clippy::unreadable_literal)]
const RC: [u64; MAX_ROUNDS] = [
    0x0000000000000001,
    0x0000000000008082,
    0x800000000000808a,
    0x8000000080008000,
    0x000000000000808b,
    0x0000000080000001,
    0x8000000080008081,
    0x8000000000008009,
    0x000000000000008a,
    0x0000000000000088,
    0x0000000080008009,
    0x000000008000000a,
    0x000000008000808b,
    0x800000000000008b,
    0x8000000000008089,
    0x8000000000008003,
    0x8000000000008002,
    0x8000000000000080,
    0x000000000000800a,
    0x800000008000000a,
    0x8000000080008081,
    0x8000000000008080,
    0x0000000080000001,
    0x8000000080008008,
];

// (0..24).map(|t| ((t+1)*(t+2)/2) % 64)
const RHO: [u32; MAX_ROUNDS] = [
    1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44,
];
const PI: [usize; MAX_ROUNDS] = [
    10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1,
];

/// The Keccak-p\[1600\] round function, applied `R` times. A reduced-round
/// permutation uses the last `R` constants of the standard 24-round schedule.
pub(crate) fn keccak_p1600<const R: usize>(lanes: &mut [u64; 25]) {
    for &rc in &RC[MAX_ROUNDS - R..] {
        // θ
        let mut c = [0u64; 5];
        for x in 0..5 {
            c[x] = lanes[x] ^ lanes[x + 5] ^ lanes[x + 10] ^ lanes[x + 15] ^ lanes[x + 20];
        }
        for x in 0..5 {
            let d = c[(x + 4) % 5] ^ c[(x + 1) % 5].rotate_left(1);
            for y in (0..25).step_by(5) {
                lanes[x + y] ^= d;
            }
        }

        // ρ and π
        let mut a = lanes[1];
        for (&pi, &rho) in PI.iter().zip(&RHO) {
            let next = lanes[pi];
            lanes[pi] = a.rotate_left(rho);
            a = next;
        }

        // χ
        for y in (0..25).step_by(5) {
            let mut row = [0u64; 5];
            row.copy_from_slice(&lanes[y..y + 5]);
            for x in 0..5 {
                lanes[y + x] = row[x] ^ (!row[(x + 1) % 5] & row[(x + 2) % 5]);
            }
        }

        // ι
        lanes[0] ^= rc;
    }
}
