#![cfg_attr(not(feature = "std"), no_std)]

//! A Rust implementation of the
//! [KangarooTwelve](https://keccak.team/kangarootwelve.html) extendable-output
//! hash function.
//!
//! KangarooTwelve is a tree-hashing mode over a sponge built from the 12-round
//! Keccak-p\[1600\] permutation. Messages are split into 8 KiB chunks, every
//! chunk after the first is reduced to a 32-byte chaining value, and a final
//! node combines the first chunk with the chaining values to produce output of
//! any requested length.
//!
//! The algorithmic core ([`keccak`], [`sponge`], [`k12`]) is `no_std`; the
//! [`registry`] module, which hands out reusable, memoized digest family
//! handles in the style of the `Digest` module family, requires `std`.
//!
//! ```
//! let k12_32 = kangarootwelve::lookup(32).unwrap();
//! assert_eq!(
//!     k12_32.hexdigest(""),
//!     "1ac2d450fc3b4205d19da7bfca1b37513c0803577ac7167f06fe2ce1f0ef39e5",
//! );
//! ```

pub mod k12;
pub mod keccak;
#[cfg(feature = "std")]
pub mod registry;
pub mod sponge;

mod fuzzing;

#[cfg(feature = "std")]
pub use registry::{
    default, implement, lookup, Algorithm, Error, Options, DEFAULT_DIGEST_LENGTH,
    MIN_DIGEST_LENGTH,
};

/// The chunk size of the tree construction, exposed as the block length of
/// every digest family.
pub const BLOCK_LENGTH: usize = k12::CHUNK_LEN;

/// A permutation over a fixed-width state of `WIDTH` bytes.
pub trait Permutation<const WIDTH: usize>: Default {
    /// Returns an immutable pointer to the permutation's state.
    fn state(&self) -> &[u8; WIDTH];

    /// Returns a mutable pointer to the permutation's state.
    fn state_mut(&mut self) -> &mut [u8; WIDTH];

    /// Permutes the permutation's state.
    fn permute(&mut self);

    /// Adds the given byte to the permutation's state at the given offset.
    #[inline(always)]
    fn add_byte(&mut self, byte: u8, offset: usize) {
        self.state_mut()[offset] ^= byte;
    }

    /// Adds the given bytes to the permutation's state, starting at the given
    /// offset.
    #[inline(always)]
    fn add_bytes(&mut self, bytes: &[u8], offset: usize) {
        for (st_byte, byte) in self.state_mut()[offset..].iter_mut().zip(bytes) {
            *st_byte ^= byte;
        }
    }

    /// Fills the given mutable slice with bytes from the permutation's state.
    #[inline(always)]
    fn extract_bytes(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.state()[..out.len()]);
    }
}
