//! A multi-rate padded sponge over a [`Permutation`].

use crate::keccak::KeccakP1600_12;
use crate::Permutation;

/// The TurboSHAKE128 sponge: Keccak-p\[1600,12\] with `r=1344`, the
/// configuration KangarooTwelve builds its tree nodes from.
pub type TurboShake128 = Sponge<KeccakP1600_12, 200, 168>;

/// A sponge with an absorb rate and squeeze rate of `RATE` bytes, leaving
/// `WIDTH - RATE` bytes of capacity.
///
/// Input is absorbed into the leading `RATE` bytes of state, permuting after
/// each full block. Finalizing pads with a domain-separation byte and the
/// multi-rate padding bit, then squeezes `RATE`-byte windows of state,
/// permuting between windows.
#[derive(Clone)]
pub struct Sponge<P, const WIDTH: usize, const RATE: usize>
where
    P: Permutation<WIDTH>,
{
    state: P,
    offset: usize,
}

impl<P, const WIDTH: usize, const RATE: usize> Default for Sponge<P, WIDTH, RATE>
where
    P: Permutation<WIDTH>,
{
    fn default() -> Self {
        Sponge::new()
    }
}

impl<P, const WIDTH: usize, const RATE: usize> Sponge<P, WIDTH, RATE>
where
    P: Permutation<WIDTH>,
{
    pub fn new() -> Self {
        debug_assert!(RATE < WIDTH);

        Sponge { state: P::default(), offset: 0 }
    }

    /// Absorbs the given bytes into the sponge's state.
    pub fn absorb(&mut self, mut bin: &[u8]) {
        while !bin.is_empty() {
            let take = bin.len().min(RATE - self.offset);
            let (block, rest) = bin.split_at(take);
            self.state.add_bytes(block, self.offset);
            self.offset += take;
            bin = rest;

            if self.offset == RATE {
                self.state.permute();
                self.offset = 0;
            }
        }
    }

    /// Pads the sponge's state with the given domain-separation byte and fills
    /// `out` with squeezed output.
    ///
    /// The domain byte carries the domain-separation suffix bits plus the
    /// first padding bit, so it must be in `0x01..=0x7f`. An empty `out` is
    /// valid; the padding permutation still runs.
    pub fn finalize_into(mut self, domain: u8, out: &mut [u8]) {
        debug_assert!((0x01..=0x7f).contains(&domain));

        self.state.add_byte(domain, self.offset);
        self.state.add_byte(0x80, RATE - 1);
        self.state.permute();

        let mut windows = out.chunks_mut(RATE);
        if let Some(window) = windows.next() {
            self.state.extract_bytes(window);
        }
        for window in windows {
            self.state.permute();
            self.state.extract_bytes(window);
        }
    }

    #[cfg(feature = "std")]
    pub fn finalize(self, domain: u8, n: usize) -> Vec<u8> {
        let mut out = vec![0u8; n];
        self.finalize_into(domain, &mut out);
        out
    }

    /// Absorbs `bin` and squeezes `out.len()` bytes in one call.
    pub fn hash_into(bin: &[u8], domain: u8, out: &mut [u8]) {
        let mut sponge = Sponge::<P, WIDTH, RATE>::new();
        sponge.absorb(bin);
        sponge.finalize_into(domain, out);
    }

    #[cfg(feature = "std")]
    pub fn hash(bin: &[u8], domain: u8, n: usize) -> Vec<u8> {
        let mut out = vec![0u8; n];
        Sponge::<P, WIDTH, RATE>::hash_into(bin, domain, &mut out);
        out
    }
}
