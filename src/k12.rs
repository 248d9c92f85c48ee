//! The KangarooTwelve tree construction.
//!
//! The input string `S = message ‖ customization ‖ length_encode(|customization|)`
//! is split into 8 KiB chunks. A message that fits in one chunk is hashed with
//! a single sponge pass. A longer message becomes a two-level tree: every
//! chunk after the first is reduced to a 32-byte chaining value, and the final
//! node absorbs the first chunk, a fixed marker, the chaining values, and a
//! length/`FF FF` suffix before squeezing the requested output.

use crate::sponge::TurboShake128;

/// The chunk size of the tree construction, in bytes.
pub const CHUNK_LEN: usize = 8192;

/// The length of a leaf chunk's chaining value, in bytes.
pub const CV_LEN: usize = 32;

/// A tree node: TurboSHAKE128 over Keccak-p\[1600,12\], `r=168`/`c=32`.
type Node = TurboShake128;

// Domain-separation bytes for the three node roles.
const SINGLE_NODE: u8 = 0x07;
const LEAF_NODE: u8 = 0x0b;
const FINAL_NODE: u8 = 0x06;

// Absorbed into the final node between the first chunk and the chaining
// values.
const CHUNK0_MARKER: [u8; 8] = [0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

// Absorbed into the final node after the chaining-value count.
const CV_SUFFIX: [u8; 2] = [0xff, 0xff];

/// Encodes `x` as its minimal big-endian byte string followed by a byte giving
/// the string's length, making the encoding self-delimiting from the right.
/// Returns the buffer and the number of bytes used.
pub fn length_encode(x: usize) -> ([u8; 9], usize) {
    let mut buf = [0u8; 9];
    let n = (usize::BITS - x.leading_zeros()).div_ceil(8) as usize;
    for (i, b) in buf[..n].iter_mut().enumerate() {
        *b = (x >> (8 * (n - 1 - i))) as u8;
    }
    buf[n] = n as u8;
    (buf, n + 1)
}

/// Hashes `message` with the given customization string, filling `out` with
/// squeezed output. An empty `out` is valid and yields nothing.
pub fn hash_into(message: &[u8], customization: &[u8], out: &mut [u8]) {
    let (len_enc, len_enc_len) = length_encode(customization.len());
    let parts = [message, customization, &len_enc[..len_enc_len]];
    let total = message.len() + customization.len() + len_enc_len;

    if total <= CHUNK_LEN {
        let mut node = Node::new();
        for part in parts {
            node.absorb(part);
        }
        return node.finalize_into(SINGLE_NODE, out);
    }

    let mut root = Node::new();
    absorb_span(&mut root, &parts, 0, CHUNK_LEN);
    root.absorb(&CHUNK0_MARKER);

    let chunks = total.div_ceil(CHUNK_LEN);
    for i in 1..chunks {
        let start = i * CHUNK_LEN;
        let end = total.min(start + CHUNK_LEN);

        let mut leaf = Node::new();
        absorb_span(&mut leaf, &parts, start, end);
        let mut cv = [0u8; CV_LEN];
        leaf.finalize_into(LEAF_NODE, &mut cv);
        root.absorb(&cv);
    }

    let (count, count_len) = length_encode(chunks - 1);
    root.absorb(&count[..count_len]);
    root.absorb(&CV_SUFFIX);
    root.finalize_into(FINAL_NODE, out);
}

#[cfg(feature = "std")]
pub fn hash(message: &[u8], customization: &[u8], n: usize) -> Vec<u8> {
    let mut out = vec![0u8; n];
    hash_into(message, customization, &mut out);
    out
}

/// Absorbs the bytes `start..end` of the virtual concatenation of `parts`
/// without materializing it.
fn absorb_span(node: &mut Node, parts: &[&[u8]; 3], start: usize, end: usize) {
    let mut base = 0;
    for part in parts {
        let lo = start.clamp(base, base + part.len());
        let hi = end.clamp(base, base + part.len());
        if lo < hi {
            node.absorb(&part[lo - base..hi - base]);
        }
        base += part.len();
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    fn ptn(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn length_encoding() {
        assert_eq!(length_encode(0), ([0x00, 0, 0, 0, 0, 0, 0, 0, 0], 1));
        assert_eq!(length_encode(12), ([0x0c, 0x01, 0, 0, 0, 0, 0, 0, 0], 2));
        assert_eq!(length_encode(65538), ([0x01, 0x00, 0x02, 0x03, 0, 0, 0, 0, 0], 4));
    }

    #[test]
    fn empty_message() {
        assert_eq!(
            hash(&[], &[], 32),
            hex!("1ac2d450fc3b4205d19da7bfca1b37513c0803577ac7167f06fe2ce1f0ef39e5"),
        );
        assert_eq!(
            hash(&[], &[], 64),
            hex!(
                "1ac2d450fc3b4205d19da7bfca1b37513c0803577ac7167f06fe2ce1f0ef39e5"
                "4269c056b8c82e48276038b6d292966cc07a3d4645272e31ff38508139eb0a71"
            ),
        );
    }

    #[test]
    fn long_squeeze_tail() {
        // 10032 bytes of output spans 60 squeeze windows.
        let out = hash(&[], &[], 10032);
        assert_eq!(
            out[10000..],
            hex!("e8dc563642f7228c84684c898405d3a834799158c079b12880277a1d28e2ff6d"),
        );
    }

    #[test]
    fn single_chunk_messages() {
        for (len, expected) in [
            (1, hex!("2bda92450e8b147f8a7cb629e784a058efca7cf7d8218e02d345dfaa65244a1f")),
            (17, hex!("6bf75fa2239198db4772e36478f8e19b0f371205f6a9a93a273f51df37122888")),
            (289, hex!("0c315ebcdedbf61426de7dcf8fb725d1e74675d7f5327a5067f367b108ecb67c")),
            (4913, hex!("cb552e2ec77d9910701d578b457ddf772c12e322e4ee7fe417f92c758f0d59d0")),
        ] {
            assert_eq!(hash(&ptn(len), &[], 32), expected, "ptn({len})");
        }
    }

    #[test]
    fn multi_chunk_message() {
        assert_eq!(
            hash(&ptn(83521), &[], 32),
            hex!("8701045e22205345ff4dda05555cbb5c3af1a771c2b89baef37db43d9998b9fe"),
        );
    }

    #[test]
    fn chunk_boundary() {
        // 8191 bytes of message plus the one-byte length suffix exactly fill
        // one chunk; this is the largest single-node message.
        assert_eq!(
            hash(&ptn(8191), &[], 32),
            hex!("1b577636f723643e990cc7d6a659837436fd6a103626600eb8301cd1dbe553d6"),
        );
        assert_ne!(hash(&ptn(8192), &[], 32), hash(&ptn(8193), &[], 32));
    }

    #[test]
    fn customization_strings() {
        for (m_len, c_pow, expected) in [
            (0, 0, hex!("fab658db63e94a246188bf7af69a133045f46ee984c56e3c3328caaf1aa1a583")),
            (1, 1, hex!("d848c5068ced736f4462159b9867fd4c20b808acc3d5bc48e0b06ba0a3762ec4")),
            (3, 2, hex!("c389e5009ae57120854c2e8c64670ac01358cf4c1baf89447a724234dc7ced74")),
            (7, 3, hex!("75d2f86a2e644566726b4fbcfc5657b9dbcf070c7b0dca06450ab291d7443bcf")),
        ] {
            let message = vec![0xffu8; m_len];
            let customization = ptn(41usize.pow(c_pow));
            assert_eq!(hash(&message, &customization, 32), expected);
        }
    }

    #[test]
    fn customization_is_not_message_suffix() {
        // The length suffix keeps the message/customization split unambiguous.
        assert_ne!(hash(b"ab", b"cd", 32), hash(b"abcd", b"", 32));
        assert_ne!(hash(b"ab", b"cd", 32), hash(b"a", b"bcd", 32));
    }

    #[test]
    fn zero_length_output() {
        assert_eq!(hash(b"message", &[], 0), Vec::<u8>::new());
    }
}
