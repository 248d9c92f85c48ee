#![cfg(all(test, feature = "std"))]

use proptest::collection::vec;
use proptest::prelude::*;

use crate::k12;

/// An arbitrary message, long enough to cross chunk boundaries now and then.
fn arb_message() -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 0..20_000)
}

/// An arbitrary customization string.
fn arb_customization() -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 0..200)
}

proptest! {
    /// Equal (message, customization, output length) triples must produce
    /// byte-identical output.
    #[test]
    fn determinism(m in arb_message(), c in arb_customization(), n in 0usize..600) {
        prop_assert_eq!(k12::hash(&m, &c, n), k12::hash(&m, &c, n));
    }

    /// The output is always exactly as long as requested, for any request.
    #[test]
    fn length_contract(m in arb_message(), c in arb_customization(), n in 0usize..600) {
        prop_assert_eq!(k12::hash(&m, &c, n).len(), n);
    }

    /// A shorter squeeze of the same input is a prefix of a longer one.
    #[test]
    fn extendable_output_prefix(m in arb_message(), c in arb_customization()) {
        let long = k12::hash(&m, &c, 168 * 3 + 5);
        let short = k12::hash(&m, &c, 32);

        prop_assert_eq!(&long[..32], &short[..]);
    }

    /// Distinct customization strings must separate the output domain.
    #[test]
    fn customization_separates_domains(
        m in arb_message(),
        c0 in arb_customization(),
        c1 in arb_customization(),
    ) {
        prop_assume!(c0 != c1);
        prop_assert_ne!(k12::hash(&m, &c0, 32), k12::hash(&m, &c1, 32));
    }

    /// Moving bytes between the message and the customization string must
    /// change the output; the trailing length encoding keeps the two fields
    /// from running together.
    #[test]
    fn message_customization_split_is_unambiguous(
        joined in vec(any::<u8>(), 1..400),
        split in any::<prop::sample::Index>(),
    ) {
        let mid = split.index(joined.len());
        prop_assume!(mid != joined.len());

        let moved = k12::hash(&joined[..mid], &joined[mid..], 32);
        let whole = k12::hash(&joined, &[], 32);

        prop_assert_ne!(moved, whole);
    }

    /// A registry handle's hexdigest is the hex encoding of its digest.
    #[test]
    fn hexdigest_consistency(m in arb_message()) {
        let family = crate::registry::lookup(32).unwrap();

        prop_assert_eq!(family.hexdigest(&m), hex::encode(family.digest(&m)));
    }
}
