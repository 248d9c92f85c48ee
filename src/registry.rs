//! A process-wide registry of KangarooTwelve digest families.
//!
//! A digest family is a (digest length, customization string) pair, optionally
//! registered under an explicit name. [`implement`] hands out one [`Algorithm`]
//! handle per family for the lifetime of the process, so repeated requests for
//! the same family compare equal by identity:
//!
//! ```
//! use kangarootwelve::{implement, lookup, Options};
//!
//! let a = lookup(48).unwrap();
//! let b = implement(Options::new().digest_length(48)).unwrap();
//! assert_eq!(a, b);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use crate::k12;

/// The digest length of [`default`], in bytes.
pub const DEFAULT_DIGEST_LENGTH: usize = 64;

/// The smallest digest length a family can be configured with. The tree
/// construction itself accepts a zero-length output buffer; a family cannot
/// be bound to one.
pub const MIN_DIGEST_LENGTH: usize = 1;

/// A configuration error, reported by [`implement`] before any hashing
/// occurs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("digest length lesser than minimum ({MIN_DIGEST_LENGTH}): {0}")]
    DigestLengthTooSmall(usize),

    #[error("customization supplied in both raw and hex form")]
    AmbiguousCustomization,

    #[error("invalid customization hex string: {0}")]
    InvalidCustomizationHex(#[from] hex::FromHexError),

    #[error("{name} was already registered with digest length {existing}, not {requested}")]
    NameCollision { name: String, existing: usize, requested: usize },
}

/// Configuration for [`implement`].
///
/// Every option has a long form and the short alias the original digest
/// module accepted: `digest_length`/`d`, `customization`/`c`,
/// `customization_hex`/`ch`, and `name`/`n`. Aliases are resolved into one
/// canonical configuration before any hashing logic runs.
#[derive(Clone, Debug, Default)]
pub struct Options {
    digest_length: Option<usize>,
    customization: Option<Vec<u8>>,
    customization_hex: Option<String>,
    name: Option<String>,
}

impl Options {
    pub fn new() -> Options {
        Options::default()
    }

    /// Sets the digest length in bytes. Defaults to
    /// [`DEFAULT_DIGEST_LENGTH`].
    pub fn digest_length(mut self, n: usize) -> Options {
        self.digest_length = Some(n);
        self
    }

    /// Alias of [`Options::digest_length`].
    pub fn d(self, n: usize) -> Options {
        self.digest_length(n)
    }

    /// Sets the customization string from raw bytes. A customization string
    /// changes the resulting digest of every input.
    pub fn customization(mut self, customization: impl AsRef<[u8]>) -> Options {
        self.customization = Some(customization.as_ref().to_vec());
        self
    }

    /// Alias of [`Options::customization`].
    pub fn c(self, customization: impl AsRef<[u8]>) -> Options {
        self.customization(customization)
    }

    /// Sets the customization string from its hex encoding. Mutually
    /// exclusive with [`Options::customization`].
    pub fn customization_hex(mut self, customization_hex: impl Into<String>) -> Options {
        self.customization_hex = Some(customization_hex.into());
        self
    }

    /// Alias of [`Options::customization_hex`].
    pub fn ch(self, customization_hex: impl Into<String>) -> Options {
        self.customization_hex(customization_hex)
    }

    /// Registers the family under an explicit name instead of the
    /// auto-generated `KangarooTwelve_<digest length>[_<customization hex>]`
    /// one.
    pub fn name(mut self, name: impl Into<String>) -> Options {
        self.name = Some(name.into());
        self
    }

    /// Alias of [`Options::name`].
    pub fn n(self, name: impl Into<String>) -> Options {
        self.name(name)
    }

    /// Resolves aliases into (digest length, customization, name).
    fn resolve(self) -> Result<(usize, Option<Vec<u8>>, Option<String>), Error> {
        let digest_length = self.digest_length.unwrap_or(DEFAULT_DIGEST_LENGTH);
        if digest_length < MIN_DIGEST_LENGTH {
            return Err(Error::DigestLengthTooSmall(digest_length));
        }

        let customization = match (self.customization, self.customization_hex) {
            (Some(_), Some(_)) => return Err(Error::AmbiguousCustomization),
            (Some(raw), None) => Some(raw),
            (None, Some(hex)) => Some(hex::decode(hex)?),
            (None, None) => None,
        };

        Ok((digest_length, customization, self.name))
    }
}

/// A reusable handle for one digest family, bound to the digest length and
/// customization string it was implemented with.
///
/// Handles are cheap to clone and compare equal by identity: two handles are
/// equal iff they came from the same registry entry.
#[derive(Clone)]
pub struct Algorithm(Arc<Family>);

struct Family {
    name: String,
    digest_length: usize,
    customization: Option<Vec<u8>>,
}

impl Algorithm {
    /// The digest length this family was implemented with, in bytes.
    pub fn digest_length(&self) -> usize {
        self.0.digest_length
    }

    /// The chunk size of the tree construction. Always 8192, independent of
    /// the digest length.
    pub fn block_length(&self) -> usize {
        k12::CHUNK_LEN
    }

    /// The customization string, or `None` if the family was implemented
    /// without one. An absent customization is never coerced to an empty
    /// string.
    pub fn customization(&self) -> Option<&[u8]> {
        self.0.customization.as_deref()
    }

    /// The lowercase hex encoding of the customization string, if present.
    pub fn customization_hex(&self) -> Option<String> {
        self.0.customization.as_ref().map(hex::encode)
    }

    /// The name the family is registered under.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Hashes the given message with this family's parameters.
    pub fn digest(&self, message: impl AsRef<[u8]>) -> Vec<u8> {
        k12::hash(
            message.as_ref(),
            self.0.customization.as_deref().unwrap_or_default(),
            self.0.digest_length,
        )
    }

    /// Like [`Algorithm::digest`], with the output encoded as lowercase hex.
    pub fn hexdigest(&self, message: impl AsRef<[u8]>) -> String {
        hex::encode(self.digest(message))
    }
}

impl PartialEq for Algorithm {
    fn eq(&self, other: &Algorithm) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Algorithm {}

impl fmt::Debug for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Algorithm")
            .field("name", &self.0.name)
            .field("digest_length", &self.0.digest_length)
            .field("customization", &self.customization_hex())
            .finish()
    }
}

static REGISTRY: Lazy<Mutex<HashMap<String, Algorithm>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Implements the digest family described by `options` and returns its
/// handle.
///
/// The same family always resolves to the same handle, including under
/// concurrent calls. Re-implementing a name with a different digest length is
/// a [`Error::NameCollision`].
pub fn implement(options: Options) -> Result<Algorithm, Error> {
    let (digest_length, customization, name) = options.resolve()?;

    let name = name.unwrap_or_else(|| match &customization {
        Some(customization) => {
            format!("KangarooTwelve_{}_{}", digest_length, hex::encode(customization))
        }
        None => format!("KangarooTwelve_{digest_length}"),
    });

    let mut registry = REGISTRY.lock().unwrap();
    if let Some(existing) = registry.get(&name) {
        if existing.digest_length() != digest_length {
            return Err(Error::NameCollision {
                name,
                existing: existing.digest_length(),
                requested: digest_length,
            });
        }
        return Ok(existing.clone());
    }

    let algorithm = Algorithm(Arc::new(Family { name: name.clone(), digest_length, customization }));
    registry.insert(name, algorithm.clone());
    Ok(algorithm)
}

/// Implements the digest family with the given digest length and no
/// customization string. Shorthand for
/// `implement(Options::new().digest_length(n))`.
pub fn lookup(digest_length: usize) -> Result<Algorithm, Error> {
    implement(Options::new().digest_length(digest_length))
}

/// The default digest family: a 64-byte digest and no customization string.
pub fn default() -> Algorithm {
    implement(Options::new()).expect("default options are valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memoizes_by_parameters() {
        let a = lookup(32).unwrap();
        let b = lookup(32).unwrap();
        let c = implement(Options::new().digest_length(32)).unwrap();

        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_ne!(a, lookup(31).unwrap());
    }

    #[test]
    fn default_family() {
        let family = default();

        assert_eq!(family.digest_length(), DEFAULT_DIGEST_LENGTH);
        assert_eq!(family.name(), "KangarooTwelve_64");
        assert_eq!(family.customization(), None);
        assert_eq!(family, lookup(64).unwrap());
    }

    #[test]
    fn customization_participates_in_identity() {
        let plain = lookup(40).unwrap();
        let custom = implement(Options::new().digest_length(40).customization("x")).unwrap();

        assert_ne!(plain, custom);
        assert_eq!(custom.name(), "KangarooTwelve_40_78");
    }

    #[test]
    fn named_families_are_distinct() {
        let a = implement(Options::new().name("RegistryTestA").digest_length(48)).unwrap();
        let b = implement(Options::new().name("RegistryTestB").digest_length(48)).unwrap();

        assert_ne!(a, b);
        assert_eq!(a, implement(Options::new().name("RegistryTestA").digest_length(48)).unwrap());
        assert_eq!(a.name(), "RegistryTestA");
    }

    #[test]
    fn name_collision() {
        implement(Options::new().name("RegistryTestCollision").digest_length(48)).unwrap();
        let err = implement(Options::new().name("RegistryTestCollision").digest_length(32))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::NameCollision { existing: 48, requested: 32, .. },
        ));
    }

    #[test]
    fn option_aliases() {
        let long = implement(
            Options::new().name("RegistryTestLong").digest_length(48).customization("abcd"),
        )
        .unwrap();
        let short =
            implement(Options::new().n("RegistryTestShort").d(48).c("abcd")).unwrap();
        let hexed = implement(
            Options::new().name("RegistryTestHex").digest_length(48).customization_hex("61626364"),
        )
        .unwrap();
        let short_hexed =
            implement(Options::new().n("RegistryTestHexShort").d(48).ch("61626364")).unwrap();

        for family in [&short, &hexed, &short_hexed] {
            assert_eq!(family.digest_length(), long.digest_length());
            assert_eq!(family.customization(), long.customization());
        }
        assert_eq!(long.customization(), Some(b"abcd".as_slice()));
        assert_eq!(long.customization_hex().as_deref(), Some("61626364"));
    }

    #[test]
    fn conflicting_customization_forms() {
        let err = implement(Options::new().customization("abcd").customization_hex("61626364"))
            .unwrap_err();

        assert!(matches!(err, Error::AmbiguousCustomization));
    }

    #[test]
    fn invalid_customization_hex() {
        let err = implement(Options::new().customization_hex("xyz")).unwrap_err();

        assert!(matches!(err, Error::InvalidCustomizationHex(_)));
    }

    #[test]
    fn zero_digest_length() {
        let err = lookup(0).unwrap_err();

        assert!(matches!(err, Error::DigestLengthTooSmall(0)));
    }

    #[test]
    fn absent_customization_stays_absent() {
        let absent = lookup(56).unwrap();
        let empty = implement(Options::new().digest_length(56).customization("")).unwrap();

        assert_eq!(absent.customization(), None);
        assert_eq!(absent.customization_hex(), None);
        assert_eq!(empty.customization(), Some(b"".as_slice()));
        // Absent and explicitly-empty customizations hash identically but
        // remain distinct families.
        assert_ne!(absent, empty);
        assert_eq!(absent.digest("m"), empty.digest("m"));
    }

    #[test]
    fn concurrent_implement_yields_one_identity() {
        let threads: Vec<_> = (0..8).map(|_| std::thread::spawn(|| lookup(37).unwrap())).collect();
        let algorithms: Vec<_> = threads.into_iter().map(|t| t.join().unwrap()).collect();

        for pair in algorithms.windows(2) {
            assert_eq!(pair[0], pair[1]);
        }
    }

    #[test]
    fn digest_matches_hexdigest() {
        let family = lookup(32).unwrap();

        assert_eq!(family.hexdigest("abcd"), hex::encode(family.digest("abcd")));
        assert_eq!(family.digest("abcd").len(), 32);
    }
}
