//! Identity resolution: human-entered names to canonical [`FighterId`]s.
//!
//! All fuzzy string handling lives here. The search core only ever receives
//! ids that came out of an [`IdentityResolver`].

pub mod roster;

use crate::error::{MmaMathError, Result};
use crate::types::FighterId;

pub use roster::{Roster, RosterEntry};

/// Maps a display name to a fighter identity.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<FighterId>;
}

/// Derive the URL-style slug for a display name.
///
/// Lowercases, treats hyphens as word breaks, joins words with `-` and drops
/// apostrophes and periods: `"Abdul-Kerim Edilov"` → `"abdul-kerim-edilov"`,
/// `"B.J. Penn"` → `"bj-penn"`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .replace('-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .replace(['\'', '.'], "")
}

/// Resolver that trusts the slug of whatever name it is given.
///
/// Useful when record files are already keyed by slug and no roster is
/// available.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlugResolver;

impl IdentityResolver for SlugResolver {
    fn resolve(&self, name: &str) -> Option<FighterId> {
        let slug = slugify(name);
        (!slug.is_empty()).then(|| FighterId::new(slug))
    }
}

/// Resolve both sides of a query, failing on the first unknown name.
pub fn resolve_pair<R: IdentityResolver + ?Sized>(
    resolver: &R,
    challenger: &str,
    opponent: &str,
) -> Result<(FighterId, FighterId)> {
    let resolve_one = |name: &str| {
        resolver
            .resolve(name)
            .ok_or_else(|| MmaMathError::UnknownFighter(name.to_string()))
    };
    Ok((resolve_one(challenger)?, resolve_one(opponent)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Khabib Nurmagomedov", "khabib-nurmagomedov" ; "two words")]
    #[test_case("Abdul-Kerim Edilov", "abdul-kerim-edilov" ; "hyphenated first name")]
    #[test_case("B.J. Penn", "bj-penn" ; "periods dropped")]
    #[test_case("Dan O'Connor", "dan-oconnor" ; "apostrophe dropped")]
    #[test_case("  Nate   Diaz ", "nate-diaz" ; "extra whitespace")]
    #[test_case("nate-diaz", "nate-diaz" ; "already a slug")]
    #[test_case("", "" ; "empty")]
    fn slugify_cases(name: &str, expected: &str) {
        assert_eq!(slugify(name), expected);
    }

    #[test]
    fn slug_resolver_rejects_blank_names() {
        assert_eq!(SlugResolver.resolve("   "), None);
        assert_eq!(
            SlugResolver.resolve("Nate Diaz"),
            Some(FighterId::new("nate-diaz"))
        );
    }

    #[test]
    fn resolve_pair_reports_the_unknown_name() {
        let err = resolve_pair(&SlugResolver, "Nate Diaz", " ").unwrap_err();
        assert!(matches!(err, MmaMathError::UnknownFighter(ref n) if n == " "));

        let (a, b) = resolve_pair(&SlugResolver, "Nate Diaz", "Conor McGregor").unwrap();
        assert_eq!(a.as_str(), "nate-diaz");
        assert_eq!(b.as_str(), "conor-mcgregor");
    }
}
