//! Client-side credential generation.
//!
//! Local-parts and passwords are drawn uniformly from lowercase ASCII
//! letters and digits with the thread-local RNG. They only have to be
//! unlikely to collide on the provider, not secret.

use rand::Rng;

/// Characters generated credentials are drawn from.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Returns a random string of `len` characters from [`ALPHABET`].
#[must_use]
pub fn random_string(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect()
}

/// A generated address and password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Full address, `local-part@domain`.
    pub address: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Generates credentials under `domain`, never returning `avoid`.
    #[must_use]
    pub fn generate(
        domain: &str,
        local_part_len: usize,
        password_len: usize,
        avoid: Option<&str>,
    ) -> Self {
        let address = loop {
            let candidate = format!("{}@{domain}", random_string(local_part_len));
            if avoid != Some(candidate.as_str()) {
                break candidate;
            }
        };
        Self {
            address,
            password: random_string(password_len),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("address", &self.address)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn is_lower_alnum(s: &str) -> bool {
        s.bytes().all(|b| ALPHABET.contains(&b))
    }

    proptest! {
        #[test]
        fn random_string_has_length_and_alphabet(len in 0usize..64) {
            let s = random_string(len);
            prop_assert_eq!(s.len(), len);
            prop_assert!(is_lower_alnum(&s));
        }

        #[test]
        fn generated_credentials_are_well_formed(local in 1usize..32, password in 1usize..32) {
            let creds = Credentials::generate("example.com", local, password, None);
            let (local_part, domain) = creds.address.split_once('@').unwrap_or_default();
            prop_assert_eq!(domain, "example.com");
            prop_assert_eq!(local_part.len(), local);
            prop_assert!(is_lower_alnum(local_part));
            prop_assert_eq!(creds.password.len(), password);
            prop_assert!(is_lower_alnum(&creds.password));
        }
    }

    #[test]
    fn test_avoid_is_never_returned() {
        // With a single-character local part a collision is likely within
        // a few draws, so this exercises the retry path.
        for _ in 0..200 {
            let creds = Credentials::generate("example.com", 1, 4, Some("a@example.com"));
            assert_ne!(creds.address, "a@example.com");
        }
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::generate("example.com", 10, 12, None);
        let rendered = format!("{creds:?}");
        assert!(rendered.contains(&creds.address));
        assert!(!rendered.contains(&creds.password));
    }
}
