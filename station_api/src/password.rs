use argon2::{
    Argon2,
    password_hash::{
        Error, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use std::sync::LazyLock;
use tracing::warn;

/// Stand-in hash checked when the username is unknown, so a failed login costs
/// one argon2 verification whether or not the user exists.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash_password("station-api-dummy-password").unwrap_or_else(|e| {
        warn!(error = %e, "failed to build dummy password hash");
        String::new()
    })
});

/// Hashes `password` with a fresh random salt into a PHC string.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Returns false for a mismatch and for a stored hash that cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Verifies against the stored hash, or against [`DUMMY_HASH`] when there is
/// none. Without a stored hash the result is always false.
pub fn verify_password_or_dummy(password: &str, password_hash: Option<&str>) -> bool {
    match password_hash {
        Some(password_hash) => verify_password(password, password_hash),
        None => {
            verify_password(password, &DUMMY_HASH);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("p1").unwrap();
        assert_ne!(hash, "p1");
        assert!(verify_password("p1", &hash));
        assert!(!verify_password("p2", &hash));
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_password("p1").unwrap(), hash_password("p1").unwrap());
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("p1", "p1"));
    }

    #[test]
    fn dummy_hash_is_a_real_argon2_hash() {
        let parsed = PasswordHash::new(&DUMMY_HASH).unwrap();
        assert_eq!(parsed.algorithm, argon2::Algorithm::Argon2id.ident());
    }

    #[test]
    fn missing_hash_never_verifies() {
        assert!(!verify_password_or_dummy("station-api-dummy-password", None));
        assert!(!verify_password_or_dummy("p1", None));
    }

    #[test]
    fn stored_hash_is_used_when_present() {
        let hash = hash_password("p1").unwrap();
        assert!(verify_password_or_dummy("p1", Some(&hash)));
        assert!(!verify_password_or_dummy("p2", Some(&hash)));
    }
}
