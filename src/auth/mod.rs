//! Panel access gate.
//!
//! A fixed in-source credential roster guards the editor. The password
//! "hash" is the site's historical 32-bit shift-and-subtract checksum; it is
//! a UX gate against casual clicking, not a security boundary, and nothing
//! here may be relied on to protect real secrets. The comparison is
//! constant-time anyway, purely out of habit.

use subtle::ConstantTimeEq;

use crate::errors::AppError;
use crate::models::SessionToken;
use crate::store::{keys, StoreAccessor};

/// A roster entry: username, checksum of the password, role.
#[derive(Debug, Clone, Copy)]
pub struct Credential {
    pub username: &'static str,
    pub password_hash: &'static str,
    pub role: &'static str,
}

/// The fixed developer roster. Hashes are `hash_password` outputs of the
/// historical passwords; regenerate with that function when rotating.
pub const DEVELOPERS: [Credential; 5] = [
    Credential { username: "locolopez", password_hash: "1626350670", role: "admin" },
    Credential { username: "mickeymouse", password_hash: "2057309739", role: "admin" },
    Credential { username: "cova", password_hash: "1536808068", role: "admin" },
    Credential { username: "lackstress", password_hash: "2018166324", role: "owner" },
    Credential { username: "sumo", password_hash: "746478367", role: "admin" },
];

/// The site's toy checksum: `h = (h << 5) - h + byte` over UTF-16 code
/// units, wrapping at 32 bits, rendered as a decimal string.
pub fn hash_password(password: &str) -> String {
    let mut hash: i32 = 0;
    for unit in password.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(unit as i32);
    }
    hash.to_string()
}

/// Check a username/password pair against the roster. Username matching is
/// case-insensitive. Returns the session record on success; on any failure
/// (unknown user or wrong password alike) returns `None`.
pub fn validate_credentials(username: &str, password: &str) -> Option<SessionToken> {
    let user = DEVELOPERS
        .iter()
        .find(|d| d.username.eq_ignore_ascii_case(username))?;

    if constant_time_compare(&hash_password(password), user.password_hash) {
        Some(SessionToken {
            username: user.username.to_string(),
            role: user.role.to_string(),
        })
    } else {
        None
    }
}

/// Validate credentials and persist the session token. The error is the
/// same generic `InvalidCredentials` for unknown-username and
/// wrong-password, so the form cannot be used to enumerate users.
pub async fn login(
    store: &StoreAccessor,
    username: &str,
    password: &str,
) -> Result<SessionToken, AppError> {
    match validate_credentials(username, password) {
        Some(token) => {
            store.save(keys::SESSION, &token).await;
            tracing::info!("Login: {} ({})", token.username, token.role);
            Ok(token)
        }
        None => {
            tracing::warn!("Failed login attempt for {:?}", username);
            Err(AppError::InvalidCredentials)
        }
    }
}

/// Remove the session token. Safe to call when already logged out.
pub async fn logout(store: &StoreAccessor) {
    store.remove(keys::SESSION).await;
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    // Constant-time comparison
    a_bytes.ct_eq(b_bytes).into()
}
