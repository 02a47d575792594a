//! Session code generation.
//!
//! Session codes are short uppercase strings players read to each other, so
//! they use Crockford's Base32 alphabet (no I, L, O, U).

use rand::Rng;

use crate::domain::rules::SESSION_CODE_LEN;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

/// Generate a candidate session code.
///
/// Uniqueness is not guaranteed here; the session store retries on
/// collision.
///
/// # Example
/// ```
/// use duel_backend::utils::join_code::{generate_join_code, is_valid_join_code};
///
/// let code = generate_join_code(&mut rand::rng());
/// assert_eq!(code.len(), 6);
/// assert!(is_valid_join_code(&code));
/// ```
pub fn generate_join_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SESSION_CODE_LEN)
        .map(|_| CROCKFORD[rng.random_range(0..CROCKFORD.len())] as char)
        .collect()
}

/// True when `code` has the shape of a generated session code.
pub fn is_valid_join_code(code: &str) -> bool {
    code.len() == SESSION_CODE_LEN && code.bytes().all(|b| CROCKFORD.contains(&b))
}
