//! Random short code generation.
//!
//! The generator is pure: it draws from a fixed alphabet with no
//! shared state and no knowledge of what codes already exist.
//! Collision detection lives with the caller, which claims the code
//! against the database and retries on conflict.

/// Character set for generating short codes.
const ALPHABET_CHARS: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M',
    'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
    'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Generate a random short code of the given length.
///
/// Every call is an independent draw; repeated calls do not leak
/// insertion order. The code space for the default length of 6 is
/// 62^6, so collisions are rare but possible.
pub fn generate(length: usize) -> String {
    nanoid::nanoid!(length, ALPHABET_CHARS)
}
