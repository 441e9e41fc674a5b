use rand::Rng;

/// Password alphabet: letters, digits, and a fixed symbol set. Deliberately
/// excludes quote and backslash characters so the generated value can be
/// embedded in a `CREATE USER ... IDENTIFIED BY` string literal.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

pub const DEFAULT_LENGTH: usize = 16;

/// Generate a random password of exactly `length` characters.
///
/// `rand::rng()` is CSPRNG-backed, so the output is suitable for
/// credential material.
pub fn generate(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}
