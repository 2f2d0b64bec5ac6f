// src/auth/password.rs
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::auth::token::{encode_url_safe, same_bytes};

const SCHEME: &str = "pbkdf2-sha256";
const SALT_BYTES: usize = 16;
const KEY_BYTES: usize = 32;

/// Hash a password as `pbkdf2-sha256$<rounds>$<salt>$<key>`.
/// The round count travels with the hash, so it can be raised later
/// without invalidating stored passwords.
pub fn hash_password(password: &str, rounds: u32) -> String {
    let mut salt = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut salt);
    hash_with_salt(password, &salt, rounds)
}

fn hash_with_salt(password: &str, salt: &[u8], rounds: u32) -> String {
    let key = derive(password, salt, rounds);
    format!(
        "{SCHEME}${rounds}${}${}",
        encode_url_safe(salt),
        encode_url_safe(&key)
    )
}

fn derive(password: &str, salt: &[u8], rounds: u32) -> [u8; KEY_BYTES] {
    let mut key = [0u8; KEY_BYTES];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, rounds, &mut key);
    key
}

/// False for a wrong password and for a stored value that is not one of ours.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(SCHEME), Some(rounds), Some(salt), Some(key), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let (Ok(rounds), Ok(salt), Ok(expected)) = (
        rounds.parse::<u32>(),
        engine.decode(salt),
        engine.decode(key),
    ) else {
        return false;
    };
    if rounds == 0 {
        return false;
    }

    same_bytes(&derive(password, &salt, rounds), &expected)
}
