// Password hashing with scrypt (N=16384, r=16, p=1, dkLen=64) and a
// random 16-byte salt. Stored format: "hex(salt):hex(key)".

use rand::RngCore;
use scrypt::{scrypt, Params};

use bazaar_core::error::CommerceError;

/// Hash a password. Returns `salt:key`, both hex-encoded.
pub fn hash_password(password: &str) -> Result<String, CommerceError> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt_hex = hex::encode(salt_bytes);

    let key = generate_key(password, &salt_hex)?;
    Ok(format!("{}:{}", salt_hex, hex::encode(key)))
}

/// Verify a password against a hash produced by [`hash_password`].
pub fn verify_password(hash: &str, password: &str) -> Result<bool, CommerceError> {
    let (salt, key_hex) = hash
        .split_once(':')
        .ok_or_else(|| CommerceError::Crypto("Invalid password hash format".into()))?;

    let expected_key = hex::decode(key_hex)
        .map_err(|e| CommerceError::Crypto(format!("Invalid hex in password hash: {e}")))?;

    let derived_key = generate_key(password, salt)?;

    Ok(subtle::ConstantTimeEq::ct_eq(derived_key.as_slice(), expected_key.as_slice()).into())
}

/// Derive a 64-byte key. N=16384 → log2(N)=14.
fn generate_key(password: &str, salt: &str) -> Result<Vec<u8>, CommerceError> {
    let params = Params::new(14, 16, 1, 64)
        .map_err(|e| CommerceError::Crypto(format!("Invalid scrypt params: {e}")))?;

    let mut output = vec![0u8; 64];
    scrypt(password.as_bytes(), salt.as_bytes(), &params, &mut output)
        .map_err(|e| CommerceError::Crypto(format!("scrypt failed: {e}")))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let password = "my-secret-password";
        let hash = hash_password(password).unwrap();

        let parts: Vec<&str> = hash.split(':').collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 32); // 16-byte salt
        assert_eq!(parts[1].len(), 128); // 64-byte key

        assert!(verify_password(&hash, password).unwrap());
        assert!(!verify_password(&hash, "wrong-password").unwrap());
    }

    #[test]
    fn salts_differ_per_call() {
        let hash1 = hash_password("same-password").unwrap();
        let hash2 = hash_password("same-password").unwrap();
        assert_ne!(hash1, hash2);
        assert!(verify_password(&hash1, "same-password").unwrap());
        assert!(verify_password(&hash2, "same-password").unwrap());
    }

    #[test]
    fn invalid_hash_format_errors() {
        assert!(verify_password("no-colon-here", "password").is_err());
    }
}
