use crate::shared::fs_atomic::atomic_write_file;
use std::path::{Path, PathBuf};

pub const API_TOKEN_FILE_NAME: &str = "api_token.txt";
pub const API_HASH_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("Invalid hash")]
    InvalidHash,
    #[error("Invalid ID")]
    InvalidId,
}

/// Accepts exactly 32 hexadecimal characters, either case.
pub fn validate_api_hash(raw: &str) -> Result<&str, CredentialError> {
    if raw.len() != API_HASH_LEN || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CredentialError::InvalidHash);
    }
    Ok(raw)
}

pub fn validate_api_id(raw: &str) -> Result<&str, CredentialError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CredentialError::InvalidId);
    }
    Ok(raw)
}

/// `data_root` when given, else the directory holding the application's base
/// directory.
pub fn resolve_token_path(data_root: Option<&Path>, base_dir: &Path) -> PathBuf {
    let dir = match data_root {
        Some(root) => root,
        None => base_dir.parent().unwrap_or(base_dir),
    };
    dir.join(API_TOKEN_FILE_NAME)
}

/// Overwrites the token file with the ID line followed by the hash line.
pub fn write_api_token(path: &Path, id: &str, hash: &str) -> std::io::Result<()> {
    atomic_write_file(path, format!("{id}\n{hash}\n").as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_must_be_32_hex_characters() {
        let valid = "0123456789abcdefABCDEF0123456789";
        assert_eq!(validate_api_hash(valid), Ok(valid));
        assert_eq!(
            validate_api_hash(&valid[..31]),
            Err(CredentialError::InvalidHash)
        );
        assert_eq!(
            validate_api_hash("0123456789abcdefABCDEF012345678g"),
            Err(CredentialError::InvalidHash)
        );
        assert_eq!(
            validate_api_hash("é123456789abcdefABCDEF012345678"),
            Err(CredentialError::InvalidHash)
        );
    }

    #[test]
    fn id_must_be_non_empty_digits() {
        assert_eq!(validate_api_id("123456"), Ok("123456"));
        assert_eq!(validate_api_id(""), Err(CredentialError::InvalidId));
        assert_eq!(validate_api_id("12a"), Err(CredentialError::InvalidId));
        assert_eq!(validate_api_id("-12"), Err(CredentialError::InvalidId));
    }

    #[test]
    fn token_path_prefers_data_root() {
        assert_eq!(
            resolve_token_path(Some(Path::new("/data")), Path::new("/opt/app/bin")),
            PathBuf::from("/data/api_token.txt")
        );
        assert_eq!(
            resolve_token_path(None, Path::new("/opt/app/bin")),
            PathBuf::from("/opt/app/api_token.txt")
        );
        assert_eq!(
            resolve_token_path(None, Path::new("/")),
            PathBuf::from("/api_token.txt")
        );
    }
}
