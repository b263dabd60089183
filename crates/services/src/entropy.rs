use domains::{DomainError, Result};

/// Fills a fixed-size buffer from the operating system CSPRNG.
pub(crate) fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf)
        .map_err(|e| DomainError::Internal(format!("entropy source unavailable: {e}")))?;
    Ok(buf)
}
