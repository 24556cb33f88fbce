use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::TryRngCore;
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;

use crate::error::CsrfError;

/// Cookie values shorter than this are ignored and replaced.
pub const MIN_TOKEN_LEN: usize = 16;

/// `n` bytes from the OS CSPRNG as unpadded URL-safe base64. Fails only if
/// the random source does.
pub fn generate_token(n: usize) -> Result<String, CsrfError> {
    generate_token_from(&mut OsRng, n)
}

pub(crate) fn generate_token_from<R: TryRngCore>(rng: &mut R, n: usize) -> Result<String, CsrfError> {
    let mut buf = vec![0u8; n];
    rng.try_fill_bytes(&mut buf)
        .map_err(|e| CsrfError::RandomSource(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(&buf))
}

#[cfg(test)]
pub(crate) struct FailingRng;

#[cfg(test)]
impl TryRngCore for FailingRng {
    type Error = std::io::Error;

    fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
        Err(std::io::Error::other("entropy source unavailable"))
    }

    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        Err(std::io::Error::other("entropy source unavailable"))
    }

    fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> Result<(), Self::Error> {
        Err(std::io::Error::other("entropy source unavailable"))
    }
}

/// Constant-time comparison; different lengths are simply unequal.
pub fn eq_tokens(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
