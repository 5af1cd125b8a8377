use hex;
use rand::RngCore;
use rand::rngs::OsRng;

use ::error::MultipartError;

/// number of random bytes a generated boundary is made of
pub const BOUNDARY_ENTROPY_BYTES: usize = 30;

/// create a random boundary using the OS random source
///
/// See `create_boundary_with`.
pub fn create_random_boundary() -> Result<String, MultipartError> {
    create_boundary_with(&mut OsRng)
}

/// create a boundary from `BOUNDARY_ENTROPY_BYTES` bytes drawn from `rng`
///
/// The bytes are rendered as lowercase hex, so the boundary is 60 chars
/// long and only consists of chars valid in any boundary (rfc2046 `bchars`)
/// making quoting unnecessary. Which also means the chance of the
/// boundary accidentally (or through random malicious input) appearing
/// in a part body is negligible.
///
/// The random source should be cryptographically strong if the content
/// of the parts is not trusted, tests can pass in a seeded rng to get
/// deterministic boundaries.
pub fn create_boundary_with<R>(rng: &mut R) -> Result<String, MultipartError>
    where R: RngCore + ?Sized
{
    let mut bytes = [0u8; BOUNDARY_ENTROPY_BYTES];
    rng.try_fill_bytes(&mut bytes)
        .map_err(MultipartError::EntropyUnavailable)?;

    Ok(hex::encode(bytes))
}

/// the value for the `Content-Type` header of a form-data body using `boundary`
pub fn form_data_content_type(boundary: &str) -> String {
    format!("multipart/form-data; boundary={}", boundary)
}
