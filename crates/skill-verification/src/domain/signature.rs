//! # Request Signature
//!
//! SHA-1 with RSA (PKCS#1 v1.5) over the exact request body, keyed by the
//! validated leaf certificate.

use base64::{engine::general_purpose, Engine as _};
use rsa::pkcs1v15;
use rsa::pkcs8::DecodePublicKey as _;
use rsa::signature::Verifier as _;
use rsa::RsaPublicKey;
use sha1::Sha1;

use super::entities::SigningCertificate;
use super::errors::VerificationError;

/// Verify the base64 `Signature` header value against `body`.
///
/// A leaf whose key is not RSA can never match and yields `SignatureMismatch`.
pub fn verify_signature(
    certificate: &SigningCertificate,
    body: &[u8],
    encoded_signature: &str,
) -> Result<(), VerificationError> {
    let raw = general_purpose::STANDARD
        .decode(encoded_signature)
        .map_err(|_| VerificationError::InvalidEncoding)?;

    let key = rsa_public_key(certificate)?;
    let verifying_key = pkcs1v15::VerifyingKey::<Sha1>::new(key);
    let signature = pkcs1v15::Signature::try_from(raw.as_slice())
        .map_err(|_| VerificationError::SignatureMismatch)?;

    verifying_key
        .verify(body, &signature)
        .map_err(|_| VerificationError::SignatureMismatch)
}

fn rsa_public_key(certificate: &SigningCertificate) -> Result<RsaPublicKey, VerificationError> {
    let (_, cert) = x509_parser::parse_x509_certificate(certificate.der())
        .map_err(|_| VerificationError::SignatureMismatch)?;

    RsaPublicKey::from_public_key_der(cert.public_key().raw)
        .map_err(|_| VerificationError::SignatureMismatch)
}
