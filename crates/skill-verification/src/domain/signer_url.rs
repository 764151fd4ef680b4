//! # Signer URL Policy
//!
//! Allow-list check on the `SignatureCertChainUrl` header before anything is
//! fetched from it.
//!
//! `url::Url` normalizes the default port away and resolves dot segments, so
//! it is only used for well-formedness and the scheme. The port split and the
//! path prefix are checked against the raw text of the header.

use percent_encoding::percent_decode_str;
use url::Url;

use super::entities::{TRUSTED_HOST, TRUSTED_PATH_PREFIX, TRUSTED_PORT, TRUSTED_SCHEME};
use super::errors::VerificationError;

/// Validate a certificate chain URL against the platform's publishing location.
///
/// Checks, in order: parses as a URL, scheme is `https`, authority is
/// `host[:port]` with port `443` if present, host equals the trusted host
/// ignoring case, path starts with the trusted prefix (literal, case-sensitive).
pub fn verify_signer_url(raw: &str) -> Result<(), VerificationError> {
    let parsed = Url::parse(raw).map_err(|e| VerificationError::InvalidUrl(e.to_string()))?;

    if parsed.scheme() != TRUSTED_SCHEME {
        return Err(VerificationError::UntrustedScheme);
    }

    let (authority, path) = split_raw(raw);

    let host = if authority.contains(':') {
        let parts: Vec<&str> = authority.split(':').collect();
        if parts.len() != 2 {
            return Err(VerificationError::InvalidHostFormat);
        }
        if parts[1] != TRUSTED_PORT {
            return Err(VerificationError::UntrustedPort);
        }
        parts[0]
    } else {
        authority
    };

    if !host.eq_ignore_ascii_case(TRUSTED_HOST) {
        return Err(VerificationError::UntrustedHost);
    }

    let path = percent_decode_str(path).decode_utf8_lossy();
    if !path.starts_with(TRUSTED_PATH_PREFIX) {
        return Err(VerificationError::UntrustedPath);
    }

    Ok(())
}

/// Split the raw input into its authority (userinfo removed) and its path,
/// without any normalization.
fn split_raw(raw: &str) -> (&str, &str) {
    let trimmed = raw.trim_matches(|c: char| c <= ' ');
    let after_scheme = trimmed
        .split_once(':')
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);
    let hierarchical = after_scheme.trim_start_matches(['/', '\\']);

    let authority_end = hierarchical
        .find(['/', '\\', '?', '#'])
        .unwrap_or(hierarchical.len());
    let (authority, rest) = hierarchical.split_at(authority_end);

    let authority = authority
        .rsplit_once('@')
        .map(|(_, host)| host)
        .unwrap_or(authority);

    let path_end = rest.find(['?', '#']).unwrap_or(rest.len());
    (authority, &rest[..path_end])
}
