//! # Certificate Chain
//!
//! Decomposition of the fetched PEM material and path validation of the leaf
//! up to the chain's own self-signed root.
//!
//! The root is taken from the fetched material itself. Trust in it comes from
//! the signer URL policy, not from a system store.

use std::time::{SystemTime, UNIX_EPOCH};

use rustls_pki_types::{CertificateDer, ServerName, UnixTime};
use webpki::{EndEntityCert, KeyUsage};
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::ParsedExtension;
use x509_parser::pem::Pem;
use x509_parser::time::ASN1Time;

use super::entities::{CertificateChain, SigningCertificate, SIGNER_DNS_NAME};
use super::errors::VerificationError;

/// Split PEM material into leaf, intermediates and root.
///
/// The first block is the leaf and must parse. Later blocks that do not parse
/// as certificates are skipped. A later certificate whose subject key
/// identifier equals its authority key identifier is the root; if several
/// qualify the last one wins.
pub fn parse_certificate_chain(material: &[u8]) -> Result<CertificateChain, VerificationError> {
    let mut leaf: Option<CertificateDer<'static>> = None;
    let mut root: Option<CertificateDer<'static>> = None;
    let mut intermediates = Vec::new();

    for block in Pem::iter_from_buffer(material) {
        let Ok(block) = block else {
            break;
        };

        let self_issued = match block.parse_x509() {
            Ok(cert) => is_self_issued(&cert),
            Err(_) if leaf.is_none() => return Err(VerificationError::IncompleteChain),
            Err(_) => continue,
        };

        let der = CertificateDer::from(block.contents);
        if leaf.is_none() {
            leaf = Some(der);
        } else if self_issued {
            root = Some(der);
        } else {
            intermediates.push(der);
        }
    }

    match (leaf, root) {
        (Some(leaf), Some(root)) => Ok(CertificateChain {
            leaf,
            intermediates,
            root,
        }),
        _ => Err(VerificationError::IncompleteChain),
    }
}

/// SKI == AKI, with an absent identifier comparing as empty.
fn is_self_issued(cert: &X509Certificate<'_>) -> bool {
    let mut subject_key_id: &[u8] = &[];
    let mut authority_key_id: &[u8] = &[];

    for extension in cert.extensions() {
        match extension.parsed_extension() {
            ParsedExtension::SubjectKeyIdentifier(id) => subject_key_id = id.0,
            ParsedExtension::AuthorityKeyIdentifier(aki) => {
                if let Some(id) = &aki.key_identifier {
                    authority_key_id = id.0;
                }
            }
            _ => {}
        }
    }

    subject_key_id == authority_key_id
}

/// Validate the leaf against the chain's intermediates and root at `now`,
/// then check it is issued to the platform's signer name.
pub fn verify_certificate_chain(
    chain: &CertificateChain,
    now: SystemTime,
) -> Result<SigningCertificate, VerificationError> {
    let anchor = webpki::anchor_from_trusted_cert(&chain.root)
        .map_err(|e| VerificationError::ChainVerificationFailed(format!("root: {e:?}")))?;

    let leaf = EndEntityCert::try_from(&chain.leaf)
        .map_err(|e| VerificationError::ChainVerificationFailed(format!("leaf: {e:?}")))?;

    let since_epoch = now
        .duration_since(UNIX_EPOCH)
        .map_err(|e| VerificationError::ChainVerificationFailed(e.to_string()))?;

    verify_root_validity(&chain.root, since_epoch.as_secs())?;

    leaf.verify_for_usage(
        webpki::ALL_VERIFICATION_ALGS,
        &[anchor],
        &chain.intermediates,
        UnixTime::since_unix_epoch(since_epoch),
        KeyUsage::server_auth(),
        None,
        None,
    )
    .map_err(|e| VerificationError::ChainVerificationFailed(format!("{e:?}")))?;

    let signer = ServerName::try_from(SIGNER_DNS_NAME)
        .map_err(|_| VerificationError::HostnameMismatch)?;
    leaf.verify_is_valid_for_subject_name(&signer)
        .map_err(|_| VerificationError::HostnameMismatch)?;

    Ok(SigningCertificate::new(chain.leaf.clone()))
}

/// A trust anchor carries only subject and key, so path building never
/// looks at the root's validity window. Check it here.
fn verify_root_validity(
    root: &CertificateDer<'_>,
    now_secs: u64,
) -> Result<(), VerificationError> {
    let (_, cert) = x509_parser::parse_x509_certificate(root.as_ref())
        .map_err(|e| VerificationError::ChainVerificationFailed(format!("root: {e}")))?;

    let now = i64::try_from(now_secs)
        .ok()
        .and_then(|secs| ASN1Time::from_timestamp(secs).ok())
        .ok_or_else(|| VerificationError::ChainVerificationFailed("clock out of range".into()))?;

    if !cert.validity().is_valid_at(now) {
        return Err(VerificationError::ChainVerificationFailed(
            "root certificate outside its validity period".into(),
        ));
    }
    Ok(())
}
