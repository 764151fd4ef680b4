//! Test fixtures: a generated signer PKI, request signing, and an in-memory
//! certificate fetcher.
//!
//! The CA and intermediate use fresh P-256 keys per chain. Every leaf shares
//! one RSA-2048 key so `sign_body` matches any chain built here.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use base64::{engine::general_purpose, Engine as _};
use chrono::{SecondsFormat, Utc};
use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DnType, ExtendedKeyUsagePurpose, IsCa,
    KeyPair, KeyUsagePurpose,
};
use rsa::pkcs1v15;
use rsa::pkcs8::{EncodePrivateKey as _, LineEnding};
use rsa::signature::{SignatureEncoding as _, Signer as _};
use rsa::RsaPrivateKey;
use sha1::Sha1;

use crate::domain::entities::SIGNER_DNS_NAME;
use crate::ports::outbound::{CertificateFetcher, FetchError};

pub const TEST_APPLICATION_ID: &str = "amzn1.ask.skill.00000000-0000-0000-0000-000000000000";
pub const TEST_CHAIN_URL: &str = "https://s3.amazonaws.com/echo.api/echo-api-cert-6-ats.pem";

// =============================================================================
// PKI
// =============================================================================

/// Shape of the generated chain.
#[derive(Clone, Debug)]
pub struct ChainOptions {
    pub expired_leaf: bool,
    pub expired_intermediate: bool,
    pub expired_root: bool,
    pub include_intermediate: bool,
    pub include_root: bool,
    pub leaf_dns_name: String,
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self {
            expired_leaf: false,
            expired_intermediate: false,
            expired_root: false,
            include_intermediate: true,
            include_root: true,
            leaf_dns_name: SIGNER_DNS_NAME.to_string(),
        }
    }
}

/// A generated chain, both as the concatenated PEM a fetcher would return
/// and as individual certificates.
#[derive(Clone, Debug)]
pub struct TestPki {
    pub pem: Vec<u8>,
    pub leaf_pem: String,
    pub intermediate_pem: String,
    pub root_pem: String,
    pub leaf_der: Vec<u8>,
    pub intermediate_der: Vec<u8>,
    pub root_der: Vec<u8>,
}

fn rsa_leaf_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut rng = rand::rngs::OsRng;
        RsaPrivateKey::new(&mut rng, 2048).expect("generate RSA leaf key")
    })
}

fn rsa_leaf_key_pem() -> &'static str {
    static PEM: OnceLock<String> = OnceLock::new();
    PEM.get_or_init(|| {
        rsa_leaf_key()
            .to_pkcs8_pem(LineEnding::LF)
            .expect("encode RSA leaf key")
            .to_string()
    })
}

fn mark_expired(params: &mut CertificateParams) {
    params.not_before = rcgen::date_time_ymd(2000, 1, 1);
    params.not_after = rcgen::date_time_ymd(2001, 1, 1);
}

fn ca_params(common_name: &str, expired: bool) -> CertificateParams {
    let mut params = CertificateParams::default();
    params
        .distinguished_name
        .push(DnType::CommonName, common_name);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![
        KeyUsagePurpose::KeyCertSign,
        KeyUsagePurpose::CrlSign,
        KeyUsagePurpose::DigitalSignature,
    ];
    params.use_authority_key_identifier_extension = true;
    if expired {
        mark_expired(&mut params);
    }
    params
}

/// Generate root -> intermediate -> leaf, shaped by `options`.
pub fn build_chain(options: &ChainOptions) -> TestPki {
    let root_key = KeyPair::generate().expect("root key");
    let root: Certificate = ca_params("Test Signer Root CA", options.expired_root)
        .self_signed(&root_key)
        .expect("root cert");

    let intermediate_key = KeyPair::generate().expect("intermediate key");
    let intermediate = ca_params("Test Signer Intermediate CA", options.expired_intermediate)
        .signed_by(&intermediate_key, &root, &root_key)
        .expect("intermediate cert");

    let mut leaf_params =
        CertificateParams::new(vec![options.leaf_dns_name.clone()]).expect("leaf params");
    leaf_params
        .distinguished_name
        .push(DnType::CommonName, options.leaf_dns_name.as_str());
    leaf_params.is_ca = IsCa::ExplicitNoCa;
    leaf_params.key_usages = vec![
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::KeyEncipherment,
    ];
    leaf_params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
    leaf_params.use_authority_key_identifier_extension = true;
    if options.expired_leaf {
        mark_expired(&mut leaf_params);
    }

    let leaf_key = KeyPair::from_pem(rsa_leaf_key_pem()).expect("load RSA leaf key");
    let leaf = leaf_params
        .signed_by(&leaf_key, &intermediate, &intermediate_key)
        .expect("leaf cert");

    let mut pem = leaf.pem().into_bytes();
    if options.include_intermediate {
        pem.extend_from_slice(intermediate.pem().as_bytes());
    }
    if options.include_root {
        pem.extend_from_slice(root.pem().as_bytes());
    }

    TestPki {
        pem,
        leaf_pem: leaf.pem(),
        intermediate_pem: intermediate.pem(),
        root_pem: root.pem(),
        leaf_der: leaf.der().to_vec(),
        intermediate_der: intermediate.der().to_vec(),
        root_der: root.der().to_vec(),
    }
}

/// PEM of a valid chain, generated once per process.
pub fn valid_chain_pem() -> Vec<u8> {
    static PKI: OnceLock<TestPki> = OnceLock::new();
    PKI.get_or_init(|| build_chain(&ChainOptions::default()))
        .pem
        .clone()
}

// =============================================================================
// Request signing
// =============================================================================

/// Base64 SHA-1/RSA signature of `body` under the shared leaf key.
pub fn sign_body(body: &[u8]) -> String {
    let signing_key = pkcs1v15::SigningKey::<Sha1>::new(rsa_leaf_key().clone());
    let signature = signing_key.sign(body);
    general_purpose::STANDARD.encode(signature.to_bytes())
}

/// RFC 3339 timestamp `offset` away from now.
pub fn now_timestamp(offset: chrono::Duration) -> String {
    (Utc::now() + offset).to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// Fetcher
// =============================================================================

/// Fetcher that returns fixed material and counts calls. Clones share the counter.
#[derive(Clone)]
pub struct StaticFetcher {
    response: Result<Vec<u8>, FetchError>,
    calls: Arc<AtomicUsize>,
}

impl StaticFetcher {
    pub fn new(material: Vec<u8>) -> Self {
        Self {
            response: Ok(material),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(error: FetchError) -> Self {
        Self {
            response: Err(error),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CertificateFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}
