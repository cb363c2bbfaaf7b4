//! Display names for negotiated TLS parameters.
//!
//! Version codes are the on-the-wire `ProtocolVersion` values. The cipher
//! suite table is an allowlist: codes missing from it render as
//! `Unknown (<decimal code>)` rather than being treated as invalid.

pub const TLS_1_0: u16 = 0x0301;
pub const TLS_1_1: u16 = 0x0302;
pub const TLS_1_2: u16 = 0x0303;
pub const TLS_1_3: u16 = 0x0304;

pub const TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256: u16 = 0xc02f;
pub const TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384: u16 = 0xc030;

/// Cipher suites rendered by their IANA name. Extend as needed.
const KNOWN_CIPHER_SUITES: &[(u16, &str)] = &[
    (
        TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
        "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256",
    ),
    (
        TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
        "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384",
    ),
];

/// Human-readable name for a TLS protocol version code.
pub fn version_name(version: u16) -> String {
    match version {
        TLS_1_0 => "TLS 1.0".to_string(),
        TLS_1_1 => "TLS 1.1".to_string(),
        TLS_1_2 => "TLS 1.2".to_string(),
        TLS_1_3 => "TLS 1.3".to_string(),
        other => unknown(other),
    }
}

/// Human-readable name for a cipher suite code.
pub fn cipher_suite_name(suite: u16) -> String {
    KNOWN_CIPHER_SUITES
        .iter()
        .find(|(code, _)| *code == suite)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| unknown(suite))
}

fn unknown(code: u16) -> String {
    format!("Unknown ({})", code)
}
