//!
//! [Error] enum definition
//!
use std::io;

use x509_parser::error::X509Error;

/// Possible errors for certificate extraction
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error("Certificate decoding error: {0}")]
    DecodeError(String),

    #[error("Certificate parse error: {0}")]
    CertificateParseError(#[from] x509_parser::nom::Err<X509Error>),

    #[error("Missing certificate field: {0}")]
    MissingFieldError(&'static str),

    #[error("Malformed SubjectAltName extension: {0}")]
    MalformedExtensionError(#[source] der::Error),

    #[error("Malformed QCStatement attribute: {0}")]
    MalformedAttributeError(#[source] der::Error),

    #[error("Output buffer too small: {required} entries required, {available} available")]
    BufferTooSmall { required: usize, available: usize },
}
