//!
//! Extraction of PSD2 regulatory identity fields from qualified website authentication certificates (QWAC).
//!
//! The input is a PEM, bare base64 or `%0A`-escaped base64 X.509 certificate. The result is a [CertInfo]
//! holding a fixed set of fields: subject organization and country, subject serial number, issuer
//! organization, validity range, and the PSD2 licence ID and role list.
//!
//! PSD2 identifiers live in the SubjectAltName extension, inside a directoryName entry whose attributes
//! are `2.5.4.54` (licence ID) and `2.5.4.13` (role). Other SubjectAltName entries are skipped, see
//! [Psd2Extension].
//!
//! ```no_run
//! let pem = std::fs::read_to_string("qwac.pem").unwrap();
//! let info = psd2_qwac::extract(&pem).unwrap();
//! print!("{info}");
//! ```
//!
//! The certificate is neither validated nor checked for revocation.
//!

mod cert;
pub mod error;
mod extractor;
pub mod ffi;
mod info;
mod oid;
pub mod pem;
mod psd2;

use std::io::Read;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, error::Error>;

pub use cert::{Certificate, Extension, Name};
pub use extractor::{Extractor, IssuerCommonName};
pub use info::{CertInfo, Entries, Field};
pub use psd2::{GeneralNameEntry, Psd2Extension, QcAttribute};

/// Extract fields from a certificate string with default settings
pub fn extract(input: &str) -> Result<CertInfo> {
    Extractor::new().extract(input)
}

/// Read the whole stream as a certificate string and extract fields with default settings
pub fn extract_from_reader<R: Read>(reader: R) -> Result<CertInfo> {
    Extractor::new().extract_from_reader(reader)
}
