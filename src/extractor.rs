use std::io::Read;

use tracing::debug;

use crate::{Result, cert::Certificate, info::CertInfo, pem, psd2::Psd2Extension};

/// Source of the `certIssuerCommonName` field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum IssuerCommonName {
    /// First issuer organization (O), same value as `certIssuerOrganization`
    #[default]
    Organization,
    /// First issuer common name (CN)
    CommonName,
}

/// Certificate field extractor
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    issuer_common_name: IssuerCommonName,
}

impl Extractor {
    /// Create extractor with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source of the issuer common name. Default is [IssuerCommonName::Organization]
    pub fn issuer_common_name(mut self, source: IssuerCommonName) -> Self {
        self.issuer_common_name = source;
        self
    }

    /// Extract fields from a PEM, bare base64 or `%0A`-escaped base64 certificate string
    pub fn extract(&self, input: &str) -> Result<CertInfo> {
        let pem = pem::normalize(input);
        let cert = Certificate::from_pem(pem.as_bytes())?;
        self.extract_certificate(&cert)
    }

    /// Read the whole stream as a certificate string and extract fields from it
    pub fn extract_from_reader<R: Read>(&self, mut reader: R) -> Result<CertInfo> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        debug!(len = input.len(), "read certificate input");
        self.extract(&input)
    }

    /// Extract fields from a parsed certificate
    pub fn extract_certificate(&self, cert: &Certificate) -> Result<CertInfo> {
        let mut info = CertInfo::from_basic_fields(cert, self.issuer_common_name)?;
        let psd2 = Psd2Extension::from_extensions(cert.extensions())?;
        info.set_psd2(&psd2);
        Ok(info)
    }
}
