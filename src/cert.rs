use std::fmt;

use der::asn1::ObjectIdentifier;
use tracing::debug;
use x509_parser::{
    asn1_rs::Tag,
    error::X509Error,
    pem::parse_x509_pem,
    time::ASN1Time,
    x509::{AttributeTypeAndValue, X509Name},
};

use crate::{Result, error::Error, oid};

/// Raw certificate extension: dotted OID and the undecoded extension value
#[derive(Clone, PartialEq, Eq)]
pub struct Extension {
    pub(crate) oid: String,
    pub(crate) raw_oid: Vec<u8>,
    pub(crate) value: Vec<u8>,
}

impl Extension {
    /// Create an extension from an OID and its DER-encoded value
    pub fn new(oid: ObjectIdentifier, value: impl Into<Vec<u8>>) -> Self {
        Self {
            oid: oid.to_string(),
            raw_oid: oid.as_bytes().to_vec(),
            value: value.into(),
        }
    }

    /// Get extension OID in dotted form
    pub fn oid(&self) -> &str {
        &self.oid
    }

    /// Get raw extension value
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Returns true if the extension is identified by a given OID
    pub fn is(&self, oid: &ObjectIdentifier) -> bool {
        self.raw_oid == oid.as_bytes()
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("oid", &self.oid)
            .field("value", &hex::encode(&self.value))
            .finish()
    }
}

/// Distinguished name attributes read by the extractor.
///
/// Every sequence keeps the certificate order and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Name {
    pub(crate) organization: Vec<String>,
    pub(crate) country: Vec<String>,
    pub(crate) common_name: Vec<String>,
    pub(crate) serial_number: String,
}

impl Name {
    fn from_x509(name: &X509Name<'_>) -> Self {
        Self {
            organization: name.iter_organization().map(attribute_to_string).collect(),
            country: name.iter_country().map(attribute_to_string).collect(),
            common_name: name.iter_common_name().map(attribute_to_string).collect(),
            serial_number: name
                .iter_attributes()
                .filter(|attr| attr.attr_type().as_bytes() == oid::SERIAL_NUMBER_OID.as_bytes())
                .last()
                .map(attribute_to_string)
                .unwrap_or_default(),
        }
    }

    /// Get organization (O) values
    pub fn organization(&self) -> &[String] {
        &self.organization
    }

    /// Get country (C) values
    pub fn country(&self) -> &[String] {
        &self.country
    }

    /// Get common name (CN) values
    pub fn common_name(&self) -> &[String] {
        &self.common_name
    }

    /// Get serialNumber attribute, empty string if absent
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }
}

// BMPString is UTF-16BE, TeletexString is read as Latin-1, anything else as lossy UTF-8
fn attribute_to_string(attr: &AttributeTypeAndValue<'_>) -> String {
    if let Ok(s) = attr.as_str() {
        return s.to_owned();
    }

    let value = attr.attr_value();
    match value.tag() {
        Tag::BmpString => match value.as_bmpstring() {
            Ok(s) => s.string(),
            Err(_) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
        },
        Tag::TeletexString => value.as_bytes().iter().copied().map(char::from).collect(),
        _ => String::from_utf8_lossy(attr.as_slice()).into_owned(),
    }
}

/// Parsed X.509 certificate
#[derive(Clone, PartialEq, Eq)]
pub struct Certificate {
    pub(crate) data: Vec<u8>,
    pub(crate) subject: Name,
    pub(crate) issuer: Name,
    pub(crate) not_before: ASN1Time,
    pub(crate) not_after: ASN1Time,
    pub(crate) extensions: Vec<Extension>,
}

impl Certificate {
    /// Create certificate from the first PEM block in the input.
    /// Any bytes left after the END line are rejected.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let (rest, pem) = parse_x509_pem(pem).map_err(|e| Error::DecodeError(e.to_string()))?;

        if !rest.is_empty() {
            return Err(Error::DecodeError(format!(
                "{} trailing bytes after PEM block",
                rest.len()
            )));
        }

        Self::from_der(&pem.contents)
    }

    /// Create certificate from DER encoding
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let (rest, cert) = x509_parser::parse_x509_certificate(der)?;

        if !rest.is_empty() {
            return Err(Error::CertificateParseError(x509_parser::nom::Err::Error(
                X509Error::InvalidCertificate,
            )));
        }

        let extensions = cert
            .extensions()
            .iter()
            .map(|ext| Extension {
                oid: ext.oid.to_id_string(),
                raw_oid: ext.oid.as_bytes().to_vec(),
                value: ext.value.to_vec(),
            })
            .collect::<Vec<_>>();

        debug!(
            subject = %cert.subject(),
            extensions = extensions.len(),
            "decoded certificate"
        );

        Ok(Self {
            data: der.to_vec(),
            subject: Name::from_x509(cert.subject()),
            issuer: Name::from_x509(cert.issuer()),
            not_before: cert.validity().not_before,
            not_after: cert.validity().not_after,
            extensions,
        })
    }

    /// Get certificate subject
    pub fn subject(&self) -> &Name {
        &self.subject
    }

    /// Get certificate issuer
    pub fn issuer(&self) -> &Name {
        &self.issuer
    }

    /// Get start of the validity period
    pub fn not_before(&self) -> ASN1Time {
        self.not_before
    }

    /// Get end of the validity period
    pub fn not_after(&self) -> ASN1Time {
        self.not_after
    }

    /// Get extensions in certificate order
    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// Get certificate data in DER encoding
    pub fn as_der(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("data", &"<X.509>")
            .field("subject", &self.subject)
            .field("issuer", &self.issuer)
            .field("not_before", &self.not_before)
            .field("not_after", &self.not_after)
            .field("extensions", &self.extensions)
            .finish()
    }
}
