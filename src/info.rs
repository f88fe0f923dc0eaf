use std::{
    collections::{BTreeMap, btree_map::Iter},
    fmt,
};

use x509_parser::time::ASN1Time;

use crate::{Result, cert::Certificate, error::Error, extractor::IssuerCommonName, psd2::Psd2Extension};

/// Field of the extraction result.
///
/// Variants are declared in the lexicographic order of their keys, so ordering by field orders the
/// output by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    IssuerCommonName,
    IssuerOrganization,
    LicenceId,
    Role,
    SubjectCountry,
    SubjectName,
    SubjectSerialNumber,
    ValidFrom,
    ValidTo,
}

impl Field {
    /// All fields in output order
    pub const ALL: [Field; 9] = [
        Field::IssuerCommonName,
        Field::IssuerOrganization,
        Field::LicenceId,
        Field::Role,
        Field::SubjectCountry,
        Field::SubjectName,
        Field::SubjectSerialNumber,
        Field::ValidFrom,
        Field::ValidTo,
    ];

    /// Get the output key of the field
    pub fn key(&self) -> &'static str {
        match self {
            Field::IssuerCommonName => "certIssuerCommonName",
            Field::IssuerOrganization => "certIssuerOrganization",
            Field::LicenceId => "certLicenceID",
            Field::Role => "certRole",
            Field::SubjectCountry => "certSubjectCountry",
            Field::SubjectName => "certSubjectName",
            Field::SubjectSerialNumber => "certSubjectSerialNumber",
            Field::ValidFrom => "certValidFrom",
            Field::ValidTo => "certValidTo",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Result entries iterator, yields (key, value) pairs in key order
pub struct Entries<'a> {
    iter: Iter<'a, Field, String>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (&'static str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(field, value)| (field.key(), value.as_str()))
    }
}

/// Regulatory identity fields extracted from a certificate.
///
/// Always holds every [Field]; licence ID and role are empty when the certificate carries no PSD2 data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertInfo {
    fields: BTreeMap<Field, String>,
}

fn first<'a>(values: &'a [String], name: &'static str) -> Result<&'a str> {
    values
        .first()
        .map(String::as_str)
        .ok_or(Error::MissingFieldError(name))
}

/// Render a timestamp as `2018-06-21 12:42:32 +0000 UTC`
pub(crate) fn format_time(time: ASN1Time) -> String {
    let dt = time.to_datetime();
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02} +0000 UTC",
        dt.year(),
        u8::from(dt.month()),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second()
    )
}

impl CertInfo {
    /// Read the basic subject/issuer fields and validity range.
    /// PSD2 fields are initialized empty.
    pub(crate) fn from_basic_fields(cert: &Certificate, issuer_common_name: IssuerCommonName) -> Result<Self> {
        let subject_name = first(cert.subject().organization(), "subject.organization")?;
        let issuer_organization = first(cert.issuer().organization(), "issuer.organization")?;
        let issuer_cn = match issuer_common_name {
            IssuerCommonName::Organization => issuer_organization,
            IssuerCommonName::CommonName => first(cert.issuer().common_name(), "issuer.commonName")?,
        };
        let subject_country = first(cert.subject().country(), "subject.country")?;

        let fields = BTreeMap::from([
            (Field::SubjectName, subject_name.to_owned()),
            (Field::IssuerOrganization, issuer_organization.to_owned()),
            (Field::IssuerCommonName, issuer_cn.to_owned()),
            (Field::SubjectCountry, subject_country.to_owned()),
            (Field::SubjectSerialNumber, cert.subject().serial_number().to_owned()),
            (Field::ValidFrom, format_time(cert.not_before())),
            (Field::ValidTo, format_time(cert.not_after())),
            (Field::LicenceId, String::new()),
            (Field::Role, String::new()),
        ]);

        Ok(Self { fields })
    }

    pub(crate) fn set_psd2(&mut self, psd2: &Psd2Extension) {
        self.fields.insert(Field::LicenceId, psd2.licence_id().to_owned());
        self.fields.insert(Field::Role, psd2.role().to_owned());
    }

    /// Get value of a given field
    pub fn get(&self, field: Field) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or_default()
    }

    /// Get entries iterator
    pub fn entries(&self) -> Entries<'_> {
        let iter = self.fields.iter();
        Entries { iter }
    }

    /// Get entries count, always the number of [Field] variants
    pub fn entries_count(&self) -> usize {
        self.fields.len()
    }

    /// Format as `key:"value"` lines sorted by key
    pub fn to_key_value_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CertInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.entries() {
            writeln!(f, "{key}:\"{value}\"")?;
        }
        Ok(())
    }
}
