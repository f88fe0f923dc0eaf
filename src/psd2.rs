//!
//! PSD2 data carried in the SubjectAltName extension.
//!
//! A PSD2 QWAC puts its authorisation number and roles into a directoryName entry of the
//! SubjectAltName. The walker decodes the GeneralNames sequence element by element: elements whose
//! body is a nested sequence are read as lists of (OID, value) attributes, anything else (DNS names,
//! URIs, otherName, registered IDs) is kept as an unsupported entry and does not abort the walk.
//!
//! Each decoding tier reads one TLV from the start of its buffer and ignores what follows it.
//!
use der::{Any, Decode, Sequence, SliceReader, Tagged, asn1::ObjectIdentifier};
use tracing::{debug, trace};

use crate::{Result, cert::Extension, error::Error, oid};

fn decode_prefix<'a, T: Decode<'a>>(bytes: &'a [u8]) -> der::Result<T> {
    let mut reader = SliceReader::new(bytes)?;
    T::decode(&mut reader)
}

/// Attribute of a structured SubjectAltName entry
#[derive(Debug, PartialEq, Eq, Clone, Sequence)]
pub struct QcAttribute {
    pub oid: ObjectIdentifier,
    pub value: Any,
}

impl QcAttribute {
    /// Get the attribute payload as text, invalid UTF-8 sequences are replaced
    pub fn value_string(&self) -> String {
        String::from_utf8_lossy(self.value.value()).into_owned()
    }
}

/// One element of the GeneralNames sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneralNameEntry {
    /// Entry whose body is a sequence of attributes
    Structured(Vec<QcAttribute>),
    /// Any other GeneralName shape, kept undecoded
    Unsupported(Any),
}

impl GeneralNameEntry {
    /// Classify a single GeneralName element.
    ///
    /// A body which does not decode as a sequence yields [GeneralNameEntry::Unsupported]. Once it does,
    /// every item inside must be an (OID, value) pair, otherwise [Error::MalformedAttributeError]
    /// is returned.
    pub fn from_element(element: &Any) -> Result<Self> {
        let items = match decode_prefix::<Vec<Any>>(element.value()) {
            Ok(items) => items,
            Err(e) => {
                trace!(tag = %element.tag(), len = element.value().len(), error = %e, "skipping general name");
                return Ok(Self::Unsupported(element.clone()));
            }
        };

        let attributes = items
            .iter()
            .map(|item| decode_prefix::<QcAttribute>(item.value()).map_err(Error::MalformedAttributeError))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::Structured(attributes))
    }

    /// Get the attributes of a structured entry
    pub fn attributes(&self) -> &[QcAttribute] {
        match self {
            Self::Structured(attributes) => attributes,
            Self::Unsupported(_) => &[],
        }
    }

    /// Get the OID which starts the body of an unsupported entry, i.e. the type-id of an otherName
    pub fn type_id(&self) -> Option<ObjectIdentifier> {
        match self {
            Self::Structured(_) => None,
            Self::Unsupported(element) => decode_prefix(element.value()).ok(),
        }
    }
}

/// PSD2 identifiers recovered from the SubjectAltName extensions of a certificate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Psd2Extension {
    present: bool,
    names: Vec<GeneralNameEntry>,
    licence_id: String,
    role: String,
}

impl Psd2Extension {
    /// Walk every SubjectAltName extension in the given order.
    ///
    /// A certificate without SubjectAltName is not an error: the result has empty licence ID and role.
    /// When an attribute OID repeats, the last occurrence wins.
    pub fn from_extensions(extensions: &[Extension]) -> Result<Self> {
        let mut psd2 = Self::default();

        for ext in extensions.iter().filter(|ext| ext.is(&oid::SUBJECT_ALT_NAME_OID)) {
            psd2.present = true;

            let elements = decode_prefix::<Vec<Any>>(ext.value()).map_err(Error::MalformedExtensionError)?;

            debug!(names = elements.len(), "walking SubjectAltName extension");

            for element in &elements {
                let entry = GeneralNameEntry::from_element(element)?;
                for attribute in entry.attributes() {
                    psd2.apply(attribute);
                }
                psd2.names.push(entry);
            }
        }

        if !psd2.present {
            debug!("no SubjectAltName extension");
        }

        Ok(psd2)
    }

    fn apply(&mut self, attribute: &QcAttribute) {
        match attribute.oid {
            oid::LICENCE_ID_OID => {
                self.licence_id = attribute.value_string();
                trace!(licence_id = %self.licence_id, "matched licence ID");
            }
            oid::ROLE_OID => {
                self.role = attribute.value_string();
                trace!(role = %self.role, "matched role");
            }
            _ => {}
        }
    }

    /// Returns true if the certificate has at least one SubjectAltName extension
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Get PSD2 licence (authorisation) ID, empty if not found
    pub fn licence_id(&self) -> &str {
        &self.licence_id
    }

    /// Get PSD2 role list, empty if not found
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Get all decoded SubjectAltName entries
    pub fn names(&self) -> &[GeneralNameEntry] {
        &self.names
    }

    /// Get attributes of all structured entries in scan order
    pub fn attributes(&self) -> impl Iterator<Item = &QcAttribute> {
        self.names.iter().flat_map(|name| name.attributes())
    }
}
