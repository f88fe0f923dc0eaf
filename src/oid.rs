use der::asn1::ObjectIdentifier;

pub const SUBJECT_ALT_NAME_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.17");
// PSD2 authorisation number, carried as dmdName in the SAN directoryName
pub const LICENCE_ID_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.54");
// PSD2 roles of the payment service provider, carried as description
pub const ROLE_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.13");
pub const SERIAL_NUMBER_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.5");
