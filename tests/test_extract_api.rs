use base64::{Engine, engine::general_purpose::STANDARD};
use psd2_qwac::{Certificate, Extractor, Field, GeneralNameEntry, Psd2Extension, ffi};

const QWAC_PEM: &str = include_str!("assets/csob-qwac.pem");
const QWAC_ESCAPED: &str = include_str!("assets/csob-qwac-escaped.txt");
const NO_SAN_PEM: &str = include_str!("assets/no-san.pem");
const DNS_ONLY_SAN_PEM: &str = include_str!("assets/dns-only-san.pem");
const DUPLICATE_LICENCE_PEM: &str = include_str!("assets/duplicate-licence.pem");
const BMP_NAMES_PEM: &str = include_str!("assets/bmp-names.pem");

const QWAC_ROLE: &str =
    "payment initiation, account servicing, account information, issuing of card-based payment instruments";

#[test]
fn test_qwac_sample_output() {
    let output = ffi::certificate_info(QWAC_ESCAPED).unwrap();

    let expected = format!(
        concat!(
            "certIssuerCommonName:\"První certifikační autorita, a.s.\"\n",
            "certIssuerOrganization:\"První certifikační autorita, a.s.\"\n",
            "certLicenceID:\"PS:CZ-00001350\"\n",
            "certRole:\"{}\"\n",
            "certSubjectCountry:\"CZ\"\n",
            "certSubjectName:\"Československá obchodní banka, a. s.\"\n",
            "certSubjectSerialNumber:\"00001350\"\n",
            "certValidFrom:\"2018-06-21 12:42:32 +0000 UTC\"\n",
            "certValidTo:\"2019-06-21 12:42:32 +0000 UTC\"\n",
        ),
        QWAC_ROLE
    );

    assert_eq!(output, expected);
}

#[test]
fn test_input_forms_are_equivalent() {
    let pem = psd2_qwac::extract(QWAC_PEM).unwrap();
    let escaped = psd2_qwac::extract(QWAC_ESCAPED).unwrap();

    let der = Certificate::from_pem(QWAC_PEM.as_bytes()).unwrap().as_der().to_vec();
    let bare = psd2_qwac::extract(&STANDARD.encode(der)).unwrap();

    assert_eq!(pem, escaped);
    assert_eq!(pem, bare);
}

#[test]
fn test_output_is_idempotent() {
    let first = ffi::certificate_info(QWAC_PEM).unwrap();
    let second = ffi::certificate_info(QWAC_PEM).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_entries_sorted_by_key() {
    let info = psd2_qwac::extract(QWAC_PEM).unwrap();

    let keys = info.entries().map(|(key, _)| key).collect::<Vec<_>>();
    let mut sorted = keys.clone();
    sorted.sort();

    assert_eq!(keys.len(), Field::ALL.len());
    assert_eq!(keys, sorted);
}

#[test]
fn test_no_subject_alt_name() {
    let info = psd2_qwac::extract(NO_SAN_PEM).unwrap();

    assert_eq!(info.get(Field::SubjectName), "Musterbank AG");
    assert_eq!(info.get(Field::LicenceId), "");
    assert_eq!(info.get(Field::Role), "");

    let cert = Certificate::from_pem(NO_SAN_PEM.as_bytes()).unwrap();
    assert!(!Psd2Extension::from_extensions(cert.extensions()).unwrap().is_present());
}

#[test]
fn test_dns_only_subject_alt_name() {
    let info = psd2_qwac::extract(DNS_ONLY_SAN_PEM).unwrap();
    assert_eq!(info.get(Field::LicenceId), "");
    assert_eq!(info.get(Field::Role), "");

    let cert = Certificate::from_pem(DNS_ONLY_SAN_PEM.as_bytes()).unwrap();
    let psd2 = Psd2Extension::from_extensions(cert.extensions()).unwrap();
    assert!(psd2.is_present());
    assert!(
        psd2.names()
            .iter()
            .all(|name| matches!(name, GeneralNameEntry::Unsupported(_)))
    );
}

#[test]
fn test_duplicate_licence_last_wins() {
    let output = ffi::certificate_info(DUPLICATE_LICENCE_PEM).unwrap();

    assert_eq!(output.matches("certLicenceID:").count(), 1);
    assert!(output.contains("certLicenceID:\"PS:DE-SECOND\"\n"));
    assert!(output.contains("certRole:\"account information\"\n"));
}

#[test]
fn test_duplicate_licence_names() {
    let cert = Certificate::from_pem(DUPLICATE_LICENCE_PEM.as_bytes()).unwrap();
    let psd2 = Psd2Extension::from_extensions(cert.extensions()).unwrap();

    // DNS, directoryName, URI, otherName, directoryName, registeredID
    assert_eq!(psd2.names().len(), 6);

    let structured = psd2
        .names()
        .iter()
        .filter(|name| matches!(name, GeneralNameEntry::Structured(_)))
        .count();
    assert_eq!(structured, 2);

    let licences = psd2
        .attributes()
        .filter(|a| a.oid.to_string() == "2.5.4.54")
        .map(|a| a.value_string())
        .collect::<Vec<_>>();
    assert_eq!(licences, ["PS:DE-FIRST", "PS:DE-SECOND"]);

    assert_eq!(
        psd2.names()[3].type_id().map(|oid| oid.to_string()),
        Some("1.3.6.1.4.1.99999.1".to_owned())
    );
}

#[test]
fn test_reader_entry_point() {
    let info = psd2_qwac::extract_from_reader(QWAC_ESCAPED.as_bytes()).unwrap();
    assert_eq!(info.get(Field::Role), QWAC_ROLE);
    assert_eq!(info, Extractor::new().extract(QWAC_PEM).unwrap());
}

#[test]
fn test_text_before_pem_block() {
    let input = format!("Certificate:\n    Data: ...\n{QWAC_PEM}");
    let info = psd2_qwac::extract(&input).unwrap();
    assert_eq!(info.get(Field::LicenceId), "PS:CZ-00001350");
    assert_eq!(info, psd2_qwac::extract(QWAC_PEM).unwrap());
}

#[test]
fn test_bmp_and_teletex_names() {
    let output = ffi::certificate_info(BMP_NAMES_PEM).unwrap();

    assert!(!output.contains('\0'));
    assert!(output.contains("certSubjectName:\"Banka Čž\"\n"));
    assert!(output.contains("certSubjectCountry:\"CZ\"\n"));
    assert!(output.contains("certIssuerOrganization:\"Vertrauensdienste Köln\"\n"));
}
