//!
//! Entry points for embedding the extractor into other programs.
//!
//! The string adapters work on owned Rust strings. With the `capi` feature the same calls are
//! exported with C linkage; there errors are reported as a null pointer or a negative count and
//! logged through `tracing`.
//!
use crate::{Result, error::Error, extractor::Extractor, info::Field};

/// Extract fields from a certificate string and format them as `key:"value"` lines
pub fn certificate_info(input: &str) -> Result<String> {
    Ok(Extractor::new().extract(input)?.to_key_value_string())
}

/// Extract fields from a certificate string into caller-provided arrays, in key order.
///
/// Both arrays must have room for every [Field]. Returns the number of entries written.
pub fn certificate_info_into(input: &str, keys: &mut [String], values: &mut [String]) -> Result<usize> {
    let available = keys.len().min(values.len());
    if available < Field::ALL.len() {
        return Err(Error::BufferTooSmall {
            required: Field::ALL.len(),
            available,
        });
    }

    let info = Extractor::new().extract(input)?;

    let mut written = 0;
    for ((key, value), (key_slot, value_slot)) in info.entries().zip(keys.iter_mut().zip(values.iter_mut())) {
        *key_slot = key.to_owned();
        *value_slot = value.to_owned();
        written += 1;
    }

    Ok(written)
}

#[cfg(feature = "capi")]
pub mod capi {
    use std::{
        ffi::{CStr, CString, c_char},
        ptr, slice,
    };

    use tracing::warn;

    use crate::info::Field;

    // SAFETY (callers): `input` is either null or a valid NUL-terminated string
    unsafe fn input_str<'a>(input: *const c_char) -> Option<&'a str> {
        if input.is_null() {
            return None;
        }
        unsafe { CStr::from_ptr(input) }.to_str().ok()
    }

    /// Extract fields and return them formatted as `key:"value"` lines.
    ///
    /// Returns null on any error. The result must be released with [psd2_string_free].
    ///
    /// # Safety
    /// `input` must be null or point to a valid NUL-terminated string.
    #[unsafe(no_mangle)]
    pub unsafe extern "C" fn psd2_cert_info(input: *const c_char) -> *mut c_char {
        let Some(input) = (unsafe { input_str(input) }) else {
            return ptr::null_mut();
        };

        match super::certificate_info(input) {
            Ok(output) => CString::new(output).map_or(ptr::null_mut(), CString::into_raw),
            Err(e) => {
                warn!(error = %e, "certificate extraction failed");
                ptr::null_mut()
            }
        }
    }

    /// Extract fields into `keys` and `values`, both arrays of `capacity` string pointers.
    ///
    /// Returns the number of entries written or -1 on error. Every written string must be released
    /// with [psd2_string_free].
    ///
    /// # Safety
    /// `input` must be null or point to a valid NUL-terminated string. `keys` and `values` must be
    /// null or point to writable arrays of at least `capacity` pointers.
    #[unsafe(no_mangle)]
    pub unsafe extern "C" fn psd2_cert_info_map(
        input: *const c_char,
        keys: *mut *mut c_char,
        values: *mut *mut c_char,
        capacity: usize,
    ) -> isize {
        if keys.is_null() || values.is_null() {
            return -1;
        }
        let Some(input) = (unsafe { input_str(input) }) else {
            return -1;
        };

        let len = capacity.min(Field::ALL.len());
        let mut key_buf = vec![String::new(); len];
        let mut value_buf = vec![String::new(); len];

        let written = match super::certificate_info_into(input, &mut key_buf, &mut value_buf) {
            Ok(written) => written,
            Err(e) => {
                warn!(error = %e, "certificate extraction failed");
                return -1;
            }
        };

        let pairs = key_buf
            .into_iter()
            .zip(value_buf)
            .take(written)
            .map(|(k, v)| Some((CString::new(k).ok()?, CString::new(v).ok()?)))
            .collect::<Option<Vec<_>>>();

        let Some(pairs) = pairs else {
            return -1;
        };

        let keys = unsafe { slice::from_raw_parts_mut(keys, capacity) };
        let values = unsafe { slice::from_raw_parts_mut(values, capacity) };

        for (i, (k, v)) in pairs.into_iter().enumerate() {
            keys[i] = k.into_raw();
            values[i] = v.into_raw();
        }

        written as isize
    }

    /// Release a string returned by this library
    ///
    /// # Safety
    /// `s` must be null or a pointer obtained from [psd2_cert_info] or [psd2_cert_info_map] which was
    /// not released before.
    #[unsafe(no_mangle)]
    pub unsafe extern "C" fn psd2_string_free(s: *mut c_char) {
        if !s.is_null() {
            drop(unsafe { CString::from_raw(s) });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QWAC_ESCAPED: &str = include_str!("../tests/assets/csob-qwac-escaped.txt");

    #[test]
    fn test_certificate_info() {
        let output = certificate_info(QWAC_ESCAPED).unwrap();
        assert_eq!(output.lines().count(), Field::ALL.len());
        assert!(output.contains("certLicenceID:\"PS:CZ-00001350\"\n"));
    }

    #[test]
    fn test_certificate_info_into() {
        let mut keys = vec![String::new(); 12];
        let mut values = vec![String::new(); 12];

        let written = certificate_info_into(QWAC_ESCAPED, &mut keys, &mut values).unwrap();

        assert_eq!(written, Field::ALL.len());
        assert_eq!(keys[0], "certIssuerCommonName");
        assert_eq!(keys[2], "certLicenceID");
        assert_eq!(values[2], "PS:CZ-00001350");
        assert_eq!(keys[8], "certValidTo");
        assert_eq!(values[8], "2019-06-21 12:42:32 +0000 UTC");
        assert_eq!(keys[9], "");
    }

    #[test]
    fn test_certificate_info_into_small_buffer() {
        let mut keys = vec![String::new(); 9];
        let mut values = vec![String::new(); 3];

        assert!(matches!(
            certificate_info_into(QWAC_ESCAPED, &mut keys, &mut values),
            Err(Error::BufferTooSmall {
                required: 9,
                available: 3
            })
        ));
    }

    #[cfg(feature = "capi")]
    #[test]
    fn test_capi() {
        use std::{
            ffi::{CStr, CString, c_char},
            ptr,
        };

        use super::capi::*;

        let input = CString::new(QWAC_ESCAPED).unwrap();

        unsafe {
            let output = psd2_cert_info(input.as_ptr());
            assert!(!output.is_null());
            let text = CStr::from_ptr(output).to_str().unwrap().to_owned();
            psd2_string_free(output);
            assert!(text.starts_with("certIssuerCommonName:"));

            let mut keys: [*mut c_char; 9] = [ptr::null_mut(); 9];
            let mut values: [*mut c_char; 9] = [ptr::null_mut(); 9];
            let written = psd2_cert_info_map(input.as_ptr(), keys.as_mut_ptr(), values.as_mut_ptr(), 9);
            assert_eq!(written, 9);
            assert_eq!(CStr::from_ptr(keys[3]).to_str().unwrap(), "certRole");
            for (k, v) in keys.into_iter().zip(values) {
                psd2_string_free(k);
                psd2_string_free(v);
            }

            let bad = CString::new("not a certificate").unwrap();
            assert!(psd2_cert_info(bad.as_ptr()).is_null());
            assert_eq!(psd2_cert_info_map(bad.as_ptr(), keys.as_mut_ptr(), values.as_mut_ptr(), 9), -1);
        }
    }
}
