//! Validator primitives: code-set membership helpers and the
//! HIPAA-specific format checks (NPI Luhn, Tax ID, ICD-10, CPT/HCPCS,
//! strict calendar date/time).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // X12 transmits ICD-10-CM codes with the decimal point omitted (e.g.
    // "A100" for A10.0); accept the 3-character category either bare, with
    // the decimal collapsed out, or with it written explicitly.
    static ref ICD10_CM: Regex = Regex::new(r"^[A-TV-Z][0-9][0-9A-Z]\.?[0-9A-Z]{0,4}$").unwrap();
    static ref ICD10_PCS: Regex = Regex::new(r"^[0-9A-HJ-NP-Z]{7}$").unwrap();
    static ref CPT: Regex = Regex::new(r"^[0-9]{5}$").unwrap();
    static ref HCPCS: Regex = Regex::new(r"^[A-Z][0-9]{4}$").unwrap();
    static ref EIN: Regex = Regex::new(r"^[0-9]{2}-?[0-9]{7}$").unwrap();
}

/// NPI checksum prefix defined by the National Provider Identifier
/// standard: the Luhn check digit is computed over the 9 candidate digits
/// with this fixed prefix prepended.
const NPI_LUHN_PREFIX: &str = "80840";

/// Validates a National Provider Identifier: 10 digits whose last digit is
/// the Luhn check digit of the first 9 digits prepended with `80840`. The
/// Luhn sum is computed over all 15 digits (prefix + full 10-digit value,
/// check digit included) — the check digit itself must participate in the
/// sum for the mod-10 validity condition to hold.
pub fn is_valid_npi(value: &str) -> bool {
    if value.len() != 10 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let candidate = format!("{NPI_LUHN_PREFIX}{value}");
    luhn_checksum(&candidate) % 10 == 0
}

fn luhn_checksum(digits: &str) -> u32 {
    digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = (b - b'0') as u32;
            if i % 2 == 0 {
                d
            } else {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            }
        })
        .sum()
}

/// Validates a Tax ID (EIN): 9 digits, optionally formatted `NN-NNNNNNN`.
pub fn is_valid_ein(value: &str) -> bool {
    EIN.is_match(value)
}

/// Validates an ICD-10-CM diagnosis code.
pub fn is_valid_icd10_cm(value: &str) -> bool {
    ICD10_CM.is_match(value)
}

/// Validates an ICD-10-PCS procedure code: 7 alphanumeric characters.
pub fn is_valid_icd10_pcs(value: &str) -> bool {
    ICD10_PCS.is_match(value)
}

/// Validates a CPT code: 5 digits.
pub fn is_valid_cpt(value: &str) -> bool {
    CPT.is_match(value)
}

/// Validates an HCPCS Level II code: one letter followed by 4 digits.
pub fn is_valid_hcpcs(value: &str) -> bool {
    HCPCS.is_match(value)
}

/// Validates a procedure code as either CPT (Level I) or HCPCS (Level II) —
/// the two code sets X12 837P's `HC` qualifier covers together.
pub fn is_valid_procedure_code(value: &str) -> bool {
    is_valid_cpt(value) || is_valid_hcpcs(value)
}

/// Strict calendar validity for a CCYYMMDD date, including leap years.
pub fn is_valid_date_ccyymmdd(value: &str) -> bool {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let year: u32 = value[0..4].parse().unwrap();
    let month: u32 = value[4..6].parse().unwrap();
    let day: u32 = value[6..8].parse().unwrap();
    if !(1..=12).contains(&month) {
        return false;
    }
    day >= 1 && day <= days_in_month(year, month)
}

fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Validates an HHMM or HHMMSS time value.
pub fn is_valid_time(value: &str) -> bool {
    if (value.len() != 4 && value.len() != 6) || !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let hour: u32 = value[0..2].parse().unwrap();
    let minute: u32 = value[2..4].parse().unwrap();
    if hour > 23 || minute > 59 {
        return false;
    }
    if value.len() == 6 {
        let second: u32 = value[4..6].parse().unwrap();
        if second > 59 {
            return false;
        }
    }
    true
}

/// Resolves a named code set reference (as used by `CodeSet::Named`) to its
/// membership predicate.
pub fn named_code_set_member(name: &str, value: &str) -> bool {
    match name {
        "icd10cm" => is_valid_icd10_cm(value),
        "icd10pcs" => is_valid_icd10_pcs(value),
        "cpt" => is_valid_cpt(value),
        "hcpcs" => is_valid_hcpcs(value),
        "procedure_code" => is_valid_procedure_code(value),
        "npi" => is_valid_npi(value),
        "ein" => is_valid_ein(value),
        _ => true, // unknown named sets are not enforced; schema authoring error, not data error.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npi_luhn_accepts_known_valid_npi() {
        // 1234567893 is a commonly cited Luhn-valid test NPI.
        assert!(is_valid_npi("1234567893"));
    }

    #[test]
    fn npi_luhn_rejects_bad_checksum() {
        assert!(!is_valid_npi("1234567890"));
    }

    #[test]
    fn npi_rejects_wrong_length() {
        assert!(!is_valid_npi("123456789"));
    }

    #[test]
    fn ein_accepts_both_formats() {
        assert!(is_valid_ein("123456789"));
        assert!(is_valid_ein("12-3456789"));
    }

    #[test]
    fn icd10_cm_accepts_with_and_without_decimal() {
        assert!(is_valid_icd10_cm("A100"));
        assert!(is_valid_icd10_cm("A10.0"));
        assert!(!is_valid_icd10_cm("1000"));
    }

    #[test]
    fn icd10_pcs_requires_seven_chars() {
        assert!(is_valid_icd10_pcs("0016070"));
        assert!(!is_valid_icd10_pcs("001607"));
    }

    #[test]
    fn cpt_and_hcpcs() {
        assert!(is_valid_cpt("99213"));
        assert!(!is_valid_cpt("9921"));
        assert!(is_valid_hcpcs("J1100"));
        assert!(!is_valid_hcpcs("11000"));
    }

    #[test]
    fn procedure_code_accepts_either_set() {
        assert!(is_valid_procedure_code("99213"));
        assert!(is_valid_procedure_code("J1100"));
        assert!(!is_valid_procedure_code("not-a-code"));
    }

    #[test]
    fn date_handles_leap_years() {
        assert!(is_valid_date_ccyymmdd("20240229"));
        assert!(!is_valid_date_ccyymmdd("20230229"));
        assert!(!is_valid_date_ccyymmdd("20240431"));
    }

    #[test]
    fn time_rejects_out_of_range() {
        assert!(is_valid_time("2359"));
        assert!(!is_valid_time("2460"));
        assert!(is_valid_time("235959"));
        assert!(!is_valid_time("235960"));
    }
}
