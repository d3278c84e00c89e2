//! Synthetic value generation
//!
//! Every routine produces a value with the textual shape of its type that is
//! nevertheless impossible as a real record: calendar components out of
//! range, unallocated prefixes, reserved domains, or checksums that fail.
//!
//! Randomness is always supplied by the caller. The replacer seeds a local
//! stream from the value's hash, so the same input always yields the same
//! output and no shared random state exists.

pub mod validity;

use crate::anonymization::models::PiiCategory;
use rand::Rng;

/// Prefix of generated person names
pub const NAME_PREFIX: &str = "테스트개인";
/// Prefix of generated company names
pub const COMPANY_PREFIX: &str = "테스트법인";
/// Prefix of placeholders for types without a dedicated routine
pub const FALLBACK_PREFIX: &str = "테스트값_";

const PASSPORT_PREFIXES: [&str; 3] = ["XX", "YY", "ZZ"];
const CITIES: [&str; 3] = ["테스트시", "가상구", "모의동"];
const STREETS: [&str; 3] = ["테스트로", "가상길", "모의대로"];
// RFC 2606 / RFC 6761 reserved names, never deliverable
const EMAIL_DOMAINS: [&str; 3] = ["test.example", "virtual.test", "mock.invalid"];

/// Generator of shape-valid, real-invalid values
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualDataGenerator;

impl VirtualDataGenerator {
    /// Create a new generator
    pub fn new() -> Self {
        Self
    }

    /// Generate a value for `category` from the caller's random stream
    pub fn generate<R: Rng + ?Sized>(&self, category: &PiiCategory, rng: &mut R) -> String {
        match category {
            PiiCategory::Name | PiiCategory::CompanyName => {
                let index = rng.gen_range(1..=10_000);
                self.generate_indexed(category, index)
                    .unwrap_or_else(|| self.fallback(rng))
            }
            PiiCategory::Ssn => self.ssn(rng),
            PiiCategory::Passport => self.passport(rng),
            PiiCategory::DriverLicense => self.driver_license(rng),
            PiiCategory::BirthDate => self.birth_date(rng),
            PiiCategory::Phone => self.phone(rng),
            PiiCategory::Address => self.address(rng),
            PiiCategory::CardNumber => self.card_number(rng),
            PiiCategory::AccountNumber => self.account_number(rng),
            PiiCategory::Email => self.email(rng),
            PiiCategory::Imei => self.imei(rng),
            PiiCategory::Imsi => self.imsi(rng),
            PiiCategory::MacAddress => self.mac_address(rng),
            PiiCategory::Other(_) => self.fallback(rng),
        }
    }

    /// Generate the `index`-th name or company name.
    ///
    /// Distinct indices always give distinct values. Returns `None` for
    /// categories that are not index-driven.
    pub fn generate_indexed(&self, category: &PiiCategory, index: u64) -> Option<String> {
        match category {
            PiiCategory::Name => Some(format!("{NAME_PREFIX}{index}")),
            PiiCategory::CompanyName => Some(format!("{COMPANY_PREFIX}{index}")),
            _ => None,
        }
    }

    /// `YYMMDD-GNNNNNC` with an impossible month/day and a wrong check digit
    fn ssn<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let year: u32 = rng.gen_range(50..=99);
        let month: u32 = rng.gen_range(13..=99);
        let day: u32 = rng.gen_range(32..=99);
        let gender: u32 = rng.gen_range(1..=4);
        let serial: u32 = rng.gen_range(0..=99_999);

        let first_twelve = format!("{year:02}{month:02}{day:02}{gender}{serial:05}");
        let check = validity::rrn_check_digit(&first_twelve).unwrap_or(0);
        let wrong = wrong_digit(check, rng);

        format!("{}-{}{wrong}", &first_twelve[..6], &first_twelve[6..])
    }

    /// Two-letter prefix that no issuing state uses, then seven digits
    fn passport<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let prefix = PASSPORT_PREFIXES[rng.gen_range(0..PASSPORT_PREFIXES.len())];
        let number: u32 = rng.gen_range(1_000_000..=9_999_999);
        format!("{prefix}{number}")
    }

    /// `99-99-NNNNNN-99`: region code 99 is unassigned
    fn driver_license<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let serial: u32 = rng.gen_range(100_000..=999_999);
        format!("99-99-{serial:06}-99")
    }

    /// `YYYY-MM-DD` with month 13-99 and day 32-99
    fn birth_date<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let year: u32 = rng.gen_range(1900..=2024);
        let month: u32 = rng.gen_range(13..=99);
        let day: u32 = rng.gen_range(32..=99);
        format!("{year:04}-{month:02}-{day:02}")
    }

    /// `NNN-NNNN-NNNN` whose prefix has no leading zero, so it is neither a
    /// mobile (01x) nor an area (0xx) prefix
    fn phone<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let area: u32 = rng.gen_range(532..=999);
        let middle: u32 = rng.gen_range(1000..=9999);
        let last: u32 = rng.gen_range(1000..=9999);
        format!("{area}-{middle}-{last}")
    }

    fn address<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let city = CITIES[rng.gen_range(0..CITIES.len())];
        let street = STREETS[rng.gen_range(0..STREETS.len())];
        let number: u32 = rng.gen_range(1..=999);
        format!("{city} {street} {number}")
    }

    /// `NNNN-NNNN-NNNN-NNNN` failing the Luhn check
    fn card_number<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut digits = random_digits(rng, 15);
        let check = validity::luhn_check_digit(&digits);
        digits.push_str(&wrong_digit(check, rng).to_string());

        format!(
            "{}-{}-{}-{}",
            &digits[0..4],
            &digits[4..8],
            &digits[8..12],
            &digits[12..16]
        )
    }

    /// 10-20 digits behind the unassigned bank code 999
    fn account_number<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let len = rng.gen_range(10..=20);
        format!("999{}", random_digits(rng, len - 3))
    }

    fn email<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let user: u32 = rng.gen_range(1..=99_999);
        let domain = EMAIL_DOMAINS[rng.gen_range(0..EMAIL_DOMAINS.len())];
        format!("testuser{user}@{domain}")
    }

    /// 15 digits failing the Luhn check
    fn imei<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut digits = random_digits(rng, 14);
        let check = validity::luhn_check_digit(&digits);
        digits.push_str(&wrong_digit(check, rng).to_string());
        digits
    }

    /// 15 digits behind mobile country code 00x (test / unassigned)
    fn imsi<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        format!("00{}", random_digits(rng, 13))
    }

    /// Colon-separated octets with the multicast bit set, which no network
    /// interface can carry as its own address
    fn mac_address<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut octets: [u8; 6] = rng.gen();
        octets[0] |= 0b0000_0011;
        octets
            .iter()
            .map(|o| format!("{o:02x}"))
            .collect::<Vec<_>>()
            .join(":")
    }

    fn fallback<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let n: u32 = rng.gen_range(1000..=9999);
        format!("{FALLBACK_PREFIX}{n}")
    }
}

/// `len` random digits, the first one non-zero
fn random_digits<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|i| {
            let d: u32 = if i == 0 {
                rng.gen_range(1..=9)
            } else {
                rng.gen_range(0..=9)
            };
            char::from_digit(d, 10).unwrap_or('0')
        })
        .collect()
}

/// A digit guaranteed to differ from `correct`
fn wrong_digit<R: Rng + ?Sized>(correct: u32, rng: &mut R) -> u32 {
    (correct + rng.gen_range(1..=9)) % 10
}

#[cfg(test)]
mod tests {
    use super::validity::*;
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use regex::Regex;
    use test_case::test_case;

    fn sample(category: PiiCategory, count: usize) -> Vec<String> {
        let generator = VirtualDataGenerator::new();
        (0..count as u64)
            .map(|seed| generator.generate(&category, &mut StdRng::seed_from_u64(seed)))
            .collect()
    }

    #[test_case(PiiCategory::Ssn, r"^\d{6}-[1-4]\d{6}$" ; "ssn")]
    #[test_case(PiiCategory::Passport, r"^(XX|YY|ZZ)\d{7}$" ; "passport")]
    #[test_case(PiiCategory::DriverLicense, r"^99-99-\d{6}-99$" ; "driver license")]
    #[test_case(PiiCategory::BirthDate, r"^\d{4}-\d{2}-\d{2}$" ; "birth date")]
    #[test_case(PiiCategory::Phone, r"^\d{3}-\d{4}-\d{4}$" ; "phone")]
    #[test_case(PiiCategory::Address, r"^\S+ \S+ \d{1,3}$" ; "address")]
    #[test_case(PiiCategory::CardNumber, r"^\d{4}-\d{4}-\d{4}-\d{4}$" ; "card number")]
    #[test_case(PiiCategory::AccountNumber, r"^999\d{7,17}$" ; "account number")]
    #[test_case(PiiCategory::Email, r"^testuser\d+@(test\.example|virtual\.test|mock\.invalid)$" ; "email")]
    #[test_case(PiiCategory::Imei, r"^\d{15}$" ; "imei")]
    #[test_case(PiiCategory::Imsi, r"^00\d{13}$" ; "imsi")]
    #[test_case(PiiCategory::MacAddress, r"^([0-9a-f]{2}:){5}[0-9a-f]{2}$" ; "mac address")]
    #[test_case(PiiCategory::Name, r"^테스트개인\d+$" ; "name")]
    #[test_case(PiiCategory::CompanyName, r"^테스트법인\d+$" ; "company name")]
    #[test_case(PiiCategory::Other("plate".into()), r"^테스트값_\d{4}$" ; "fallback")]
    fn test_shape(category: PiiCategory, shape: &str) {
        let re = Regex::new(shape).unwrap();
        for value in sample(category, 200) {
            assert!(re.is_match(&value), "{value} does not match {shape}");
        }
    }

    #[test]
    fn test_ssn_never_valid() {
        for value in sample(PiiCategory::Ssn, 500) {
            assert!(!is_rrn_valid(&value), "{value}");
            let digits: String = value.chars().filter(char::is_ascii_digit).collect();
            assert_ne!(
                rrn_check_digit(&digits[..12]).unwrap(),
                digits[12..].parse::<u32>().unwrap()
            );
        }
    }

    #[test]
    fn test_birth_date_never_a_calendar_date() {
        for value in sample(PiiCategory::BirthDate, 500) {
            let parts: Vec<u32> = value.split('-').map(|p| p.parse().unwrap()).collect();
            assert!(parts[1] > 12 && parts[2] > 31, "{value}");
            assert!(!is_calendar_date(parts[0] as i32, parts[1], parts[2]));
        }
    }

    #[test]
    fn test_card_and_imei_fail_luhn() {
        for value in sample(PiiCategory::CardNumber, 500) {
            assert!(!is_luhn_valid(&value), "{value}");
        }
        for value in sample(PiiCategory::Imei, 500) {
            assert!(!is_luhn_valid(&value), "{value}");
        }
    }

    #[test]
    fn test_phone_prefix_outside_allocated_ranges() {
        for value in sample(PiiCategory::Phone, 500) {
            assert!(!value.starts_with('0'), "{value}");
            let prefix: u32 = value[..3].parse().unwrap();
            assert!((532..=999).contains(&prefix));
        }
    }

    #[test]
    fn test_mac_address_is_multicast() {
        for value in sample(PiiCategory::MacAddress, 200) {
            let first = u8::from_str_radix(&value[..2], 16).unwrap();
            assert_eq!(first & 1, 1, "{value}");
        }
    }

    #[test]
    fn test_same_seed_same_value() {
        let generator = VirtualDataGenerator::new();
        let a = generator.generate(&PiiCategory::Email, &mut StdRng::seed_from_u64(7));
        let b = generator.generate(&PiiCategory::Email, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_indexed_values_are_distinct() {
        let generator = VirtualDataGenerator::new();
        let a = generator.generate_indexed(&PiiCategory::Name, 1).unwrap();
        let b = generator.generate_indexed(&PiiCategory::Name, 2).unwrap();
        assert_eq!(a, "테스트개인1");
        assert_ne!(a, b);
        assert_eq!(
            generator.generate_indexed(&PiiCategory::CompanyName, 42),
            Some("테스트법인42".to_string())
        );
        assert_eq!(generator.generate_indexed(&PiiCategory::Phone, 1), None);
    }
}
