//! Real-world validity rules
//!
//! The generator uses these to make sure fabricated identifiers *fail* the
//! checks real systems apply; tests use them to prove it.

use chrono::NaiveDate;

/// Luhn check digit for `payload` (the digits before the check digit)
pub fn luhn_check_digit(payload: &str) -> u32 {
    let sum: u32 = payload
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    (10 - sum % 10) % 10
}

/// Whether `number` (separators ignored) passes the Luhn check
pub fn is_luhn_valid(number: &str) -> bool {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 2 {
        return false;
    }
    let (payload, check) = digits.split_at(digits.len() - 1);
    check.parse::<u32>().ok() == Some(luhn_check_digit(payload))
}

const RRN_WEIGHTS: [u32; 12] = [2, 3, 4, 5, 6, 7, 8, 9, 2, 3, 4, 5];

/// Check digit of a resident registration number from its first 12 digits
pub fn rrn_check_digit(first_twelve: &str) -> Option<u32> {
    let digits: Vec<u32> = first_twelve.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 12 {
        return None;
    }
    let sum: u32 = digits.iter().zip(RRN_WEIGHTS).map(|(d, w)| d * w).sum();
    Some((11 - sum % 11) % 10)
}

/// Whether a `YYMMDD-NNNNNNN` number has a valid birth date and check digit
pub fn is_rrn_valid(rrn: &str) -> bool {
    let digits: String = rrn.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 13 {
        return false;
    }
    let month: u32 = digits[2..4].parse().unwrap_or(0);
    let day: u32 = digits[4..6].parse().unwrap_or(0);
    // Century is irrelevant for month/day validity; 2000 is a leap year
    if !is_calendar_date(2000, month, day) {
        return false;
    }
    let check = digits[12..].parse::<u32>().ok();
    check.is_some() && rrn_check_digit(&digits[..12]) == check
}

/// Whether year/month/day form a real calendar date
pub fn is_calendar_date(year: i32, month: u32, day: u32) -> bool {
    NaiveDate::from_ymd_opt(year, month, day).is_some()
}
