//! Validation of user-supplied registration fields
//!
//! Pure shape checks for the three fields collected during registration:
//! - full name ("Фамилия Имя Отчество", Cyrillic, surname may be hyphenated)
//! - phone number (+7 plus exactly 10 digits, no normalization)
//! - birth date (DD.MM.YYYY, must be a real calendar date)
//!
//! All functions are total: they never panic and never return an error,
//! only a boolean. A rejected input is logged at warn level.

use chrono::NaiveDate;
use lazy_regex::{regex_captures, regex_is_match};

/// Validates a full name in the form "Фамилия Имя Отчество".
///
/// Exactly three whitespace-separated Cyrillic components, each starting
/// with a capital letter followed by lowercase letters. The surname may be
/// hyphenated ("Петрова-Водкина"); the given name and patronymic may not.
///
/// # Examples
/// ```
/// use miacbot::core::validation::validate_full_name;
///
/// assert!(validate_full_name("Иванов Иван Иванович"));
/// assert!(validate_full_name("Петрова-Водкина Анна Сергеевна"));
/// assert!(!validate_full_name("иванов иван иванович"));
/// assert!(!validate_full_name("Иванов Иван"));
/// ```
pub fn validate_full_name(text: &str) -> bool {
    let ok = regex_is_match!(
        r"^[А-ЯЁ][а-яё]+(?:-[А-ЯЁ][а-яё]+)? [А-ЯЁ][а-яё]+ [А-ЯЁ][а-яё]+$",
        text
    );
    if !ok {
        log::warn!("Rejected full name input ({} chars)", text.chars().count());
    }
    ok
}

/// Validates a phone number: literal `+7` followed by exactly 10 digits.
///
/// No normalization is performed; an `8`-prefixed number is rejected.
///
/// # Examples
/// ```
/// use miacbot::core::validation::validate_phone;
///
/// assert!(validate_phone("+79781234567"));
/// assert!(!validate_phone("89781234567"));
/// assert!(!validate_phone("+7978123456"));
/// ```
pub fn validate_phone(text: &str) -> bool {
    let ok = regex_is_match!(r"^\+7\d{10}$", text);
    if !ok {
        log::warn!("Rejected phone input ({} chars)", text.chars().count());
    }
    ok
}

/// Validates a birth date in `DD.MM.YYYY` form.
///
/// Checks the lexical shape first, then that the triple forms a real
/// calendar date ("30.02.2020" and "13.13.2003" are rejected).
///
/// # Examples
/// ```
/// use miacbot::core::validation::validate_birth_date;
///
/// assert!(validate_birth_date("13.03.2003"));
/// assert!(validate_birth_date("29.02.2020")); // leap year
/// assert!(!validate_birth_date("30.02.2020"));
/// assert!(!validate_birth_date("13/03/2003"));
/// ```
pub fn validate_birth_date(text: &str) -> bool {
    let Some((_, day, month, year)) = regex_captures!(r"^(\d{2})\.(\d{2})\.(\d{4})$", text) else {
        log::warn!("Rejected birth date input ({} chars)", text.chars().count());
        return false;
    };

    // Two/four digit captures always parse; 0 falls through to the
    // calendar check below and is rejected there.
    let day: u32 = day.parse().unwrap_or(0);
    let month: u32 = month.parse().unwrap_or(0);
    let year: i32 = year.parse().unwrap_or(0);

    let ok = NaiveDate::from_ymd_opt(year, month, day).is_some();
    if !ok {
        log::warn!("Rejected birth date: no such calendar date");
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== validate_full_name Tests ====================

    #[test]
    fn test_validate_full_name_valid() {
        let valid = vec![
            "Иванов Иван Иванович",
            "Петров Пётр Петрович",
            "Петрова-Водкина Анна Сергеевна",
            "Ёлкин Егор Ёлкинович",
        ];

        for name in valid {
            assert!(validate_full_name(name), "Failed for: {}", name);
        }
    }

    #[test]
    fn test_validate_full_name_wrong_token_count() {
        let invalid = vec![
            "Иванов Иван",
            "Иванов",
            "Иванов Иван Иванович Лишний",
            "",
        ];

        for name in invalid {
            assert!(!validate_full_name(name), "Should fail for: {}", name);
        }
    }

    #[test]
    fn test_validate_full_name_wrong_case_or_alphabet() {
        let invalid = vec![
            "иванов иван иванович",
            "Иванов иван Иванович",
            "ИВАНОВ ИВАН ИВАНОВИЧ",
            "Ivanov Ivan Ivanovich",
            "Иванов Иван Иванович1",
            "Иванов  Иван Иванович", // double space
            "Иванов Иван-Петр Иванович", // hyphen only allowed in surname
            " Иванов Иван Иванович",
        ];

        for name in invalid {
            assert!(!validate_full_name(name), "Should fail for: {:?}", name);
        }
    }

    // ==================== validate_phone Tests ====================

    #[test]
    fn test_validate_phone_valid() {
        assert!(validate_phone("+79781234567"));
        assert!(validate_phone("+70000000000"));
    }

    #[test]
    fn test_validate_phone_invalid() {
        let invalid = vec![
            "89781234567",    // no +7 prefix
            "+7978123456",    // 9 digits
            "+797812345678",  // 11 digits
            "+7978123456a",   // letter
            "+8978123456",    // wrong country code
            "+7 978 123 45 67",
            "",
        ];

        for phone in invalid {
            assert!(!validate_phone(phone), "Should fail for: {:?}", phone);
        }
    }

    // ==================== validate_birth_date Tests ====================

    #[test]
    fn test_validate_birth_date_valid() {
        let valid = vec!["13.03.2003", "01.01.1950", "31.12.1999", "29.02.2020"];

        for date in valid {
            assert!(validate_birth_date(date), "Failed for: {}", date);
        }
    }

    #[test]
    fn test_validate_birth_date_not_a_calendar_date() {
        let invalid = vec![
            "30.02.2020", // February 30th
            "29.02.2021", // not a leap year
            "13.13.2003", // month 13
            "32.01.2000",
            "00.01.2000",
            "01.00.2000",
        ];

        for date in invalid {
            assert!(!validate_birth_date(date), "Should fail for: {}", date);
        }
    }

    #[test]
    fn test_validate_birth_date_malformed() {
        let invalid = vec![
            "13/03/2003",
            "13-03-2003",
            "3.3.2003",
            "13.03.03",
            "13.03.2003 ",
            "тринадцатое марта",
            "",
        ];

        for date in invalid {
            assert!(!validate_birth_date(date), "Should fail for: {:?}", date);
        }
    }
}
