use chrono::NaiveDate;

/// Month number for a Spanish three-letter abbreviation (`ENE` … `DIC`).
pub fn month_number(abbr: &str) -> Option<u32> {
    match abbr.trim().to_uppercase().as_str() {
        "ENE" => Some(1),
        "FEB" => Some(2),
        "MAR" => Some(3),
        "ABR" => Some(4),
        "MAY" => Some(5),
        "JUN" => Some(6),
        "JUL" => Some(7),
        "AGO" => Some(8),
        "SEP" => Some(9),
        "OCT" => Some(10),
        "NOV" => Some(11),
        "DIC" => Some(12),
        _ => None,
    }
}

/// Resolve a statement date token against the caller-supplied year.
///
/// Accepts `01-ENE`, `1 ENE`, `01/ENE` and `01-ENE-24`. A two-digit year
/// inside the token is ignored; `year` always wins.
pub fn resolve_date(token: &str, year: i32) -> Option<NaiveDate> {
    let mut parts = token
        .split(|c: char| c == '-' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty());
    let day: u32 = parts.next()?.parse().ok()?;
    let month = month_number(parts.next()?)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_abbreviations() {
        assert_eq!(month_number("ENE"), Some(1));
        assert_eq!(month_number("ago"), Some(8));
        assert_eq!(month_number("DIC"), Some(12));
        assert_eq!(month_number("JAN"), None);
    }

    #[test]
    fn resolves_common_token_shapes() {
        assert_eq!(resolve_date("01-ENE", 2024), Some(date(2024, 1, 1)));
        assert_eq!(resolve_date("7 MAR", 2023), Some(date(2023, 3, 7)));
        assert_eq!(resolve_date("15/AGO", 2024), Some(date(2024, 8, 15)));
    }

    #[test]
    fn embedded_two_digit_year_is_ignored() {
        assert_eq!(resolve_date("03-FEB-19", 2024), Some(date(2024, 2, 3)));
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(resolve_date("30-FEB", 2024), None);
        assert_eq!(resolve_date("XX-ENE", 2024), None);
        assert_eq!(resolve_date("", 2024), None);
    }
}
