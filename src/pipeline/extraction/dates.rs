use chrono::NaiveDate;

/// Parse a lab header date into a calendar date.
///
/// Accepts ISO `YYYY-MM-DD` and US month-first `MM/DD/YYYY`, `MM-DD-YYYY`,
/// `MM/DD/YY`, `MM-DD-YY`. Two-digit years follow chrono's `%y` pivot
/// (00-69 -> 20xx, 70-99 -> 19xx).
pub fn parse_report_date(date_str: &str) -> Option<NaiveDate> {
    let trimmed = date_str.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.split('-').next().is_some_and(|y| y.len() == 4) {
        return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok();
    }

    let sep = if trimmed.contains('/') { '/' } else { '-' };
    let year_digits = trimmed.rsplit(sep).next().map_or(0, str::len);
    let format = match (sep, year_digits) {
        ('/', 2) => "%m/%d/%y",
        ('/', 4) => "%m/%d/%Y",
        ('-', 2) => "%m-%d-%y",
        ('-', 4) => "%m-%d-%Y",
        _ => return None,
    };

    NaiveDate::parse_from_str(trimmed, format).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn us_slash_four_digit_year() {
        assert_eq!(parse_report_date("03/14/2024"), Some(ymd(2024, 3, 14)));
        assert_eq!(parse_report_date("3/4/2024"), Some(ymd(2024, 3, 4)));
    }

    #[test]
    fn us_dash_four_digit_year() {
        assert_eq!(parse_report_date("12-01-2023"), Some(ymd(2023, 12, 1)));
    }

    #[test]
    fn two_digit_years() {
        assert_eq!(parse_report_date("1/5/24"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_report_date("04-12-80"), Some(ymd(1980, 4, 12)));
        assert_eq!(parse_report_date("01-02-03"), Some(ymd(2003, 1, 2)));
    }

    #[test]
    fn iso_dates() {
        assert_eq!(parse_report_date("2024-03-14"), Some(ymd(2024, 3, 14)));
    }

    #[test]
    fn rejects_invalid_and_ambiguous() {
        assert_eq!(parse_report_date(""), None);
        assert_eq!(parse_report_date("13/01/2024"), None);
        assert_eq!(parse_report_date("02/30/2024"), None);
        assert_eq!(parse_report_date("1/5/202"), None);
        assert_eq!(parse_report_date("soon"), None);
    }
}
