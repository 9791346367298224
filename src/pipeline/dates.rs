use chrono::NaiveDate;

/// Date layouts accepted in the `Expiration` column, tried in order.
/// Slash dates with the year last are read month-first.
const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Parse a calendar date, ignoring any trailing time-of-day component.
/// Returns `None` for blank or unrecognized text.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(date) = parse_exact(text) {
        return Some(date);
    }

    // "1 Nov 2026 08:30", "Nov 1, 2026 00:00:00": drop trailing words until a layout fits
    let words: Vec<&str> = text.split_whitespace().collect();
    for n in (1..words.len()).rev() {
        if let Some(date) = parse_exact(&words[..n].join(" ")) {
            return Some(date);
        }
    }

    // "2026-11-01T08:30:00Z"
    let (date_part, _time) = words.first()?.split_once('T')?;
    parse_exact(date_part)
}

fn parse_exact(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_common_layouts() {
        assert_eq!(parse_date("2026-11-01"), ymd(2026, 11, 1));
        assert_eq!(parse_date(" 2026/11/01 "), ymd(2026, 11, 1));
        assert_eq!(parse_date("11/01/2026"), ymd(2026, 11, 1));
        assert_eq!(parse_date("01.11.2026"), ymd(2026, 11, 1));
        assert_eq!(parse_date("01-Nov-2026"), ymd(2026, 11, 1));
        assert_eq!(parse_date("1 Nov 2026"), ymd(2026, 11, 1));
        assert_eq!(parse_date("Nov 1, 2026"), ymd(2026, 11, 1));
    }

    #[test]
    fn test_time_component_is_ignored() {
        assert_eq!(parse_date("2026-11-01 00:00:00"), ymd(2026, 11, 1));
        assert_eq!(parse_date("2026-11-01T08:30:00Z"), ymd(2026, 11, 1));
        assert_eq!(parse_date("1 Nov 2026 08:30"), ymd(2026, 11, 1));
        assert_eq!(parse_date("Nov 1, 2026 00:00:00"), ymd(2026, 11, 1));
        assert_eq!(parse_date("01-Nov-2026 00:00"), ymd(2026, 11, 1));
        assert_eq!(parse_date("11/1/2026 0:00"), ymd(2026, 11, 1));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("NA"), None);
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date("2026-13-45"), None);
    }
}
