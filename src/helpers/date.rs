//! Date helper functions

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike};

/// Month names for one display language
#[derive(Debug)]
pub struct MonthNames {
    pub short: [&'static str; 12],
    pub long: [&'static str; 12],
}

pub static PT_BR: MonthNames = MonthNames {
    short: [
        "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
    ],
    long: [
        "Janeiro",
        "Fevereiro",
        "Março",
        "Abril",
        "Maio",
        "Junho",
        "Julho",
        "Agosto",
        "Setembro",
        "Outubro",
        "Novembro",
        "Dezembro",
    ],
};

pub static EN: MonthNames = MonthNames {
    short: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    long: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
};

/// Month names for a language tag, falling back to English
pub fn month_names(language: &str) -> &'static MonthNames {
    match language.to_ascii_lowercase().as_str() {
        "pt" | "pt-br" | "pt_br" => &PT_BR,
        _ => &EN,
    }
}

/// Moment.js-style tokens, longest first
const TOKENS: [&str; 11] = [
    "YYYY", "YY", "MMMM", "MMM", "MM", "M", "DD", "D", "HH", "mm", "ss",
];

/// Format a date using Moment.js-style tokens and localized month names.
///
/// Text inside `[...]` is copied literally.
///
/// # Examples
/// ```ignore
/// format_date(&date, "DD MMM YYYY", &PT_BR) // -> "19 Mai 2021"
/// ```
pub fn format_date<Tz: TimeZone>(
    date: &DateTime<Tz>,
    format: &str,
    names: &MonthNames,
) -> String {
    let month = date.month0() as usize;
    let mut out = String::with_capacity(format.len() + 8);
    let mut rest = format;

    while let Some(ch) = rest.chars().next() {
        if ch == '[' {
            if let Some(end) = rest.find(']') {
                out.push_str(&rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        let Some(token) = TOKENS.iter().find(|t| rest.starts_with(**t)) else {
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
            continue;
        };

        let piece = match *token {
            "YYYY" => format!("{:04}", date.year()),
            "YY" => format!("{:02}", date.year().rem_euclid(100)),
            "MMMM" => names.long[month].to_string(),
            "MMM" => names.short[month].to_string(),
            "MM" => format!("{:02}", month + 1),
            "M" => (month + 1).to_string(),
            "DD" => format!("{:02}", date.day()),
            "D" => date.day().to_string(),
            "HH" => format!("{:02}", date.hour()),
            "mm" => format!("{:02}", date.minute()),
            _ => format!("{:02}", date.second()),
        };
        out.push_str(&piece);
        rest = &rest[token.len()..];
    }

    out
}

/// Display form of a post's publication date.
///
/// Never-published documents have no date and get `placeholder` instead.
pub fn publication_date(
    date: Option<&DateTime<FixedOffset>>,
    timezone: chrono_tz::Tz,
    format: &str,
    names: &MonthNames,
    placeholder: &str,
) -> String {
    match date {
        Some(date) => format_date(&date.with_timezone(&timezone), format, names),
        None => placeholder.to_string(),
    }
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn parse(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_format_date_pt_br() {
        let date = parse("2021-05-19T00:00:00Z");
        assert_eq!(format_date(&date, "DD MMM YYYY", &PT_BR), "19 Mai 2021");
        assert_eq!(format_date(&date, "D [de] MMMM", &PT_BR), "19 de Maio");
    }

    #[test]
    fn test_format_date_literal_text() {
        let date = parse("2021-05-19T00:00:00Z");
        assert_eq!(format_date(&date, "[YYYY MM] YYYY", &EN), "YYYY MM 2021");
        assert_eq!(format_date(&date, "[] DD", &EN), " 19");
        assert_eq!(format_date(&date, "DD [MMM", &EN), "19 [May");
    }

    #[test]
    fn test_format_date_en() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 10, 30, 7).unwrap();
        assert_eq!(format_date(&date, "YYYY-MM-DD", &EN), "2024-01-05");
        assert_eq!(format_date(&date, "DD MMM YY HH:mm:ss", &EN), "05 Jan 24 10:30:07");
    }

    #[test]
    fn test_month_names_lookup() {
        assert_eq!(month_names("pt-BR").short[4], "Mai");
        assert_eq!(month_names("en").short[4], "May");
        assert_eq!(month_names("fr").short[4], "May");
    }

    #[test]
    fn test_publication_date_uses_timezone() {
        let date = parse("2021-05-19T00:00:00Z");
        assert_eq!(
            publication_date(Some(&date), chrono_tz::UTC, "DD MMM YYYY", &PT_BR, "-"),
            "19 Mai 2021"
        );
        assert_eq!(
            publication_date(
                Some(&date),
                chrono_tz::America::Sao_Paulo,
                "DD MMM YYYY",
                &PT_BR,
                "-"
            ),
            "18 Mai 2021"
        );
    }

    #[test]
    fn test_missing_publication_date_uses_placeholder() {
        assert_eq!(
            publication_date(None, chrono_tz::UTC, "DD MMM YYYY", &PT_BR, "Não publicado"),
            "Não publicado"
        );
    }

    #[test]
    fn test_date_xml() {
        let date = parse("2021-05-19T00:00:00Z");
        assert_eq!(date_xml(&date), "2021-05-19T00:00:00.000+00:00");
    }
}
