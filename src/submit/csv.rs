//! CSV encoding of survey responses
//!
//! Fields containing a comma, quote, or line break are wrapped in double
//! quotes with inner quotes doubled. The reader accepts the same dialect,
//! including line breaks inside quoted fields.

use std::borrow::Cow;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use crate::survey::{ChoiceOption, SurveyResponse};

/// Column headers, in row order
pub const HEADERS: [&str; 25] = [
    "Timestamp",
    "Name",
    "Email",
    "Role",
    "Product",
    "Proud Of",
    "Meaningful Impact",
    "Struggles",
    "Work Harder",
    "Learned",
    "Growth Unsupported",
    "Feedback Comfort",
    "Feedback Comfort Reason",
    "Feedback Stops",
    "Feedback Stops Other",
    "Feedback Received",
    "Feedback Received Reason",
    "Feedback Easier",
    "Leadership Different",
    "Leadership Value",
    "Tools Enhancing",
    "Sadhana Regularity",
    "Inner Growth Support",
    "Great Year",
    "Anything Else",
];

/// Separator for list-valued answers inside one cell
pub const LIST_SEPARATOR: &str = " | ";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CsvError {
    #[error("Unterminated quoted field starting on line {0}")]
    UnterminatedQuote(usize),
}

/// Quote a field if it needs it
pub fn escape_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Encode one record (without the trailing newline)
pub fn encode_record<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn header_line() -> String {
    encode_record(&HEADERS)
}

fn label<T: ChoiceOption>(option: Option<T>) -> String {
    option.map(|o| o.label().to_string()).unwrap_or_default()
}

/// Cells for one response, in [`HEADERS`] order
pub fn response_fields(response: &SurveyResponse, submitted_at: DateTime<Utc>) -> Vec<String> {
    let r = response;
    let stops: Vec<&str> = r.feedback_stops.iter().map(|s| s.label()).collect();
    vec![
        submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        r.name.clone(),
        r.email.clone(),
        r.role.clone(),
        r.product.clone(),
        r.proud_of.join(LIST_SEPARATOR),
        r.meaningful_impact.clone(),
        r.struggles.clone(),
        r.work_harder.clone(),
        r.learned.clone(),
        r.growth_unsupported.clone(),
        label(r.feedback_comfort),
        r.feedback_comfort_reason.clone(),
        stops.join(LIST_SEPARATOR),
        r.feedback_stops_other.clone(),
        label(r.feedback_received),
        r.feedback_received_reason.clone(),
        r.feedback_easier.clone(),
        r.leadership_different.clone(),
        r.leadership_value.clone(),
        label(r.tools_enhancing),
        label(r.sadhana_regularity),
        r.inner_growth_support.clone(),
        r.great_year.clone(),
        r.anything_else.clone(),
    ]
}

/// Encoded row for one response
pub fn response_row(response: &SurveyResponse, submitted_at: DateTime<Utc>) -> String {
    encode_record(&response_fields(response, submitted_at))
}

/// Parse CSV text into records
pub fn parse_records(input: &str) -> Result<Vec<Vec<String>>, CsvError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quote_line = 0;
    let mut line = 1;
    let mut chars = input.chars().peekable();
    // Tracks whether the current record has any content, so a trailing
    // newline does not produce an empty record
    let mut dirty = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => {
                    if c == '\n' {
                        line += 1;
                    }
                    field.push(c);
                }
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                quote_line = line;
                dirty = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                dirty = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                line += 1;
                if dirty {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                    dirty = false;
                }
            }
            _ => {
                field.push(c);
                dirty = true;
            }
        }
    }

    if in_quotes {
        return Err(CsvError::UnterminatedQuote(quote_line));
    }
    if dirty {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{FeedbackComfort, FeedbackStop};
    use proptest::prelude::*;

    #[test]
    fn test_escape_plain_field_untouched() {
        assert_eq!(escape_field("plain text"), "plain text");
        assert!(matches!(escape_field("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_comma_quote_newline() {
        let value = "Shipped X, then \"Y\"\nand Z";
        let escaped = escape_field(value);
        assert_eq!(escaped, "\"Shipped X, then \"\"Y\"\"\nand Z\"");

        let records = parse_records(&escaped).unwrap();
        assert_eq!(records, vec![vec![value.to_string()]]);
    }

    #[test]
    fn test_header_line() {
        let line = header_line();
        assert!(line.starts_with("Timestamp,Name,Email,Role,Product,Proud Of"));
        assert!(line.ends_with("Great Year,Anything Else"));
    }

    #[test]
    fn test_response_row_column_count_and_lists() {
        let response = SurveyResponse {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            proud_of: vec!["Shipped X".into(), "Mentored Y".into()],
            feedback_comfort: Some(FeedbackComfort::Neutral),
            feedback_stops: vec![FeedbackStop::FearOfConflict, FeedbackStop::Other],
            ..Default::default()
        };
        let at = DateTime::parse_from_rfc3339("2025-12-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let fields = response_fields(&response, at);
        assert_eq!(fields.len(), HEADERS.len());
        assert_eq!(fields[0], "2025-12-01T10:00:00.000Z");
        assert_eq!(fields[5], "Shipped X | Mentored Y");
        assert_eq!(fields[11], "Neutral / unsure");
        assert_eq!(fields[13], "Fear of conflict | Other");

        let parsed = parse_records(&response_row(&response, at)).unwrap();
        assert_eq!(parsed, vec![fields]);
    }

    #[test]
    fn test_parse_multiple_records_with_crlf() {
        let input = "a,b\r\n\"c,1\",d\r\n";
        let records = parse_records(input).unwrap();
        assert_eq!(
            records,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["c,1".to_string(), "d".to_string()],
            ]
        );
    }

    #[test]
    fn test_parse_empty_fields() {
        let records = parse_records("a,,c\n,,\n").unwrap();
        assert_eq!(records[0], vec!["a", "", "c"]);
        assert_eq!(records[1], vec!["", "", ""]);
    }

    #[test]
    fn test_parse_unterminated_quote() {
        assert_eq!(
            parse_records("ok\n\"never closed,\nstill"),
            Err(CsvError::UnterminatedQuote(2))
        );
    }

    proptest! {
        #[test]
        fn prop_record_round_trips(fields in proptest::collection::vec("[a-z ,\"\n]{0,12}", 1..6)) {
            let encoded = encode_record(&fields);
            let parsed = parse_records(&encoded).unwrap();
            // A lone empty field encodes to an empty line, which carries no record
            if fields.len() == 1 && fields[0].is_empty() {
                prop_assert!(parsed.is_empty());
            } else {
                prop_assert_eq!(parsed, vec![fields]);
            }
        }
    }
}
