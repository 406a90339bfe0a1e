//! The JSON envelopes written to stdout.
//!
//! Output is a single line using `", "` and `": "` as separators, e.g.
//! `{"error": "File not found"}`.

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, Serializer};

use crate::compliance::ComplianceReport;
use crate::error::ScanError;
use crate::recognizer::RecognizedTimetable;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub status: String,
    pub is_nep_friendly: bool,
    pub issues: Vec<String>,
    pub recognized_timetable: RecognizedTimetable,
}

impl AnalysisReport {
    pub fn success(timetable: RecognizedTimetable, compliance: ComplianceReport) -> Self {
        AnalysisReport {
            status: "success".to_string(),
            is_nep_friendly: compliance.is_nep_friendly,
            issues: compliance.issues,
            recognized_timetable: timetable,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
}

impl From<&ScanError> for ErrorReport {
    fn from(err: &ScanError) -> Self {
        ErrorReport {
            error: err.to_string(),
        }
    }
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

pub fn to_json_line<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_line_is_exact() {
        let line = to_json_line(&ErrorReport::from(&ScanError::MissingArgument)).unwrap();
        assert_eq!(line, r#"{"error": "No image path provided"}"#);
    }

    #[test]
    fn success_line_keeps_field_order() {
        let timetable =
            RecognizedTimetable::new(vec!["Math".into(), "CS".into()], vec!["A1".into(), "Lab".into()])
                .unwrap();
        let compliance = ComplianceReport {
            is_nep_friendly: true,
            issues: vec![],
        };
        let line = to_json_line(&AnalysisReport::success(timetable, compliance)).unwrap();
        assert_eq!(
            line,
            r#"{"status": "success", "is_nep_friendly": true, "issues": [], "recognized_timetable": {"subjects": ["Math", "CS"], "rooms": ["A1", "Lab"]}}"#
        );
    }

    #[test]
    fn line_parses_back() {
        let line = to_json_line(&ErrorReport {
            error: "Image processing failed: \"x\"".into(),
        })
        .unwrap();
        let parsed: ErrorReport = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.error, "Image processing failed: \"x\"");
    }
}
