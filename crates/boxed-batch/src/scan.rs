use crate::issue::BatchIssue;
use boxed_core::{find_boxed, first_choice_turns, TurnScan};
use serde::Serialize;
use std::io::BufRead;
use std::path::PathBuf;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub lines_read: usize,
    pub blank_lines: usize,
    pub records_parsed: usize,
    pub parse_errors: usize,
    pub records_without_choices: usize,
    pub turns_seen: usize,
    pub non_string_turns: usize,
    pub boxed_found: usize,
    pub not_found: usize,
    /// Results containing a line break; these split into several lines on disk.
    pub multiline_results: usize,
    /// Set when a read failure abandoned the rest of the input.
    pub aborted: bool,
}

/// Everything a batch run produced.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One entry per string turn, in input order.
    pub extractions: Vec<String>,
    pub stats: BatchStats,
    pub issues: Vec<BatchIssue>,
    /// Output path, set only after a successful write.
    pub written: Option<PathBuf>,
}

impl BatchReport {
    pub(crate) fn push_issue(&mut self, issue: BatchIssue) {
        issue.emit();
        self.issues.push(issue);
    }

    fn push_extraction(&mut self, text: &str) {
        let hit = find_boxed(text);
        if hit.is_boxed() {
            self.stats.boxed_found += 1;
        } else {
            self.stats.not_found += 1;
        }
        let value = hit.as_str();
        if value.contains('\n') {
            self.stats.multiline_results += 1;
        }
        self.extractions.push(value.to_string());
    }
}

/// Scan JSONL from `reader`, extracting one answer per string turn of
/// `choices[0].turns`.
///
/// Lines are decoded from raw bytes, so a line that is not valid UTF-8 is
/// treated like any other malformed record: reported and skipped. Only an
/// I/O failure stops the scan early.
pub fn extract_from_reader<R: BufRead>(mut reader: R) -> BatchReport {
    let mut report = BatchReport::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(source) => {
                report.stats.aborted = true;
                report.push_issue(BatchIssue::Read {
                    line: line_no + 1,
                    source,
                });
                break;
            }
        }
        line_no += 1;
        report.stats.lines_read += 1;

        let raw = buf.trim_ascii();
        if raw.is_empty() {
            report.stats.blank_lines += 1;
            continue;
        }

        let record: serde_json::Value = match serde_json::from_slice(raw) {
            Ok(v) => v,
            Err(source) => {
                report.stats.parse_errors += 1;
                report.push_issue(BatchIssue::Parse {
                    line: line_no,
                    source,
                });
                continue;
            }
        };
        report.stats.records_parsed += 1;

        let scan = first_choice_turns(&record);
        if scan == TurnScan::NoChoices {
            report.stats.records_without_choices += 1;
        }

        let before = report.extractions.len();
        for text in scan.texts() {
            report.push_extraction(text);
        }
        let kept = report.extractions.len() - before;
        report.stats.turns_seen += scan.len();
        report.stats.non_string_turns += scan.len() - kept;

        tracing::trace!(line = line_no, turns = scan.len(), kept, "record scanned");
    }

    tracing::debug!(
        lines = report.stats.lines_read,
        extracted = report.extractions.len(),
        parse_errors = report.stats.parse_errors,
        "scan finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxed_core::NOT_FOUND;
    use std::io::{self, BufReader, Cursor, Read};

    fn scan_str(input: &str) -> BatchReport {
        extract_from_reader(Cursor::new(input.as_bytes().to_vec()))
    }

    #[test]
    fn scenario_single_boxed_answer() {
        let report = scan_str(r#"{"choices":[{"turns":["The answer is \\boxed{42}."]}]}"#);
        assert_eq!(report.extractions, vec!["\\boxed{42}."]);
        assert_eq!(report.stats.boxed_found, 1);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn scenario_no_marker_gives_sentinel() {
        let report = scan_str(r#"{"choices":[{"turns":["no marker here"]}]}"#);
        assert_eq!(report.extractions, vec![NOT_FOUND]);
        assert_eq!(report.stats.not_found, 1);
    }

    #[test]
    fn scenario_last_of_two_markers() {
        let report =
            scan_str(r#"{"choices":[{"turns":["first \\boxed{1} then \\boxed{2}"]}]}"#);
        assert_eq!(report.extractions, vec!["\\boxed{2}"]);
    }

    #[test]
    fn scenario_non_string_turn_skipped() {
        let report = scan_str(r#"{"choices":[{"turns":[5, "\\boxed{x}", null]}]}"#);
        assert_eq!(report.extractions, vec!["\\boxed{x}"]);
        assert_eq!(report.stats.turns_seen, 3);
        assert_eq!(report.stats.non_string_turns, 2);
    }

    #[test]
    fn order_follows_records_then_turns() {
        let input = [
            r#"{"choices":[{"turns":["a \\boxed{1}","b \\boxed{2}"]}]}"#,
            r#"{"choices":[{"turns":["c"]},{"turns":["ignored \\boxed{9}"]}]}"#,
            r#"{"choices":[{"turns":["d \\boxed{4}"]}]}"#,
        ]
        .join("\n");
        let report = scan_str(&input);
        assert_eq!(
            report.extractions,
            vec!["\\boxed{1}", "\\boxed{2}", NOT_FOUND, "\\boxed{4}"]
        );
    }

    #[test]
    fn empty_or_missing_turns_contribute_nothing() {
        let input = [
            r#"{"choices":[{"turns":[]}]}"#,
            r#"{"choices":[{"index":0}]}"#,
            r#"{"choices":[{"turns":"not a list"}]}"#,
        ]
        .join("\n");
        let report = scan_str(&input);
        assert!(report.extractions.is_empty());
        assert_eq!(report.stats.records_parsed, 3);
        assert_eq!(report.stats.records_without_choices, 0);
    }

    #[test]
    fn empty_or_missing_choices_contribute_nothing() {
        let input = [
            r#"{"choices":[]}"#,
            r#"{"question_id":12}"#,
            r#"{"choices":null}"#,
        ]
        .join("\n");
        let report = scan_str(&input);
        assert!(report.extractions.is_empty());
        assert_eq!(report.stats.records_without_choices, 3);
    }

    #[test]
    fn malformed_line_is_skipped_and_scan_continues() {
        let input = [
            r#"{"choices":[{"turns":["\\boxed{1}"]}]}"#,
            r#"{"choices":[{"turns":["\\boxed{2}"#,
            r#"{"choices":[{"turns":["\\boxed{3}"]}]}"#,
        ]
        .join("\n");
        let report = scan_str(&input);
        assert_eq!(report.extractions, vec!["\\boxed{1}", "\\boxed{3}"]);
        assert_eq!(report.stats.parse_errors, 1);
        assert!(!report.stats.aborted);
        assert_eq!(report.issues.len(), 1);
        match &report.issues[0] {
            BatchIssue::Parse { line, .. } => assert_eq!(*line, 2),
            other => panic!("unexpected issue: {other:?}"),
        }
    }

    #[test]
    fn blank_lines_and_crlf_are_tolerated() {
        let input = "\r\n{\"choices\":[{\"turns\":[\"\\\\boxed{7}\"]}]}\r\n   \n\n";
        let report = scan_str(input);
        assert_eq!(report.extractions, vec!["\\boxed{7}"]);
        assert_eq!(report.stats.lines_read, 4);
        assert_eq!(report.stats.blank_lines, 3);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn last_line_without_newline_is_read() {
        let report = scan_str("{\"choices\":[{\"turns\":[\"\\\\boxed{end}\"]}]}");
        assert_eq!(report.extractions, vec!["\\boxed{end}"]);
    }

    #[test]
    fn invalid_utf8_line_is_a_parse_error() {
        let mut bytes = b"{\"choices\":[{\"turns\":[\"\xff\xfe\"]}]}\n".to_vec();
        bytes.extend_from_slice(b"{\"choices\":[{\"turns\":[\"\\\\boxed{ok}\"]}]}\n");
        let report = extract_from_reader(Cursor::new(bytes));
        assert_eq!(report.extractions, vec!["\\boxed{ok}"]);
        assert_eq!(report.stats.parse_errors, 1);
        assert!(!report.stats.aborted);
    }

    #[test]
    fn non_object_line_contributes_nothing() {
        let report = scan_str("[1,2,3]\n\"just text\"\n42\n");
        assert!(report.extractions.is_empty());
        assert_eq!(report.stats.records_parsed, 3);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn multiline_results_are_counted() {
        let report = scan_str(r#"{"choices":[{"turns":["\\boxed{a}\nmore","\\boxed{b}"]}]}"#);
        assert_eq!(report.extractions, vec!["\\boxed{a}\nmore", "\\boxed{b}"]);
        assert_eq!(report.stats.multiline_results, 1);
    }

    /// Serves its bytes once, then fails instead of signalling EOF.
    struct FailingTail {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailingTail {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::other("device vanished")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn read_failure_keeps_earlier_results() {
        let data = b"{\"choices\":[{\"turns\":[\"\\\\boxed{1}\"]}]}\n{\"choices\":".to_vec();
        let reader = BufReader::new(FailingTail {
            data: Cursor::new(data),
        });
        let report = extract_from_reader(reader);
        assert_eq!(report.extractions, vec!["\\boxed{1}"]);
        assert!(report.stats.aborted);
        assert_eq!(report.stats.lines_read, 1);
        match &report.issues[..] {
            [BatchIssue::Read { line, .. }] => assert_eq!(*line, 2),
            other => panic!("unexpected issues: {other:?}"),
        }
    }

    #[test]
    fn one_result_per_string_turn() {
        let input = [
            r#"{"choices":[{"turns":["x","\\boxed{y}",3]}]}"#,
            r#"{"choices":[{"turns":[]}]}"#,
            r#"{"choices":[{"turns":["z"]}]}"#,
        ]
        .join("\n");
        let report = scan_str(&input);
        let s = &report.stats;
        assert_eq!(report.extractions.len(), s.turns_seen - s.non_string_turns);
        assert_eq!(report.extractions.len(), s.boxed_found + s.not_found);
    }
}
