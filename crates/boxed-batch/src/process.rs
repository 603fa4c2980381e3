use crate::issue::BatchIssue;
use crate::scan::{extract_from_reader, BatchReport};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Run the extractor over a JSONL file and optionally persist the results.
///
/// If the input cannot be opened the report is empty and nothing is written.
/// Otherwise every result gathered (even after a parse or read problem) is
/// written to `output_path`, one per line, replacing any existing file.
pub fn run_batch(input_path: &Path, output_path: Option<&Path>) -> BatchReport {
    let file = match File::open(input_path) {
        Ok(f) => f,
        Err(source) => {
            let mut report = BatchReport::default();
            report.push_issue(BatchIssue::Open {
                path: input_path.to_path_buf(),
                source,
            });
            return report;
        }
    };

    tracing::debug!(input = %input_path.display(), "scanning");
    run_reader(BufReader::new(file), output_path)
}

/// Scan already-open JSONL input, then persist like [`run_batch`].
pub fn run_reader<R: BufRead>(reader: R, output_path: Option<&Path>) -> BatchReport {
    let mut report = extract_from_reader(reader);
    if let Some(out) = output_path {
        write_output(&mut report, out);
    }
    report
}

/// Extracted answers for `input_path`, in input order.
///
/// Problems are logged and otherwise only visible through a shorter result;
/// use [`run_batch`] to inspect them.
pub fn process_jsonl_file(input_path: &Path, output_path: Option<&Path>) -> Vec<String> {
    run_batch(input_path, output_path).extractions
}

/// Persist `report.extractions` to `path`, recording the outcome on the report.
fn write_output(report: &mut BatchReport, path: &Path) {
    if report.stats.multiline_results > 0 {
        tracing::warn!(
            count = report.stats.multiline_results,
            "some results contain line breaks and will span several lines in the output"
        );
    }

    match boxed_store::write_lines(path, &report.extractions) {
        Ok(()) => {
            tracing::info!(
                path = %path.display(),
                count = report.extractions.len(),
                "results written"
            );
            report.written = Some(path.to_path_buf());
        }
        Err(e) => report.push_issue(BatchIssue::Write {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        }),
    }
}
