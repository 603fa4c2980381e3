mod issue;
mod process;
mod scan;

pub use issue::BatchIssue;
pub use process::{process_jsonl_file, run_batch, run_reader};
pub use scan::{extract_from_reader, BatchReport, BatchStats};
