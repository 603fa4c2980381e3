use anyhow::Context;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write each item followed by `\n`, replacing any existing file.
///
/// Goes through a temp file in the same directory that is then renamed over
/// `path`, so readers never see a partially written result.
pub fn write_lines<I, S>(path: &Path, lines: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    write_atomic_with(path, |w| {
        for line in lines {
            w.write_all(line.as_ref().as_bytes())?;
            w.write_all(b"\n")?;
        }
        Ok(())
    })
}

/// Atomic write: write to temp file in same dir, then rename.
fn write_atomic_with<F>(path: &Path, fill: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut BufWriter<&mut tempfile::NamedTempFile>) -> std::io::Result<()>,
{
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("creating directory {}", parent.display()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("creating temp file in {}", parent.display()))?;
    {
        let mut w = BufWriter::new(&mut tmp);
        fill(&mut w).with_context(|| format!("writing {}", path.display()))?;
        w.flush()?;
    }
    tmp.persist(path)
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}
