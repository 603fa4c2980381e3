use anyhow::Context;
use std::io::{Read, Write};

/// `boxed text [TEXT]`
pub fn execute(text: Option<&str>) -> anyhow::Result<()> {
    let buf;
    let text = match text {
        Some(t) => t,
        None => {
            let mut stdin_buf = String::new();
            std::io::stdin()
                .read_to_string(&mut stdin_buf)
                .context("reading text from stdin")?;
            buf = stdin_buf;
            buf.as_str()
        }
    };

    write_extraction(text, &mut std::io::stdout().lock())
}

fn write_extraction<W: Write>(text: &str, out: &mut W) -> anyhow::Result<()> {
    let hit = boxed_core::find_boxed(text);
    tracing::debug!(found = hit.is_boxed(), len = text.len(), "text scanned");
    writeln!(out, "{}", hit.as_str())?;
    Ok(())
}
