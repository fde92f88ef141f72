use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::SplitError;
use crate::sprite::SpriteRecord;

/// Name of the manifest file written next to the sprite crops.
pub const MANIFEST_NAME: &str = "manifest.txt";

/// Writes the human-readable extraction manifest and returns its path.
///
/// Layout: a `Source:` line, an optional free-text annotation (grid geometry
/// or extraction mode), the sprite count, then one fixed-width line per
/// sprite.
pub fn write_manifest(
    dir: &Path,
    source_name: &str,
    annotation: &str,
    records: &[SpriteRecord],
) -> Result<PathBuf, SplitError> {
    let path = dir.join(MANIFEST_NAME);
    let mut out = BufWriter::new(File::create(&path)?);

    writeln!(out, "Source: {source_name}")?;
    if !annotation.is_empty() {
        writeln!(out, "{annotation}")?;
    }
    writeln!(out, "Sprites extracted: {}", records.len())?;
    writeln!(out)?;

    for record in records {
        let grid = match record.grid_pos {
            Some((row, col)) => format!("grid=({row:>2},{col:>2})  "),
            None => String::new(),
        };
        writeln!(
            out,
            "{:<30}  {:>4}x{:<4}  {}from ({}, {}) to ({}, {})",
            record.file,
            record.width,
            record.height,
            grid,
            record.source.x1,
            record.source.y1,
            record.source.x2,
            record.source.y2,
        )?;
    }

    out.flush()?;
    Ok(path)
}
