//! Dump rendered script listings, one text file per page.

use crate::model::{ProcessedProject, RenderedPage};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

pub fn emit(project: &ProcessedProject, out_dir: &Path) -> io::Result<()> {
    for page in &project.pages {
        let path = out_dir.join(format!("{:03}_{}.txt", page.event_id, page.page));
        let mut f = File::create(&path)?;
        write_page(&mut f, page)?;
    }
    Ok(())
}

/// Header line followed by one row per command.
pub fn write_page<W: Write>(out: &mut W, page: &RenderedPage) -> io::Result<()> {
    writeln!(out, "{}", page.header())?;
    for row in &page.rows {
        writeln!(out, "{row}")?;
    }
    Ok(())
}
