//! Write page command lists back out in the loader's record shape.

use crate::model::ProcessedProject;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn emit(project: &ProcessedProject, out_dir: &Path) -> Result<()> {
    for page in &project.pages {
        let path = out_dir.join(format!("{:03}_{}.json", page.event_id, page.page));
        let f = File::create(&path).with_context(|| format!("Creating {}", path.display()))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, &page.list)
            .with_context(|| format!("Writing {}", path.display()))?;
        w.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Command, CommandList, RenderedPage};
    use crate::parser::load_command_list;
    use serde_json::json;

    #[test]
    fn written_list_loads_back() {
        let list = CommandList::new(vec![
            Command::new(101, 1, vec![json!("hello")]),
            Command::placeholder(509, "Jump"),
        ]);
        let project = ProcessedProject {
            pages: vec![RenderedPage {
                event_id: 7,
                event_name: "Sign".into(),
                page: 2,
                rows: vec![],
                list: list.clone(),
            }],
        };
        let dir = tempfile::tempdir().unwrap();
        emit(&project, dir.path()).unwrap();

        let raw = std::fs::read_to_string(dir.path().join("007_2.json")).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v[0]["indent"], json!("1"));
        assert_eq!(v[1]["indent"], json!("Jump"));
        assert_eq!(load_command_list(&raw).unwrap(), list);
    }
}
