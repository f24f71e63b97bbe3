pub mod cli;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

use anyhow::Context;
use clap::Parser;

pub use model::{Command, CommandList, Indent, MoveCommand};
pub use processor::formatter::format;
pub use processor::indent::indent_of;
pub use processor::render::{render_list, row_label};

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // 1. ── Parse ──────────────────────────────────────────────────────
    let json = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Reading {}", args.input.display()))?;
    let map = parser::load_from_json(&json).with_context(|| "Parsing input JSON")?;

    // 2. ── Process ────────────────────────────────────────────────────
    let selection = processor::Selection {
        event: args.event,
        page: args.page,
    };
    let processed = processor::run(&map, selection).with_context(|| "Rendering event pages")?;

    // 3. ── Write outputs ──────────────────────────────────────────────
    let Some(out_dir) = args.output else {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for page in &processed.pages {
            writer::text::write_page(&mut out, page).with_context(|| "Writing to stdout")?;
        }
        return Ok(());
    };

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Creating {}", out_dir.display()))?;

    writer::text::emit(&processed, &out_dir).with_context(|| "Writing listings")?;
    writer::json::emit(&processed, &out_dir).with_context(|| "Writing command lists")?;

    Ok(())
}
