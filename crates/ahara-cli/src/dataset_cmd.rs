//! `ahara dataset`: training pairs as JSON Lines.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use tracing::warn;

use ahara_core::dataset::{daily_examples, weekly_examples};

use crate::config::AharaConfig;
use crate::graph_cmd::output_writer;
use crate::resolve::load_knowledge_base;

pub fn run_dataset(config: &AharaConfig, weekly: bool, output: Option<&Path>) -> Result<()> {
    let kb = load_knowledge_base(config)?;
    let examples = if weekly {
        weekly_examples(&kb)
    } else {
        daily_examples(&kb)
    };
    if examples.is_empty() {
        warn!("knowledge base has no reference plans");
    }

    let mut writer = output_writer(output)?;
    for example in &examples {
        serde_json::to_writer(&mut writer, example)?;
        writeln!(writer)?;
    }
    writer.flush()?;

    if let Some(path) = output {
        println!("Wrote {} examples to {}", examples.len(), path.display());
    }
    Ok(())
}
