//! `ahara graph` and `ahara categories`.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::AharaConfig;
use crate::resolve::load_knowledge_base;

/// Write the graph's feature export as pretty JSON.
pub fn run_graph(config: &AharaConfig, output: Option<&Path>) -> Result<()> {
    let kb = load_knowledge_base(config)?;
    let export = kb.build_graph().build_feature_export();

    let mut writer = output_writer(output)?;
    serde_json::to_writer_pretty(&mut writer, &export).context("failed to write feature export")?;
    writeln!(writer)?;

    if let Some(path) = output {
        println!(
            "Exported {} nodes and {} edges to {}",
            export.node_count(),
            export.edge_count(),
            path.display()
        );
    }
    Ok(())
}

/// Print food names grouped by category.
pub fn run_categories(config: &AharaConfig) -> Result<()> {
    let kb = load_knowledge_base(config)?;
    let graph = kb.build_graph();

    let by_category = graph.food_names_by_category();
    if by_category.is_empty() {
        println!("No foods in knowledge base.");
        return Ok(());
    }
    for (category, names) in by_category {
        println!("{category}: {}", names.join(", "));
    }
    Ok(())
}

/// A file at `output`, or stdout.
pub fn output_writer(output: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("cannot create output file: {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    })
}
