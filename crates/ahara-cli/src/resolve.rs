//! Turning resolved configuration into runtime objects.
//!
//! - [`load_knowledge_base`] reads the configured file or falls back to the
//!   built-in sample.
//! - [`find_patient`] looks a patient up by id.
//! - [`planning_context`] wires a [`CommandOracle`] into a registry and
//!   builds the [`PlanningContext`], failing fast on bad oracle settings.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use ahara_core::graph::KnowledgeGraph;
use ahara_core::knowledge_base::KnowledgeBase;
use ahara_core::oracle::{CommandOracle, DEFAULT_MODEL_TYPE, OracleRegistry};
use ahara_core::planner::{OracleSelection, PlanningContext};
use ahara_core::records::Patient;

use crate::config::AharaConfig;

pub fn load_knowledge_base(config: &AharaConfig) -> Result<KnowledgeBase> {
    match &config.knowledge_base {
        Some(path) => load_from(path),
        None => {
            info!("no knowledge base configured, using built-in sample");
            Ok(KnowledgeBase::sample())
        }
    }
}

fn load_from(path: &Path) -> Result<KnowledgeBase> {
    KnowledgeBase::load(path)
        .with_context(|| format!("failed to load knowledge base {}", path.display()))
}

pub fn find_patient<'kb>(kb: &'kb KnowledgeBase, patient_id: &str) -> Result<&'kb Patient> {
    kb.patient(patient_id).with_context(|| {
        let known: Vec<&str> = kb.patients.iter().map(|p| p.id.as_str()).collect();
        format!("unknown patient {patient_id:?} (known: {})", known.join(", "))
    })
}

/// Build the planning context for `graph`.
///
/// Without an oracle command the context is offline and every plan comes
/// from the fallbacks. With one, the command is registered under the
/// default model type and the configured model type must match it.
pub fn planning_context(
    config: &AharaConfig,
    graph: Arc<KnowledgeGraph>,
    no_graph: bool,
) -> Result<PlanningContext> {
    let mut options = config.planner.clone();
    if no_graph {
        options.use_knowledge_graph = false;
    }

    let Some(command) = &config.oracle_command else {
        info!("no oracle command configured, plans come from defaults and recommendations");
        return Ok(PlanningContext::offline(graph, options));
    };

    let mut oracle = CommandOracle::new(DEFAULT_MODEL_TYPE, command.as_str())
        .with_args(config.oracle_args.iter().cloned())
        .with_timeout(config.timeout);
    if let Some(dir) = &config.model_dir {
        oracle = oracle.with_model_dir(dir.clone());
    }

    let mut registry = OracleRegistry::new();
    registry.register(oracle);

    let selection = OracleSelection {
        model_type: config.model_type.clone(),
        model_dir: config.model_dir.clone(),
    };
    let ctx = PlanningContext::from_registry(graph, &registry, &selection, options)
        .context("invalid oracle configuration")?;
    Ok(ctx)
}
