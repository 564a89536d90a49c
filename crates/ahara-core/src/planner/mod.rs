//! Plan generation pipeline.
//!
//! A [`PlanningContext`] bundles everything one generation request needs:
//! the (shared, read-only) knowledge graph, an optional oracle and the
//! pipeline options. Contexts are cheap to clone and safe to use from many
//! tasks at once.
//!
//! ```text
//! patient -> prompt -> oracle? -> text? -> parse / assemble -> plan
//!                        |                       |
//!                        +-- failure = no text   +-- fallback: recommender, defaults
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::graph::KnowledgeGraph;
use crate::oracle::{GenerationParams, Oracle, OracleRegistry, format_day_prompt, format_weekly_prompt};
use crate::plan::{
    DAYS_PER_WEEK, assemble_week, default_day, default_week, format_day, has_meal_keyword,
    parse_single_day,
};
use crate::recommend::recommend;
use crate::records::{MealPlan, Patient, WeeklyMealPlan};

/// Fatal configuration and call-contract errors.
///
/// Content problems (unparseable text, empty graph, failed generator) are
/// never reported here; they select a fallback instead.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("unsupported model type {model_type:?} (available: {})", .available.join(", "))]
    UnsupportedModelType {
        model_type: String,
        available: Vec<String>,
    },

    #[error("model directory not found: {}", .0.display())]
    ModelDirNotFound(PathBuf),

    #[error("day must be between 1 and {max}, got {day}")]
    InvalidDay { day: u8, max: u8 },
}

/// Pipeline switches and decoding parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerOptions {
    /// Consult the category index: an empty index short-circuits to
    /// defaults, and unstructured day output is replaced by recommendations.
    pub use_knowledge_graph: bool,
    pub weekly_params: GenerationParams,
    pub daily_params: GenerationParams,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            use_knowledge_graph: true,
            weekly_params: GenerationParams::weekly(),
            daily_params: GenerationParams::daily(),
        }
    }
}

/// Which registered oracle to use, and the model it should load.
#[derive(Debug, Clone, Default)]
pub struct OracleSelection {
    pub model_type: String,
    pub model_dir: Option<PathBuf>,
}

#[derive(Clone)]
pub struct PlanningContext {
    graph: Arc<KnowledgeGraph>,
    oracle: Option<Arc<dyn Oracle>>,
    options: PlannerOptions,
}

impl std::fmt::Debug for PlanningContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanningContext")
            .field("nodes", &self.graph.node_count())
            .field("oracle", &self.oracle.as_ref().map(|o| o.name().to_string()))
            .field("options", &self.options)
            .finish()
    }
}

impl PlanningContext {
    pub fn new(
        graph: Arc<KnowledgeGraph>,
        oracle: Option<Arc<dyn Oracle>>,
        options: PlannerOptions,
    ) -> Self {
        Self {
            graph,
            oracle,
            options,
        }
    }

    /// A context with no oracle: every plan comes from the fallback chain.
    pub fn offline(graph: Arc<KnowledgeGraph>, options: PlannerOptions) -> Self {
        Self::new(graph, None, options)
    }

    /// Resolve the configured oracle, failing fast on bad configuration.
    pub fn from_registry(
        graph: Arc<KnowledgeGraph>,
        registry: &OracleRegistry,
        selection: &OracleSelection,
        options: PlannerOptions,
    ) -> Result<Self, PlannerError> {
        let oracle = registry.get(&selection.model_type).ok_or_else(|| {
            PlannerError::UnsupportedModelType {
                model_type: selection.model_type.clone(),
                available: registry.list().into_iter().map(String::from).collect(),
            }
        })?;

        if let Some(dir) = &selection.model_dir {
            check_model_dir(dir)?;
        }

        info!(model_type = %selection.model_type, "oracle selected");
        Ok(Self::new(graph, Some(oracle), options))
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    fn index_unavailable(&self) -> bool {
        self.options.use_knowledge_graph && !self.graph.has_category_data()
    }

    async fn ask(&self, prompt: &str, params: &GenerationParams) -> Option<String> {
        let oracle = self.oracle.as_ref()?;
        match oracle.generate(prompt, params).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(oracle = oracle.name(), error = %e, "generation failed, falling back");
                None
            }
        }
    }

    /// Generate a seven-day plan. Never fails.
    pub async fn generate_weekly_plan(&self, patient: &Patient) -> WeeklyMealPlan {
        if self.index_unavailable() {
            warn!(patient_id = %patient.id, "no foods in knowledge graph, using default week");
            return default_week(patient);
        }

        let prompt = format_weekly_prompt(patient);
        debug!(patient_id = %patient.id, %prompt, "weekly prompt");
        let text = self.ask(&prompt, &self.options.weekly_params).await;
        assemble_week(text.as_deref(), &patient.id, patient)
    }

    /// Generate the plan for one day (1 through 7).
    ///
    /// Text that yields no meal goes through the same fallback as
    /// [`parse_single_day`], so captured output parses identically.
    pub async fn generate_day_plan(&self, patient: &Patient, day: u8) -> Result<MealPlan, PlannerError> {
        if !(1..=DAYS_PER_WEEK).contains(&day) {
            return Err(PlannerError::InvalidDay {
                day,
                max: DAYS_PER_WEEK,
            });
        }
        let notes = format!("AI-generated plan for {} constitution", patient.prakriti);

        if self.index_unavailable() {
            warn!(patient_id = %patient.id, day, "no foods in knowledge graph, using default day");
            return Ok(MealPlan::new(&patient.id, day, default_day(patient, day), notes));
        }

        let prompt = format_day_prompt(patient, day);
        let mut text = self
            .ask(&prompt, &self.options.daily_params)
            .await
            .unwrap_or_default();

        if self.options.use_knowledge_graph && !has_meal_keyword(&text) {
            debug!(patient_id = %patient.id, day, "unstructured output, using category recommendations");
            text = format_day(&recommend(&self.graph, patient));
        }

        Ok(MealPlan::new(&patient.id, day, parse_single_day(&text), notes))
    }

    /// Generate weekly plans for independent patients concurrently.
    pub async fn generate_weekly_plans(&self, patients: &[Patient]) -> Vec<WeeklyMealPlan> {
        join_all(patients.iter().map(|p| self.generate_weekly_plan(p))).await
    }
}

fn check_model_dir(dir: &Path) -> Result<(), PlannerError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(PlannerError::ModelDirNotFound(dir.to_path_buf()))
    }
}
