//! Shared test utilities for ahara integration tests.
//!
//! Provides fixture records and oracle doubles:
//!
//! - [`ScriptedOracle`] replays canned responses in order and records the
//!   prompts it was given.
//! - [`FailingOracle`] fails every call with a fixed [`OracleError`] kind.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use ahara_core::graph::KnowledgeGraph;
use ahara_core::oracle::{GenerationParams, Oracle, OracleError};
use ahara_core::records::{DoshaEffect, Food, Patient};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn food(
    id: &str,
    name: &str,
    category: &str,
    rasa: &str,
    effects: &[(&str, DoshaEffect)],
    tags: &[&str],
) -> Food {
    let mut food = Food::new(id, name, category);
    food.rasa = rasa.to_string();
    food.dosha_effects = effects
        .iter()
        .map(|(dosha, effect)| (dosha.to_string(), *effect))
        .collect();
    food.health_tags = tags.iter().map(|t| t.to_string()).collect();
    food
}

/// Ten foods covering every category the recommender draws from.
pub fn sample_foods() -> Vec<Food> {
    use DoshaEffect::{Decrease, Increase, Neutral};
    vec![
        food("F01", "Rice", "grains", "sweet", &[("vata", Decrease), ("kapha", Increase)], &["digestion"]),
        food("F02", "Oats", "grains", "sweet", &[("vata", Decrease)], &[]),
        food("F03", "Millet", "grains", "astringent", &[("kapha", Decrease)], &["diabetes"]),
        food("F04", "Spinach", "vegetables", "bitter", &[("pitta", Decrease)], &[]),
        food("F05", "Moong Dal", "legumes", "sweet", &[("pitta", Decrease), ("kapha", Decrease)], &["protein"]),
        food("F06", "Milk", "dairy", "sweet", &[("vata", Decrease), ("kapha", Increase)], &["sleep"]),
        food("F07", "Banana", "fruits", "sweet", &[("vata", Decrease)], &[]),
        food("F08", "Apple", "fruits", "astringent", &[("pitta", Decrease)], &[]),
        food("F09", "Almonds", "nuts", "sweet", &[("pitta", Increase)], &["brain"]),
        food("F10", "Green Tea", "beverages", "bitter", &[("vata", Neutral)], &[]),
    ]
}

/// One patient per constitution plus a dual one.
pub fn sample_patients() -> Vec<Patient> {
    let mut kapha = Patient::new("P3", 45, "male", 80.0, 180.0, "sedentary", "kapha");
    kapha.health_conditions = vec!["diabetes".to_string()];
    let mut pitta = Patient::new("P2", 28, "female", 60.0, 165.0, "active", "pitta");
    pitta.allergies = vec!["nuts".to_string()];
    vec![
        Patient::new("P1", 35, "male", 70.0, 175.0, "moderate", "vata"),
        pitta,
        kapha,
        Patient::new("P4", 32, "female", 65.0, 160.0, "very_active", "vata-pitta"),
    ]
}

/// A graph built from [`sample_foods`] and [`sample_patients`].
pub fn sample_graph() -> Arc<KnowledgeGraph> {
    Arc::new(KnowledgeGraph::from_records(
        &sample_foods(),
        &sample_patients(),
    ))
}

// ---------------------------------------------------------------------------
// Oracle doubles
// ---------------------------------------------------------------------------

/// Replays responses in order. Once the script runs out, every further call
/// fails with [`OracleError::EmptyOutput`].
pub struct ScriptedOracle {
    name: String,
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<(String, GenerationParams)>>,
}

impl ScriptedOracle {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::named("t5", responses)
    }

    pub fn named<I, S>(name: &str, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, with the parameters they came with.
    pub async fn prompts(&self) -> Vec<(String, GenerationParams)> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, OracleError> {
        self.prompts
            .lock()
            .await
            .push((prompt.to_string(), params.clone()));
        self.responses
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| OracleError::EmptyOutput {
                command: self.name.clone(),
            })
    }
}

/// How a [`FailingOracle`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    Timeout,
    NonZeroExit,
    EmptyOutput,
}

/// Fails every call.
pub struct FailingOracle {
    mode: FailureMode,
}

impl FailingOracle {
    pub fn new(mode: FailureMode) -> Self {
        Self { mode }
    }
}

#[async_trait]
impl Oracle for FailingOracle {
    fn name(&self) -> &str {
        "t5"
    }

    async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> Result<String, OracleError> {
        let command = "failing-oracle".to_string();
        Err(match self.mode {
            FailureMode::Timeout => OracleError::Timeout { command, secs: 1 },
            FailureMode::NonZeroExit => OracleError::NonZeroExit {
                command,
                code: Some(1),
                stderr: "model crashed".to_string(),
            },
            FailureMode::EmptyOutput => OracleError::EmptyOutput { command },
        })
    }
}
