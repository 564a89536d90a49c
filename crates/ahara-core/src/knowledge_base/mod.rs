//! Knowledge-base file format.
//!
//! A knowledge base is a TOML document with three arrays of tables:
//!
//! ```toml
//! [[foods]]
//! id = "F001"
//! name = "Rice"
//! category = "grains"
//! dosha_effects = "vata:-,pitta:-,kapha:+"
//!
//! [[patients]]
//! id = "P001"
//! age = 35
//! prakriti = "vata"
//!
//! [[plans]]          # optional reference plans
//! patient_id = "P001"
//! day = 1
//! breakfast = "Rice porridge|Almonds"
//! ```
//!
//! Record fields are lenient (see [`crate::records::lenient`]); only the
//! document structure and identifier uniqueness are validated here.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::graph::KnowledgeGraph;
use crate::plan::DAYS_PER_WEEK;
use crate::records::{Food, MealPlan, Patient, WeeklyMealPlan};

static SAMPLE_TOML: &str = include_str!("sample.toml");

#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("failed to read knowledge base {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate food id: {0:?}")]
    DuplicateFoodId(String),

    #[error("duplicate patient id: {0:?}")]
    DuplicatePatientId(String),

    #[error("plan for patient {patient_id:?} has day {day} (expected 1 to 7)")]
    InvalidPlanDay { patient_id: String, day: u8 },
}

/// Foods, patients and optional reference plans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub foods: Vec<Food>,
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub plans: Vec<MealPlan>,
}

/// Parse and validate a knowledge-base document.
pub fn parse_knowledge_base_toml(content: &str) -> Result<KnowledgeBase, KnowledgeBaseError> {
    let mut kb: KnowledgeBase = toml::from_str(content)?;
    validate(&kb)?;
    kb.patients = kb.patients.into_iter().map(Patient::normalized).collect();
    Ok(kb)
}

fn validate(kb: &KnowledgeBase) -> Result<(), KnowledgeBaseError> {
    let mut seen = HashSet::new();
    for food in &kb.foods {
        if !seen.insert(food.id.as_str()) {
            return Err(KnowledgeBaseError::DuplicateFoodId(food.id.clone()));
        }
    }

    let mut seen = HashSet::new();
    for patient in &kb.patients {
        if !seen.insert(patient.id.as_str()) {
            return Err(KnowledgeBaseError::DuplicatePatientId(patient.id.clone()));
        }
    }

    for plan in &kb.plans {
        if !(1..=DAYS_PER_WEEK).contains(&plan.day) {
            return Err(KnowledgeBaseError::InvalidPlanDay {
                patient_id: plan.patient_id.clone(),
                day: plan.day,
            });
        }
    }
    Ok(())
}

impl KnowledgeBase {
    /// Read and parse a knowledge-base file.
    pub fn load(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let content = std::fs::read_to_string(path).map_err(|source| KnowledgeBaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let kb = parse_knowledge_base_toml(&content)?;
        info!(
            path = %path.display(),
            foods = kb.foods.len(),
            patients = kb.patients.len(),
            plans = kb.plans.len(),
            "loaded knowledge base"
        );
        Ok(kb)
    }

    /// The built-in starter data set: 8 foods, 5 patients and two weeks of
    /// reference plans.
    ///
    /// # Panics
    ///
    /// Panics if the embedded `sample.toml` is malformed. The file is fixed
    /// at compile time and covered by tests.
    pub fn sample() -> Self {
        parse_knowledge_base_toml(SAMPLE_TOML).expect("embedded sample.toml is invalid")
    }

    pub fn food(&self, id: &str) -> Option<&Food> {
        self.foods.iter().find(|f| f.id == id)
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    /// Build a fresh knowledge graph from every food and patient.
    pub fn build_graph(&self) -> KnowledgeGraph {
        let graph = KnowledgeGraph::from_records(&self.foods, &self.patients);
        info!(
            foods = self.foods.len(),
            patients = self.patients.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built knowledge graph"
        );
        graph
    }

    /// Group reference plans into weeks, one per patient with at least
    /// seven days on file. Days are ordered by number; extras are ignored.
    pub fn reference_weeks(&self) -> Vec<WeeklyMealPlan> {
        let mut by_patient: BTreeMap<&str, Vec<&MealPlan>> = BTreeMap::new();
        for plan in &self.plans {
            by_patient.entry(plan.patient_id.as_str()).or_default().push(plan);
        }

        by_patient
            .into_iter()
            .filter(|(_, plans)| plans.len() >= usize::from(DAYS_PER_WEEK))
            .map(|(patient_id, mut plans)| {
                plans.sort_by_key(|p| p.day);
                WeeklyMealPlan {
                    patient_id: patient_id.to_string(),
                    days: plans
                        .into_iter()
                        .take(usize::from(DAYS_PER_WEEK))
                        .cloned()
                        .collect(),
                    notes: "Reference plan".to_string(),
                }
            })
            .collect()
    }
}
