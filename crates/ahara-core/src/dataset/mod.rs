//! Prompt/target pairs built from reference plans.
//!
//! Each example pairs the prompt the planner would send for a patient with
//! the tagged text it should get back. Targets use the same tagged form the
//! parser reads, so a generator trained on them produces parseable output.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::knowledge_base::KnowledgeBase;
use crate::oracle::{format_day_prompt, format_weekly_prompt};
use crate::plan::format_day;
use crate::records::{DayMeals, Meal, Patient};

/// Items per meal kept in targets: three for main meals, two for snacks.
fn target_cap(meal: Meal) -> usize {
    match meal {
        Meal::Snacks => 2,
        _ => 3,
    }
}

/// Stand-ins for meals a reference plan left empty, so every target names
/// all four meals.
fn placeholder(meal: Meal) -> &'static [&'static str] {
    match meal {
        Meal::Breakfast => &["oatmeal", "fruits"],
        Meal::Lunch => &["rice", "dal", "vegetables"],
        Meal::Dinner => &["chapati", "curry"],
        Meal::Snacks => &["fruits"],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub prompt: String,
    pub target: String,
}

fn target_meals(meals: &DayMeals) -> DayMeals {
    let mut out = DayMeals::default();
    for meal in Meal::ALL {
        let items = meals.get(meal);
        *out.get_mut(meal) = if items.is_empty() {
            placeholder(meal).iter().map(|s| s.to_string()).collect()
        } else {
            items.iter().take(target_cap(meal)).cloned().collect()
        };
    }
    out
}

/// Patient for a plan, or a neutral stand-in when the id is not on file.
fn patient_for(kb: &KnowledgeBase, patient_id: &str) -> Patient {
    match kb.patient(patient_id) {
        Some(p) => p.clone(),
        None => {
            warn!(patient_id, "reference plan names an unknown patient, using a default profile");
            Patient::new(patient_id, 30, "unknown", 70.0, 170.0, "moderate", "vata")
        }
    }
}

/// One example per reference plan day.
pub fn daily_examples(kb: &KnowledgeBase) -> Vec<TrainingExample> {
    kb.plans
        .iter()
        .map(|plan| {
            let patient = patient_for(kb, &plan.patient_id);
            TrainingExample {
                prompt: format_day_prompt(&patient, plan.day),
                target: format_day(&target_meals(&plan.meals)),
            }
        })
        .collect()
}

/// One example per complete reference week.
pub fn weekly_examples(kb: &KnowledgeBase) -> Vec<TrainingExample> {
    kb.reference_weeks()
        .iter()
        .map(|week| {
            let patient = patient_for(kb, &week.patient_id);
            let target = week
                .days
                .iter()
                .enumerate()
                .map(|(i, day)| format!("day{}: {}", i + 1, format_day(&target_meals(&day.meals))))
                .collect::<Vec<_>>()
                .join(" ");
            TrainingExample {
                prompt: format_weekly_prompt(&patient),
                target,
            }
        })
        .collect()
}
