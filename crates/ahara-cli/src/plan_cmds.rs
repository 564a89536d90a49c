//! CLI handlers for patient-facing commands.
//!
//! Implements:
//! - `ahara recommend <patient-id>` -- category recommendations
//! - `ahara prompt <patient-id>`    -- the generator prompt
//! - `ahara plan <patient-id>`      -- a weekly or single-day plan

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use ahara_core::oracle::{format_day_prompt, format_weekly_prompt};
use ahara_core::plan::{DAYS_PER_WEEK, assemble_week, parse_single_day};
use ahara_core::recommend::recommend;
use ahara_core::records::{DayMeals, Meal, MealPlan, WeeklyMealPlan};

use crate::config::AharaConfig;
use crate::resolve::{find_patient, load_knowledge_base, planning_context};

#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub patient_id: String,
    pub day: Option<u8>,
    pub from_text: Option<PathBuf>,
    pub no_graph: bool,
    pub json: bool,
}

fn check_day(day: u8) -> Result<u8> {
    if !(1..=DAYS_PER_WEEK).contains(&day) {
        bail!("day must be between 1 and {DAYS_PER_WEEK}, got {day}");
    }
    Ok(day)
}

// -----------------------------------------------------------------------
// ahara recommend
// -----------------------------------------------------------------------

pub fn run_recommend(config: &AharaConfig, patient_id: &str) -> Result<()> {
    let kb = load_knowledge_base(config)?;
    let patient = find_patient(&kb, patient_id)?;
    let meals = recommend(&kb.build_graph(), patient);

    if meals.is_empty() {
        println!("No recommendations: the knowledge base has no foods.");
        return Ok(());
    }
    print_meals(&meals, "");
    Ok(())
}

// -----------------------------------------------------------------------
// ahara prompt
// -----------------------------------------------------------------------

pub fn run_prompt(config: &AharaConfig, patient_id: &str, day: Option<u8>) -> Result<()> {
    let kb = load_knowledge_base(config)?;
    let patient = find_patient(&kb, patient_id)?;
    let prompt = match day {
        Some(day) => format_day_prompt(patient, check_day(day)?),
        None => format_weekly_prompt(patient),
    };
    println!("{prompt}");
    Ok(())
}

// -----------------------------------------------------------------------
// ahara plan
// -----------------------------------------------------------------------

pub async fn run_plan(config: &AharaConfig, request: &PlanRequest) -> Result<()> {
    let kb = load_knowledge_base(config)?;
    let patient = find_patient(&kb, &request.patient_id)?;
    let day = request.day.map(check_day).transpose()?;

    let captured = match &request.from_text {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read generator output: {}", path.display()))?,
        ),
        None => None,
    };

    match (day, captured) {
        (Some(day), Some(text)) => {
            let plan = MealPlan::new(&patient.id, day, parse_single_day(&text), "Parsed plan");
            emit_day(&plan, request.json)
        }
        (None, Some(text)) => {
            let week = assemble_week(Some(&text), &patient.id, patient);
            emit_week(&week, request.json)
        }
        (day, None) => {
            let graph = Arc::new(kb.build_graph());
            let ctx = planning_context(config, graph, request.no_graph)?;
            match day {
                Some(day) => {
                    let plan = ctx.generate_day_plan(patient, day).await?;
                    emit_day(&plan, request.json)
                }
                None => {
                    let week = ctx.generate_weekly_plan(patient).await;
                    emit_week(&week, request.json)
                }
            }
        }
    }
}

// -----------------------------------------------------------------------
// Output
// -----------------------------------------------------------------------

fn print_meals(meals: &DayMeals, indent: &str) {
    for meal in Meal::ALL {
        let items = meals.get(meal);
        if items.is_empty() {
            println!("{indent}{meal}: -");
        } else {
            println!("{indent}{meal}: {}", items.join(", "));
        }
    }
}

fn emit_day(plan: &MealPlan, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(plan)?);
        return Ok(());
    }
    println!("Day {} ({})", plan.day, plan.notes);
    print_meals(&plan.meals, "  ");
    Ok(())
}

fn emit_week(week: &WeeklyMealPlan, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(week)?);
        return Ok(());
    }
    println!("Patient {}: {}", week.patient_id, week.notes);
    for plan in &week.days {
        println!();
        println!("Day {}", plan.day);
        print_meals(&plan.meals, "  ");
    }
    Ok(())
}
