//! Integration tests for the planning pipeline with oracle doubles.

use std::sync::Arc;

use ahara_core::graph::KnowledgeGraph;
use ahara_core::oracle::{GenerationParams, Oracle, OracleRegistry};
use ahara_core::plan::{default_day, default_week, format_day, is_valid_week, parse_single_day};
use ahara_core::planner::{OracleSelection, PlannerError, PlannerOptions, PlanningContext};
use ahara_core::recommend::recommend;
use ahara_test_utils::{
    FailingOracle, FailureMode, ScriptedOracle, sample_graph, sample_patients,
};

fn context(oracle: impl Oracle + 'static) -> PlanningContext {
    let oracle: Arc<dyn Oracle> = Arc::new(oracle);
    PlanningContext::new(sample_graph(), Some(oracle), PlannerOptions::default())
}

#[tokio::test]
async fn weekly_plan_uses_generated_text() {
    let oracle = Arc::new(ScriptedOracle::new([
        "day1: breakfast: poha lunch: rice day2: dinner: soup day3: snacks: apple \
         day4: breakfast: idli day5: lunch: dal day6: dinner: khichdi day7: snacks: dates",
    ]));
    let ctx = PlanningContext::new(sample_graph(), Some(oracle.clone() as Arc<dyn Oracle>), PlannerOptions::default());
    let patient = &sample_patients()[0];

    let week = ctx.generate_weekly_plan(patient).await;
    assert!(is_valid_week(&week));
    assert_eq!(week.days[0].meals.breakfast, vec!["poha"]);
    assert_eq!(week.days[6].meals.snacks, vec!["dates"]);

    let prompts = oracle.prompts().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].0.starts_with("generate weekly meal plan: patient age 35"));
    assert_eq!(prompts[0].1, GenerationParams::weekly());
}

#[tokio::test]
async fn oracle_failure_degrades_to_defaults() {
    for mode in [FailureMode::Timeout, FailureMode::NonZeroExit, FailureMode::EmptyOutput] {
        let ctx = context(FailingOracle::new(mode));
        let patient = &sample_patients()[2];

        let week = ctx.generate_weekly_plan(patient).await;
        assert!(is_valid_week(&week), "{mode:?}");
        for plan in &week.days {
            assert_eq!(plan.meals, default_day(patient, plan.day), "{mode:?} day {}", plan.day);
        }
    }
}

#[tokio::test]
async fn malformed_weekly_text_is_replaced_wholesale() {
    let ctx = context(ScriptedOracle::new(["day1: breakfast: oats day2: ???"]));
    let patient = &sample_patients()[1];
    assert_eq!(ctx.generate_weekly_plan(patient).await, default_week(patient));
}

#[tokio::test]
async fn day_plan_parses_tagged_text() {
    let oracle = Arc::new(ScriptedOracle::new(["Breakfast: Upma, Chai Dinner: Dal"]));
    let ctx = PlanningContext::new(sample_graph(), Some(oracle.clone() as Arc<dyn Oracle>), PlannerOptions::default());
    let patient = &sample_patients()[1];

    let plan = ctx.generate_day_plan(patient, 4).await.unwrap();
    assert_eq!(plan.day, 4);
    assert_eq!(plan.meals.breakfast, vec!["upma", "chai"]);
    assert_eq!(plan.meals.dinner, vec!["dal"]);
    assert_eq!(plan.notes, "AI-generated plan for pitta constitution");

    let prompts = oracle.prompts().await;
    assert!(prompts[0].0.ends_with("allergies nuts day 4"));
    assert_eq!(prompts[0].1, GenerationParams::daily());
}

#[tokio::test]
async fn day_plan_without_keywords_uses_recommendations() {
    let ctx = context(ScriptedOracle::new(["a balanced diet"]));
    let patient = &sample_patients()[0];

    let plan = ctx.generate_day_plan(patient, 1).await.unwrap();
    let expected = ahara_core::plan::extract_meals(&format_day(&recommend(
        &sample_graph(),
        patient,
    )));
    assert_eq!(plan.meals, expected);
    assert_eq!(plan.meals.breakfast, vec!["rice", "oats", "banana", "apple"]);
}

#[tokio::test]
async fn day_plan_with_keyword_but_no_sections_matches_text_parser() {
    // "lunch" appears, so no recommendation substitution, but nothing parses.
    let text = "skip lunch today";
    let ctx = context(ScriptedOracle::new([text]));
    let patient = &sample_patients()[2];
    let plan = ctx.generate_day_plan(patient, 5).await.unwrap();
    assert_eq!(plan.meals, parse_single_day(text));
    assert_eq!(plan.meals.breakfast, vec!["oatmeal", "warm milk", "almonds"]);
}

#[tokio::test]
async fn offline_context_still_plans() {
    let ctx = PlanningContext::offline(sample_graph(), PlannerOptions::default());
    let patient = &sample_patients()[3];

    assert!(!ctx.has_oracle());
    let week = ctx.generate_weekly_plan(patient).await;
    assert_eq!(week.days[0].meals, default_day(patient, 1));
    assert_eq!(week.notes, "Generated 7-day meal plan");
}

#[tokio::test]
async fn empty_graph_never_calls_the_oracle() {
    let oracle = Arc::new(ScriptedOracle::new(["day1: breakfast: oats"]));
    let ctx = PlanningContext::new(
        Arc::new(KnowledgeGraph::new()),
        Some(oracle.clone() as Arc<dyn Oracle>),
        PlannerOptions::default(),
    );
    let patient = &sample_patients()[0];

    assert_eq!(ctx.generate_weekly_plan(patient).await, default_week(patient));
    assert!(oracle.prompts().await.is_empty());
}

#[tokio::test]
async fn plans_for_many_patients_concurrently() {
    let patients = sample_patients();
    let ctx = context(FailingOracle::new(FailureMode::Timeout));

    let weeks = ctx.generate_weekly_plans(&patients).await;
    assert_eq!(weeks.len(), patients.len());
    for (week, patient) in weeks.iter().zip(&patients) {
        assert_eq!(week.patient_id, patient.id);
        assert!(is_valid_week(week));
    }
}

#[test]
fn registry_selection_is_validated() {
    let mut registry = OracleRegistry::new();
    registry.register(ScriptedOracle::named("t5", Vec::<String>::new()));

    let ok = PlanningContext::from_registry(
        sample_graph(),
        &registry,
        &OracleSelection {
            model_type: "t5".into(),
            model_dir: Some(tempfile::tempdir().unwrap().path().to_path_buf()),
        },
        PlannerOptions::default(),
    );
    assert!(ok.is_ok_and(|ctx| ctx.has_oracle()));

    let err = PlanningContext::from_registry(
        sample_graph(),
        &registry,
        &OracleSelection {
            model_type: "bart".into(),
            model_dir: None,
        },
        PlannerOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"unsupported model type "bart" (available: t5)"#
    );
    assert!(matches!(err, PlannerError::UnsupportedModelType { .. }));
}
