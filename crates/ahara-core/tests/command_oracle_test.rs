//! End-to-end planning through a real subprocess generator.

#![cfg(unix)]

use std::sync::Arc;
use std::time::Duration;

use ahara_core::oracle::{CommandOracle, OracleRegistry};
use ahara_core::plan::{default_week, is_valid_week};
use ahara_core::planner::{OracleSelection, PlannerOptions, PlanningContext};
use ahara_test_utils::{sample_graph, sample_patients};

const WEEK_SCRIPT: &str = r#"cat > /dev/null
for d in 1 2 3 4 5 6 7; do
  printf 'day%s: breakfast: oats, milk lunch: rice, dal dinner: khichdi snacks: dates ' "$d"
done
"#;

fn context_for(script: &str, timeout: Duration) -> PlanningContext {
    let mut registry = OracleRegistry::new();
    registry.register(
        CommandOracle::new("t5", "sh")
            .with_args(["-c", script])
            .with_timeout(timeout),
    );
    PlanningContext::from_registry(
        sample_graph(),
        &registry,
        &OracleSelection {
            model_type: "t5".into(),
            model_dir: None,
        },
        PlannerOptions::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn weekly_plan_from_subprocess() {
    let ctx = context_for(WEEK_SCRIPT, Duration::from_secs(10));
    let patient = &sample_patients()[0];

    let week = ctx.generate_weekly_plan(patient).await;
    assert!(is_valid_week(&week));
    for plan in &week.days {
        assert_eq!(plan.meals.breakfast, vec!["oats", "milk"], "day {}", plan.day);
        assert_eq!(plan.meals.snacks, vec!["dates"], "day {}", plan.day);
    }
}

#[tokio::test]
async fn slow_generator_falls_back_to_defaults() {
    let ctx = context_for("sleep 5", Duration::from_millis(200));
    let patient = &sample_patients()[1];
    assert_eq!(ctx.generate_weekly_plan(patient).await, default_week(patient));
}

#[tokio::test]
async fn generator_sees_the_prompt_on_stdin() {
    let ctx = context_for(
        r#"read prompt; case "$prompt" in *"day 6"*) echo "lunch: roti, sabzi";; *) exit 1;; esac"#,
        Duration::from_secs(10),
    );
    let patient = &sample_patients()[2];

    let plan = ctx.generate_day_plan(patient, 6).await.unwrap();
    assert_eq!(plan.meals.lunch, vec!["roti", "sabzi"]);
    assert!(plan.meals.breakfast.is_empty());
}

#[tokio::test]
async fn shared_context_across_tasks() {
    let ctx = Arc::new(context_for(WEEK_SCRIPT, Duration::from_secs(10)));
    let handles: Vec<_> = sample_patients()
        .into_iter()
        .map(|patient| {
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move { ctx.generate_weekly_plan(&patient).await })
        })
        .collect();

    for handle in handles {
        let week = handle.await.unwrap();
        assert!(is_valid_week(&week));
    }
}
