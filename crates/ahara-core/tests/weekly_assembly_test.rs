//! Integration tests for parsing generated text into weekly plans.

use ahara_core::plan::{
    assemble_week, default_day, default_week, extract_meals, format_day, format_week,
    is_valid_week, parse_single_day,
};
use ahara_core::records::{Constitution, DayMeals, MealPlan, Patient, WeeklyMealPlan};

fn vata_patient() -> Patient {
    Patient::new("P001", 35, "male", 70.0, 175.0, "moderate", "vata")
}

#[test]
fn partially_tagged_week_fills_missing_days_with_defaults() {
    let patient = vata_patient();
    let text = "day1: breakfast: Oats, Milk lunch: Rice, Dal day2: breakfast: Idli";
    let week = assemble_week(Some(text), "P001", &patient);

    assert!(is_valid_week(&week));
    assert_eq!(week.days.len(), 7);
    assert_eq!(week.days[0].meals.breakfast, vec!["oats", "milk"]);
    assert_eq!(week.days[0].meals.lunch, vec!["rice", "dal"]);
    assert!(week.days[0].meals.dinner.is_empty());
    assert_eq!(week.days[1].meals.breakfast, vec!["idli"]);
    for plan in &week.days[2..] {
        assert_eq!(plan.meals, default_day(&patient, plan.day), "day {}", plan.day);
    }
    assert_eq!(week.days[0].notes, "Day 1 plan");
    assert_eq!(week.notes, "Generated 7-day meal plan");
}

#[test]
fn day_markers_are_case_insensitive() {
    let week = assemble_week(Some("DAY3: Dinner: Khichdi"), "P001", &vata_patient());
    assert_eq!(week.days[2].meals.dinner, vec!["khichdi"]);
}

#[test]
fn a_day_without_meals_discards_the_whole_week() {
    let patient = vata_patient();
    let text = "day1: breakfast: oats day2: lunch: rice day3: </s>";
    let week = assemble_week(Some(text), "P001", &patient);

    assert_eq!(week, default_week(&patient));
    assert_eq!(week.notes, "7-day meal plan for vata constitution");
}

#[test]
fn formatted_week_round_trips() {
    let days = (1..=7)
        .map(|day| {
            MealPlan::new(
                "P001",
                day,
                DayMeals {
                    breakfast: vec![format!("Porridge {day}"), "Warm Milk".into()],
                    lunch: vec!["Rice".into(), "Moong Dal".into()],
                    dinner: vec!["Khichdi".into()],
                    snacks: vec!["Dates".into()],
                },
                "",
            )
        })
        .collect();
    let original = WeeklyMealPlan {
        patient_id: "P001".into(),
        days,
        notes: String::new(),
    };

    let week = assemble_week(Some(&format_week(&original)), "P001", &vata_patient());
    assert!(is_valid_week(&week));
    for (parsed, source) in week.days.iter().zip(&original.days) {
        let lowered = DayMeals {
            breakfast: source.meals.breakfast.iter().map(|s| s.to_lowercase()).collect(),
            lunch: source.meals.lunch.iter().map(|s| s.to_lowercase()).collect(),
            dinner: source.meals.dinner.iter().map(|s| s.to_lowercase()).collect(),
            snacks: source.meals.snacks.iter().map(|s| s.to_lowercase()).collect(),
        };
        assert_eq!(parsed.meals, lowered, "day {}", parsed.day);
    }
}

#[test]
fn formatted_day_round_trips_through_single_day_parser() {
    let meals = DayMeals {
        breakfast: vec!["Oatmeal".into(), "Dates".into()],
        lunch: vec!["Basmati Rice".into()],
        dinner: vec![],
        snacks: vec!["Coconut".into()],
    };
    let parsed = parse_single_day(&format_day(&meals));
    assert_eq!(parsed.breakfast, vec!["oatmeal", "dates"]);
    assert_eq!(parsed.lunch, vec!["basmati rice"]);
    assert!(parsed.dinner.is_empty());
    assert_eq!(parsed.snacks, vec!["coconut"]);
}

#[test]
fn noisy_generator_output_is_cleaned() {
    let meals = extract_meals(
        "<pad> Breakfast: warm  oatmeal., soaked   almonds;, x, </s> \
         Lunch: rice, moong dal, ghee, cooked vegetables, yogurt, chapati, salad",
    );
    assert_eq!(meals.breakfast, vec!["warm oatmeal", "soaked almonds", "s>"]);
    assert_eq!(meals.lunch.len(), 5);
    assert_eq!(meals.lunch[4], "yogurt");
}

#[test]
fn garbage_single_day_uses_vata_day_one() {
    let parsed = parse_single_day("%%%% ???");
    assert_eq!(
        parsed,
        ahara_core::plan::default_meals(Constitution::Vata, 1)
    );
}
