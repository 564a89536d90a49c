//! Seven-day assembly from generated text.
//!
//! Day sections are cut on `dayN:` markers; each section goes through meal
//! extraction. A missing day marker yields that day's default meals. If the
//! assembled week fails [`is_valid_week`], the whole week is replaced by the
//! patient's default week rather than patched day by day.

use tracing::{debug, warn};

use crate::records::{MealPlan, Patient, WeeklyMealPlan};

use super::defaults::{DAYS_PER_WEEK, default_day, default_week_for};
use super::lexer::Markers;
use super::parser::extract_meals;

pub const WEEKLY_NOTES: &str = "Generated 7-day meal plan";

/// Build a weekly plan from optional generated text.
///
/// `None` (oracle absent or failed) behaves like text with no day markers.
pub fn assemble_week(raw_text: Option<&str>, patient_id: &str, patient: &Patient) -> WeeklyMealPlan {
    let text = raw_text.unwrap_or_default().to_lowercase();
    let tags: Vec<(u8, String)> = (1..=DAYS_PER_WEEK).map(|d| (d, format!("day{d}:"))).collect();
    let tag_refs: Vec<(u8, &str)> = tags.iter().map(|(d, t)| (*d, t.as_str())).collect();
    let markers = Markers::scan(&text, &tag_refs);

    let days = (1..=DAYS_PER_WEEK)
        .map(|day| match markers.section(day, |later| later > day) {
            Some(section) => {
                debug!(day, "parsing generated day section");
                MealPlan::new(patient_id, day, extract_meals(section), format!("Day {day} plan"))
            }
            None => MealPlan::new(
                patient_id,
                day,
                default_day(patient, day),
                format!("Day {day} plan"),
            ),
        })
        .collect();

    let week = WeeklyMealPlan {
        patient_id: patient_id.to_string(),
        days,
        notes: WEEKLY_NOTES.to_string(),
    };

    if is_valid_week(&week) {
        week
    } else {
        warn!(
            patient_id,
            "generated week has an empty day, replacing with default week"
        );
        default_week_for(patient_id, patient)
    }
}

/// Exactly seven days, each with at least one non-empty meal list.
///
/// Snacks count: a day holding only snacks is valid.
pub fn is_valid_week(week: &WeeklyMealPlan) -> bool {
    week.days.len() == usize::from(DAYS_PER_WEEK) && week.days.iter().all(|d| !d.meals.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::DayMeals;

    fn patient() -> Patient {
        Patient::new("P1", 30, "female", 60.0, 165.0, "moderate", "pitta")
    }

    #[test]
    fn missing_text_yields_default_days() {
        let p = patient();
        let week = assemble_week(None, "P1", &p);
        assert!(is_valid_week(&week));
        assert_eq!(week.notes, WEEKLY_NOTES);
        for plan in &week.days {
            assert_eq!(plan.meals, default_day(&p, plan.day));
        }
    }

    #[test]
    fn day_sections_are_bounded_by_later_days_only() {
        let text = "day2: lunch: rice day1: breakfast: oats";
        let week = assemble_week(Some(text), "P1", &patient());
        assert_eq!(week.days[0].meals.breakfast, vec!["oats"]);
        // No later day follows day2, so its section runs over day1's text.
        assert_eq!(week.days[1].meals.lunch, vec!["rice day1:"]);
        assert_eq!(week.days[1].meals.breakfast, vec!["oats"]);
    }

    #[test]
    fn empty_day_section_replaces_whole_week() {
        let p = patient();
        let text = "day1: breakfast: oats day2: nothing here";
        let week = assemble_week(Some(text), "P1", &p);
        assert_eq!(week, default_week_for("P1", &p));
    }

    #[test]
    fn validity_counts_snacks() {
        let mut week = default_week_for("P1", &patient());
        assert!(is_valid_week(&week));

        week.days[3].meals = DayMeals {
            snacks: vec!["dates".into()],
            ..DayMeals::default()
        };
        assert!(is_valid_week(&week));

        week.days[3].meals = DayMeals::default();
        assert!(!is_valid_week(&week));

        week.days.pop();
        week.days[3].meals.snacks.push("dates".into());
        assert!(!is_valid_week(&week));
    }
}
