//! Render plans back into the tagged text form the parser reads.

use crate::records::{DayMeals, Meal, WeeklyMealPlan};

/// `"breakfast: a, b lunch: c ..."`, omitting empty meals.
pub fn format_day(meals: &DayMeals) -> String {
    Meal::ALL
        .iter()
        .filter(|meal| !meals.get(**meal).is_empty())
        .map(|meal| format!("{}: {}", meal.keyword(), meals.get(*meal).join(", ")))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"day1: breakfast: ... day2: ..."` for every day of the plan.
pub fn format_week(plan: &WeeklyMealPlan) -> String {
    plan.days
        .iter()
        .map(|day| format!("day{}: {}", day.day, format_day(&day.meals)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::parser::extract_meals;

    fn meals() -> DayMeals {
        DayMeals {
            breakfast: vec!["Oats".into(), "Warm Milk".into()],
            lunch: vec![],
            dinner: vec!["Khichdi".into()],
            snacks: vec!["Dates".into()],
        }
    }

    #[test]
    fn day_omits_empty_meals() {
        assert_eq!(
            format_day(&meals()),
            "breakfast: Oats, Warm Milk dinner: Khichdi snacks: Dates"
        );
        assert_eq!(format_day(&DayMeals::default()), "");
    }

    #[test]
    fn formatted_day_parses_back() {
        let parsed = extract_meals(&format_day(&meals()));
        assert_eq!(parsed.breakfast, vec!["oats", "warm milk"]);
        assert!(parsed.lunch.is_empty());
        assert_eq!(parsed.dinner, vec!["khichdi"]);
        assert_eq!(parsed.snacks, vec!["dates"]);
    }
}
