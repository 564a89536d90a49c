//! Deterministic default plans keyed by constitution and day.
//!
//! Each constitution has a fixed table of candidate items per meal. A day
//! selects a window into each list starting at `(day - 1) % 3`; windows that
//! run past the end of a list are shortened, never wrapped.

use crate::records::{Constitution, DayMeals, Meal, MealPlan, Patient, WeeklyMealPlan};

/// Days in a weekly plan.
pub const DAYS_PER_WEEK: u8 = 7;

struct MealTable {
    breakfast: &'static [&'static str],
    lunch: &'static [&'static str],
    dinner: &'static [&'static str],
    snacks: &'static [&'static str],
}

impl MealTable {
    fn items(&self, meal: Meal) -> &'static [&'static str] {
        match meal {
            Meal::Breakfast => self.breakfast,
            Meal::Lunch => self.lunch,
            Meal::Dinner => self.dinner,
            Meal::Snacks => self.snacks,
        }
    }
}

const VATA: MealTable = MealTable {
    breakfast: &["oatmeal", "warm milk", "almonds", "dates", "honey"],
    lunch: &["rice", "moong dal", "ghee", "cooked vegetables", "yogurt"],
    dinner: &["khichdi", "soup", "bread", "cooked spinach", "warm tea"],
    snacks: &["banana", "soaked almonds", "warm beverages"],
};

const PITTA: MealTable = MealTable {
    breakfast: &["coconut water", "sweet fruits", "milk", "cereal", "cooling foods"],
    lunch: &["basmati rice", "green vegetables", "cucumber", "yogurt", "salad"],
    dinner: &["quinoa", "salad", "sweet potato", "green beans", "herbal tea"],
    snacks: &["watermelon", "coconut", "cooling drinks"],
};

const KAPHA: MealTable = MealTable {
    breakfast: &["honey water", "light breakfast", "berries", "green tea", "spices"],
    lunch: &["millet", "bitter vegetables", "spices", "legumes", "warm water"],
    dinner: &["barley soup", "steamed vegetables", "ginger tea", "light foods"],
    snacks: &["apple", "pear", "warm beverages"],
};

fn table(constitution: Constitution) -> &'static MealTable {
    match constitution {
        Constitution::Vata => &VATA,
        Constitution::Pitta => &PITTA,
        Constitution::Kapha => &KAPHA,
    }
}

fn span(meal: Meal) -> usize {
    match meal {
        Meal::Snacks => 2,
        _ => 3,
    }
}

/// Window offset for a day number; days 1, 4 and 7 share an offset.
pub fn day_offset(day: u8) -> usize {
    (i32::from(day) - 1).rem_euclid(3) as usize
}

/// Default meals for a constitution on a given day.
pub fn default_meals(constitution: Constitution, day: u8) -> DayMeals {
    let table = table(constitution);
    let offset = day_offset(day);
    let mut meals = DayMeals::default();
    for meal in Meal::ALL {
        *meals.get_mut(meal) = table
            .items(meal)
            .iter()
            .skip(offset)
            .take(span(meal))
            .map(|item| item.to_string())
            .collect();
    }
    meals
}

/// Default meals for a patient, resolved through their prakriti.
pub fn default_day(patient: &Patient, day: u8) -> DayMeals {
    default_meals(patient.constitution(), day)
}

/// A full default week for `patient`.
pub fn default_week(patient: &Patient) -> WeeklyMealPlan {
    default_week_for(&patient.id, patient)
}

/// A full default week filed under `patient_id`.
pub fn default_week_for(patient_id: &str, patient: &Patient) -> WeeklyMealPlan {
    let days = (1..=DAYS_PER_WEEK)
        .map(|day| {
            MealPlan::new(
                patient_id,
                day,
                default_day(patient, day),
                format!("Day {day} - tailored for {} constitution", patient.prakriti),
            )
        })
        .collect();
    WeeklyMealPlan {
        patient_id: patient_id.to_string(),
        days,
        notes: format!("7-day meal plan for {} constitution", patient.prakriti),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(prakriti: &str) -> Patient {
        Patient::new("P1", 30, "female", 60.0, 165.0, "moderate", prakriti)
    }

    #[test]
    fn offsets_cycle_every_three_days() {
        let offsets: Vec<usize> = (1..=7).map(day_offset).collect();
        assert_eq!(offsets, vec![0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(day_offset(0), 2);
    }

    #[test]
    fn vata_day_one() {
        let meals = default_meals(Constitution::Vata, 1);
        assert_eq!(meals.breakfast, vec!["oatmeal", "warm milk", "almonds"]);
        assert_eq!(meals.lunch, vec!["rice", "moong dal", "ghee"]);
        assert_eq!(meals.dinner, vec!["khichdi", "soup", "bread"]);
        assert_eq!(meals.snacks, vec!["banana", "soaked almonds"]);
    }

    #[test]
    fn pitta_day_three_window() {
        let meals = default_meals(Constitution::Pitta, 3);
        assert_eq!(meals.breakfast, vec!["milk", "cereal", "cooling foods"]);
        assert_eq!(meals.snacks, vec!["cooling drinks"]);
    }

    #[test]
    fn short_lists_are_truncated_not_wrapped() {
        let meals = default_meals(Constitution::Kapha, 3);
        assert_eq!(meals.dinner, vec!["ginger tea", "light foods"]);
    }

    #[test]
    fn days_sharing_an_offset_match() {
        let p = patient("pitta");
        assert_eq!(default_day(&p, 1), default_day(&p, 4));
        assert_eq!(default_day(&p, 4), default_day(&p, 7));
        assert_ne!(default_day(&p, 1), default_day(&p, 2));
    }

    #[test]
    fn dual_constitution_uses_vata() {
        let p = patient("vata-pitta");
        assert_eq!(default_day(&p, 2), default_meals(Constitution::Vata, 2));
    }

    #[test]
    fn default_week_notes() {
        let week = default_week(&patient("kapha"));
        assert_eq!(week.days.len(), 7);
        assert_eq!(week.notes, "7-day meal plan for kapha constitution");
        assert_eq!(week.days[6].day, 7);
        assert_eq!(week.days[0].notes, "Day 1 - tailored for kapha constitution");
        assert!(week.days.iter().all(|d| !d.meals.is_empty()));
    }
}
