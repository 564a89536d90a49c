//! Meal-section parsing for generated plan text.
//!
//! Text is lower-cased, split into `breakfast:` / `lunch:` / `dinner:` /
//! `snacks:` sections by the [`lexer`](super::lexer), and each section is
//! cleaned into at most [`MAX_ITEMS_PER_MEAL`] items. Malformed text never
//! produces an error; the worst case is four empty lists.

use crate::records::{Constitution, DayMeals, Meal};

use super::defaults::default_meals;
use super::lexer::Markers;

/// Items kept per meal after cleaning.
pub const MAX_ITEMS_PER_MEAL: usize = 5;

const MEAL_TAGS: [(Meal, &str); 4] = [
    (Meal::Breakfast, "breakfast:"),
    (Meal::Lunch, "lunch:"),
    (Meal::Dinner, "dinner:"),
    (Meal::Snacks, "snacks:"),
];

/// Extract the four meal lists without any fallback.
pub fn extract_meals(text: &str) -> DayMeals {
    let text = text.to_lowercase();
    let markers = Markers::scan(&text, &MEAL_TAGS);

    let mut meals = DayMeals::default();
    for meal in Meal::ALL {
        if let Some(section) = markers.section(meal, |other| other != meal) {
            *meals.get_mut(meal) = clean_items(section);
        }
    }
    meals
}

/// Parse one day of generated text.
///
/// When no meal can be recovered the day-1 `vata` default is returned.
pub fn parse_single_day(text: &str) -> DayMeals {
    let meals = extract_meals(text);
    if meals.is_empty() {
        return default_meals(Constitution::Vata, 1);
    }
    meals
}

/// Split a section body on commas and clean each item.
///
/// Angle-bracket fragments left by tokenizers become spaces, whitespace
/// runs collapse, and trailing `.`, `,` and `;` are dropped. Items that end
/// up empty, a single character long, or starting with `/` are discarded.
pub fn clean_items(section: &str) -> Vec<String> {
    let section = section.replace("</", " ").replace('<', " ");
    section
        .split(',')
        .filter_map(|raw| {
            let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
            let item = collapsed.trim_end_matches(['.', ',', ';']).trim();
            let keep = item.chars().count() > 1 && !item.starts_with('/');
            keep.then(|| item.to_string())
        })
        .take(MAX_ITEMS_PER_MEAL)
        .collect()
}

/// `true` if any meal keyword appears anywhere in the text.
pub fn has_meal_keyword(text: &str) -> bool {
    let text = text.to_lowercase();
    Meal::ALL.iter().any(|meal| text.contains(meal.keyword()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_all_four_meals() {
        let meals = extract_meals(
            "Breakfast: Oats, Milk Lunch: Rice, Dal, Ghee Dinner: Soup Snacks: Apple, Nuts",
        );
        assert_eq!(meals.breakfast, vec!["oats", "milk"]);
        assert_eq!(meals.lunch, vec!["rice", "dal", "ghee"]);
        assert_eq!(meals.dinner, vec!["soup"]);
        assert_eq!(meals.snacks, vec!["apple", "nuts"]);
    }

    #[test]
    fn section_order_in_text_does_not_matter() {
        let meals = extract_meals("dinner: soup lunch: rice breakfast: oats");
        assert_eq!(meals.breakfast, vec!["oats"]);
        assert_eq!(meals.lunch, vec!["rice"]);
        assert_eq!(meals.dinner, vec!["soup"]);
        assert!(meals.snacks.is_empty());
    }

    #[test]
    fn cleaning_rules() {
        let items = clean_items(" <pad> warm   milk., a, /s, honey;, <unk>dates , ");
        assert_eq!(items, vec!["pad> warm milk", "honey", "unk>dates"]);
    }

    #[test]
    fn closing_tags_become_spaces() {
        assert_eq!(clean_items("rice</s>"), vec!["rice s>"]);
        assert_eq!(clean_items("</s>"), vec!["s>"]);
    }

    #[test]
    fn caps_at_five_items() {
        let items = clean_items("a1, b2, c3, d4, e5, f6, g7");
        assert_eq!(items, vec!["a1", "b2", "c3", "d4", "e5"]);
    }

    #[test]
    fn first_occurrence_wins() {
        let meals = extract_meals("breakfast: oats breakfast: idli lunch: rice");
        assert_eq!(meals.breakfast, vec!["oats breakfast: idli"]);
    }

    #[test]
    fn unstructured_text_falls_back_to_default() {
        let meals = parse_single_day("eat well and sleep early");
        assert_eq!(meals, default_meals(Constitution::Vata, 1));
    }

    #[test]
    fn structured_text_does_not_fall_back() {
        let meals = parse_single_day("snacks: dates");
        assert_eq!(meals.snacks, vec!["dates"]);
        assert!(meals.breakfast.is_empty());
    }

    #[test]
    fn meal_keyword_detection() {
        assert!(has_meal_keyword("A light DINNER is best"));
        assert!(!has_meal_keyword("nothing useful here"));
    }
}
