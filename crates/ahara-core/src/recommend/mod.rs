//! Category-driven meal suggestions.
//!
//! A structural fallback: each meal draws a fixed number of names from a
//! fixed list of categories in the graph's category index. The patient is
//! accepted for interface symmetry with the generated path but does not
//! influence the result.

use crate::graph::{FoodCategory, KnowledgeGraph};
use crate::records::{DayMeals, Meal, Patient};

/// Which slice of each category a meal draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Take {
    /// The first `n` names.
    First(usize),
    /// Names 3 and 4 when the category has more than two, else the first two.
    SecondPair,
}

#[derive(Debug, Clone, Copy)]
struct MealRule {
    categories: &'static [FoodCategory],
    take: Take,
    cap: usize,
}

const MAIN_MEAL: &[FoodCategory] = &[
    FoodCategory::Grains,
    FoodCategory::Vegetables,
    FoodCategory::Legumes,
    FoodCategory::Dairy,
];

fn rule(meal: Meal) -> MealRule {
    match meal {
        Meal::Breakfast => MealRule {
            categories: &[
                FoodCategory::Grains,
                FoodCategory::Fruits,
                FoodCategory::Dairy,
                FoodCategory::Nuts,
            ],
            take: Take::First(2),
            cap: 4,
        },
        Meal::Lunch => MealRule {
            categories: MAIN_MEAL,
            take: Take::First(2),
            cap: 5,
        },
        Meal::Dinner => MealRule {
            categories: MAIN_MEAL,
            take: Take::SecondPair,
            cap: 5,
        },
        Meal::Snacks => MealRule {
            categories: &[FoodCategory::Fruits, FoodCategory::Nuts, FoodCategory::Dairy],
            take: Take::First(1),
            cap: 2,
        },
    }
}

impl Take {
    fn range(self, len: usize) -> std::ops::Range<usize> {
        match self {
            Take::First(n) => 0..len.min(n),
            Take::SecondPair if len > 2 => 2..len.min(4),
            Take::SecondPair => 0..len.min(2),
        }
    }
}

/// Suggest meals for `patient` from the graph's category index.
///
/// An empty graph yields four empty lists.
pub fn recommend(graph: &KnowledgeGraph, _patient: &Patient) -> DayMeals {
    let mut meals = DayMeals::default();
    for meal in Meal::ALL {
        let rule = rule(meal);
        let items: Vec<String> = rule
            .categories
            .iter()
            .flat_map(|category| {
                let names = graph.names_in_category(category.label());
                names[rule.take.range(names.len())]
                    .iter()
                    .map(|name| name.to_string())
                    .collect::<Vec<_>>()
            })
            .take(rule.cap)
            .collect();
        *meals.get_mut(meal) = items;
    }
    meals
}
