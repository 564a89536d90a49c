//! Node typing and fixed-width feature encoding.
//!
//! Every node exports exactly [`FEATURE_WIDTH`] floats:
//!
//! ```text
//! [ node-type one-hot (7) | type-specific features | zero padding ]
//! ```
//!
//! Food nodes carry `calories, protein, carbs, fats, fiber` followed by a
//! 9-slot category encoding (8 vocabulary slots + "unknown"). Patient nodes
//! carry `age, bmi`, a 2-slot gender encoding and a 4-slot lifestyle
//! encoding. Attribute nodes carry nothing beyond their type. The slot order
//! is a compatibility contract with models trained on earlier exports; do
//! not reorder.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::records::{Food, Patient};

/// Width of every exported feature vector.
pub const FEATURE_WIDTH: usize = 32;

// ---------------------------------------------------------------------------
// Node type
// ---------------------------------------------------------------------------

/// Kind of a knowledge-graph node. Declaration order is the one-hot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Food,
    Patient,
    Dosha,
    Rasa,
    Guna,
    Condition,
    Category,
}

impl NodeType {
    pub const ALL: [NodeType; 7] = [
        NodeType::Food,
        NodeType::Patient,
        NodeType::Dosha,
        NodeType::Rasa,
        NodeType::Guna,
        NodeType::Condition,
        NodeType::Category,
    ];

    /// Key prefix: nodes are keyed `"<prefix>_<value>"`.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Patient => "patient",
            Self::Dosha => "dosha",
            Self::Rasa => "rasa",
            Self::Guna => "guna",
            Self::Condition => "condition",
            Self::Category => "category",
        }
    }

    /// Build the stable node key for a value of this type.
    pub fn key(self, value: &str) -> String {
        format!("{}_{}", self.prefix(), value)
    }

    fn slot(self) -> usize {
        self as usize
    }

    fn one_hot(self) -> [f32; 7] {
        let mut out = [0.0; 7];
        out[self.slot()] = 1.0;
        out
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

// ---------------------------------------------------------------------------
// Categorical encodings
// ---------------------------------------------------------------------------

/// The closed category vocabulary, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    Grains,
    Vegetables,
    Fruits,
    Dairy,
    Spices,
    Legumes,
    Nuts,
    Oils,
}

impl FoodCategory {
    pub const VOCABULARY: [FoodCategory; 8] = [
        FoodCategory::Grains,
        FoodCategory::Vegetables,
        FoodCategory::Fruits,
        FoodCategory::Dairy,
        FoodCategory::Spices,
        FoodCategory::Legumes,
        FoodCategory::Nuts,
        FoodCategory::Oils,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Grains => "grains",
            Self::Vegetables => "vegetables",
            Self::Fruits => "fruits",
            Self::Dairy => "dairy",
            Self::Spices => "spices",
            Self::Legumes => "legumes",
            Self::Nuts => "nuts",
            Self::Oils => "oils",
        }
    }
}

/// Category slot assignment. Labels outside the vocabulary (including
/// `beverages`) land in the trailing unknown slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryEncoding {
    Known(FoodCategory),
    Unknown,
}

impl CategoryEncoding {
    pub const WIDTH: usize = 9;

    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        FoodCategory::VOCABULARY
            .iter()
            .find(|c| c.label() == label)
            .map_or(Self::Unknown, |c| Self::Known(*c))
    }

    pub fn encode(self) -> [f32; Self::WIDTH] {
        let mut out = [0.0; Self::WIDTH];
        match self {
            Self::Known(category) => out[category as usize] = 1.0,
            Self::Unknown => out[Self::WIDTH - 1] = 1.0,
        }
        out
    }
}

/// Two-slot gender encoding. Anything other than "male" takes the second slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderEncoding {
    Male,
    Other,
}

impl GenderEncoding {
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("male") {
            Self::Male
        } else {
            Self::Other
        }
    }

    pub fn encode(self) -> [f32; 2] {
        match self {
            Self::Male => [1.0, 0.0],
            Self::Other => [0.0, 1.0],
        }
    }
}

/// Activity level vocabulary, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifestyle {
    Sedentary,
    Moderate,
    Active,
    VeryActive,
}

impl Lifestyle {
    pub const VOCABULARY: [Lifestyle; 4] = [
        Lifestyle::Sedentary,
        Lifestyle::Moderate,
        Lifestyle::Active,
        Lifestyle::VeryActive,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "very_active",
        }
    }
}

/// Four-slot lifestyle encoding. Unknown labels encode as all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifestyleEncoding {
    Known(Lifestyle),
    Unknown,
}

impl LifestyleEncoding {
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        Lifestyle::VOCABULARY
            .iter()
            .find(|l| l.label() == label)
            .map_or(Self::Unknown, |l| Self::Known(*l))
    }

    pub fn encode(self) -> [f32; 4] {
        let mut out = [0.0; 4];
        if let Self::Known(lifestyle) = self {
            out[lifestyle as usize] = 1.0;
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Per-node features
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FoodFeatures {
    pub calories: f32,
    pub protein: f32,
    pub carbs: f32,
    pub fats: f32,
    pub fiber: f32,
    pub category: CategoryEncoding,
}

impl From<&Food> for FoodFeatures {
    fn from(food: &Food) -> Self {
        Self {
            calories: food.calories as f32,
            protein: food.protein as f32,
            carbs: food.carbs as f32,
            fats: food.fats as f32,
            fiber: food.fiber as f32,
            category: CategoryEncoding::from_label(&food.category),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatientFeatures {
    pub age: f32,
    pub bmi: f32,
    pub gender: GenderEncoding,
    pub lifestyle: LifestyleEncoding,
}

impl From<&Patient> for PatientFeatures {
    fn from(patient: &Patient) -> Self {
        Self {
            age: patient.age as f32,
            bmi: patient.bmi as f32,
            gender: GenderEncoding::from_label(&patient.gender),
            lifestyle: LifestyleEncoding::from_label(&patient.lifestyle),
        }
    }
}

/// Feature bag of a node, one variant per kind of payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeFeatures {
    Food(FoodFeatures),
    Patient(PatientFeatures),
    /// Dosha, rasa, guna, condition and category nodes.
    Attribute,
}

impl NodeFeatures {
    /// Encode into the fixed export width, padding with zeros and
    /// truncating anything beyond [`FEATURE_WIDTH`].
    pub fn to_fixed_vector(&self, node_type: NodeType) -> [f32; FEATURE_WIDTH] {
        let mut values: Vec<f32> = Vec::with_capacity(FEATURE_WIDTH);
        values.extend_from_slice(&node_type.one_hot());

        match self {
            Self::Food(f) => {
                values.extend_from_slice(&[f.calories, f.protein, f.carbs, f.fats, f.fiber]);
                values.extend_from_slice(&f.category.encode());
            }
            Self::Patient(p) => {
                values.extend_from_slice(&[p.age, p.bmi]);
                values.extend_from_slice(&p.gender.encode());
                values.extend_from_slice(&p.lifestyle.encode());
            }
            Self::Attribute => {}
        }

        let mut out = [0.0; FEATURE_WIDTH];
        for (slot, value) in out.iter_mut().zip(values) {
            *slot = value;
        }
        out
    }
}
