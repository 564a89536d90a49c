//! Domain records: foods, patients, and the meal plans built for them.
//!
//! Records are plain data. They deserialize leniently (see [`lenient`]) so
//! that partially filled knowledge-base entries load without errors; absent
//! optional fields simply contribute nothing downstream.

pub mod lenient;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// BMI assumed when height is missing or non-positive.
pub const FALLBACK_BMI: f64 = 24.0;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// One of the four meal slots of a day, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl Meal {
    /// All meals in the order they are scanned and rendered.
    pub const ALL: [Meal; 4] = [Meal::Breakfast, Meal::Lunch, Meal::Dinner, Meal::Snacks];

    /// The lower-case keyword used in tagged plan text.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snacks => "snacks",
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Constitution used to pick default meals.
///
/// Only the three pure doshas have their own tables; every other prakriti
/// string (including dual constitutions such as `vata-pitta`) resolves to
/// [`Constitution::Vata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constitution {
    Vata,
    Pitta,
    Kapha,
}

impl Constitution {
    /// Resolve a free-form prakriti string, case-insensitively.
    pub fn from_prakriti(prakriti: &str) -> Self {
        prakriti.trim().parse().unwrap_or(Self::Vata)
    }
}

impl fmt::Display for Constitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Vata => "vata",
            Self::Pitta => "pitta",
            Self::Kapha => "kapha",
        };
        f.write_str(s)
    }
}

impl FromStr for Constitution {
    type Err = ConstitutionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vata" => Ok(Self::Vata),
            "pitta" => Ok(Self::Pitta),
            "kapha" => Ok(Self::Kapha),
            _ => Err(ConstitutionParseError(s.to_owned())),
        }
    }
}

/// Error returned when a string names no single constitution.
#[derive(Debug, Clone)]
pub struct ConstitutionParseError(pub String);

impl fmt::Display for ConstitutionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid constitution: {:?}", self.0)
    }
}

impl std::error::Error for ConstitutionParseError {}

// ---------------------------------------------------------------------------

/// How a food moves one dosha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoshaEffect {
    Increase,
    Decrease,
    Neutral,
}

impl DoshaEffect {
    /// Relation label used for the food -> dosha edge.
    pub fn relation(self) -> &'static str {
        match self {
            Self::Increase => "affects_increase",
            Self::Decrease => "affects_decrease",
            Self::Neutral => "affects_neutral",
        }
    }
}

impl fmt::Display for DoshaEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

impl FromStr for DoshaEffect {
    type Err = DoshaEffectParseError;

    /// Accepts the long names and the compact `+` / `-` / `0` / `=` forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "increase" | "increases" | "+" => Ok(Self::Increase),
            "decrease" | "decreases" | "-" => Ok(Self::Decrease),
            "neutral" | "0" | "=" => Ok(Self::Neutral),
            other => Err(DoshaEffectParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`DoshaEffect`] string.
#[derive(Debug, Clone)]
pub struct DoshaEffectParseError(pub String);

impl fmt::Display for DoshaEffectParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid dosha effect: {:?}", self.0)
    }
}

impl std::error::Error for DoshaEffectParseError {}

// ---------------------------------------------------------------------------
// Food
// ---------------------------------------------------------------------------

/// A food item from the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    #[serde(alias = "food_id")]
    pub id: String,
    #[serde(alias = "food_name")]
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default, alias = "carbohydrates")]
    pub carbs: f64,
    #[serde(default, alias = "fat")]
    pub fats: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default)]
    pub vitamins: BTreeMap<String, f64>,
    #[serde(default)]
    pub minerals: BTreeMap<String, f64>,
    /// Dosha name -> effect. Malformed entries are dropped on load.
    #[serde(default, deserialize_with = "lenient::dosha_effects")]
    pub dosha_effects: BTreeMap<String, DoshaEffect>,
    /// Taste. An empty string means "absent".
    #[serde(default = "default_rasa")]
    pub rasa: String,
    #[serde(default, alias = "qualities", deserialize_with = "lenient::string_list")]
    pub guna: Vec<String>,
    #[serde(default = "default_virya")]
    pub virya: String,
    #[serde(default = "default_vipaka")]
    pub vipaka: String,
    #[serde(default, alias = "tags", deserialize_with = "lenient::string_list")]
    pub health_tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub contraindications: Vec<String>,
}

impl Food {
    /// A food with the given identity and every optional attribute empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fats: 0.0,
            fiber: 0.0,
            vitamins: BTreeMap::new(),
            minerals: BTreeMap::new(),
            dosha_effects: BTreeMap::new(),
            rasa: String::new(),
            guna: Vec::new(),
            virya: String::new(),
            vipaka: String::new(),
            health_tags: Vec::new(),
            contraindications: Vec::new(),
        }
    }
}

fn default_category() -> String {
    "unknown".to_string()
}

fn default_rasa() -> String {
    "sweet".to_string()
}

fn default_virya() -> String {
    "neutral".to_string()
}

fn default_vipaka() -> String {
    "sweet".to_string()
}

// ---------------------------------------------------------------------------
// Patient
// ---------------------------------------------------------------------------

/// A patient profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(alias = "patient_id")]
    pub id: String,
    #[serde(default = "default_age")]
    pub age: u32,
    #[serde(default = "default_gender")]
    pub gender: String,
    /// Weight in kilograms.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Height in centimetres, or metres when `<= 3`.
    #[serde(default = "default_height")]
    pub height: f64,
    /// Zero when not supplied; see [`Patient::normalized`].
    #[serde(default)]
    pub bmi: f64,
    #[serde(default = "default_lifestyle")]
    pub lifestyle: String,
    #[serde(default = "default_prakriti", alias = "constitution")]
    pub prakriti: String,
    #[serde(default, alias = "conditions", deserialize_with = "lenient::string_list")]
    pub health_conditions: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub allergies: Vec<String>,
    #[serde(default, alias = "cuisine", deserialize_with = "lenient::string_list")]
    pub preferred_cuisine: Vec<String>,
}

impl Patient {
    /// Build a patient, deriving BMI from weight and height.
    pub fn new(
        id: impl Into<String>,
        age: u32,
        gender: impl Into<String>,
        weight: f64,
        height: f64,
        lifestyle: impl Into<String>,
        prakriti: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            age,
            gender: gender.into(),
            weight,
            height,
            bmi: compute_bmi(weight, height),
            lifestyle: lifestyle.into(),
            prakriti: prakriti.into(),
            health_conditions: Vec::new(),
            allergies: Vec::new(),
            preferred_cuisine: Vec::new(),
        }
    }

    /// Fill in BMI when the record did not carry one.
    pub fn normalized(mut self) -> Self {
        if self.bmi <= 0.0 || !self.bmi.is_finite() {
            self.bmi = compute_bmi(self.weight, self.height);
        }
        self
    }

    /// The constitution that drives default meal selection.
    pub fn constitution(&self) -> Constitution {
        Constitution::from_prakriti(&self.prakriti)
    }
}

fn default_age() -> u32 {
    30
}

fn default_gender() -> String {
    "unknown".to_string()
}

fn default_weight() -> f64 {
    70.0
}

fn default_height() -> f64 {
    170.0
}

fn default_lifestyle() -> String {
    "moderate".to_string()
}

fn default_prakriti() -> String {
    "vata".to_string()
}

/// Body-mass index rounded to one decimal place (half away from zero).
///
/// Heights above 3 are taken as centimetres. A non-positive or non-finite
/// height yields [`FALLBACK_BMI`].
pub fn compute_bmi(weight_kg: f64, height: f64) -> f64 {
    let height_m = if height > 3.0 { height / 100.0 } else { height };
    if height_m <= 0.0 || !height_m.is_finite() || !weight_kg.is_finite() {
        return FALLBACK_BMI;
    }
    let bmi = weight_kg / (height_m * height_m);
    (bmi * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// The four meal lists of a single day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMeals {
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub breakfast: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub lunch: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub dinner: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub snacks: Vec<String>,
}

impl DayMeals {
    pub fn get(&self, meal: Meal) -> &[String] {
        match meal {
            Meal::Breakfast => &self.breakfast,
            Meal::Lunch => &self.lunch,
            Meal::Dinner => &self.dinner,
            Meal::Snacks => &self.snacks,
        }
    }

    pub fn get_mut(&mut self, meal: Meal) -> &mut Vec<String> {
        match meal {
            Meal::Breakfast => &mut self.breakfast,
            Meal::Lunch => &mut self.lunch,
            Meal::Dinner => &mut self.dinner,
            Meal::Snacks => &mut self.snacks,
        }
    }

    /// `true` when all four lists are empty.
    pub fn is_empty(&self) -> bool {
        Meal::ALL.iter().all(|m| self.get(*m).is_empty())
    }

    /// Total number of items across all meals.
    pub fn item_count(&self) -> usize {
        Meal::ALL.iter().map(|m| self.get(*m).len()).sum()
    }
}

/// A single day of a patient's plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub patient_id: String,
    /// Day number, 1 through 7.
    pub day: u8,
    #[serde(flatten)]
    pub meals: DayMeals,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub restrictions: Vec<String>,
    #[serde(default, alias = "doctor_notes")]
    pub notes: String,
}

impl MealPlan {
    pub fn new(patient_id: impl Into<String>, day: u8, meals: DayMeals, notes: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            day,
            meals,
            restrictions: Vec::new(),
            notes: notes.into(),
        }
    }
}

/// Seven consecutive days for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMealPlan {
    pub patient_id: String,
    pub days: Vec<MealPlan>,
    #[serde(default)]
    pub notes: String,
}
