//! Typed knowledge graph over foods, patients and Ayurvedic attributes.
//!
//! The graph owns three structures that are mutated together by
//! [`KnowledgeGraph::add_food`] and [`KnowledgeGraph::add_patient`]:
//!
//! - the node list (insertion order is the export order),
//! - the undirected edge list, one relation per unordered node pair,
//! - the per-category food index consumed by the category recommender.
//!
//! A graph is built by a single owner and then shared read-only (typically
//! behind an `Arc`); rebuilding means constructing a fresh graph.

pub mod encoding;
pub mod export;

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::records::{Food, Patient};

pub use encoding::{
    CategoryEncoding, FEATURE_WIDTH, FoodCategory, FoodFeatures, GenderEncoding, Lifestyle,
    LifestyleEncoding, NodeFeatures, NodeType, PatientFeatures,
};
pub use export::FeatureExport;

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

pub const HAS_TASTE: &str = "has_taste";
pub const HAS_QUALITY: &str = "has_quality";
pub const BELONGS_TO: &str = "belongs_to";
pub const BENEFICIAL_FOR: &str = "beneficial_for";
pub const HAS_PRAKRITI: &str = "has_prakriti";
pub const HAS_CONDITION: &str = "has_condition";

// ---------------------------------------------------------------------------
// Graph elements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub key: String,
    pub node_type: NodeType,
    pub features: NodeFeatures,
}

/// An undirected, labelled edge. `source` is the node that asserted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub relation: String,
}

/// A food listed under its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub node_key: String,
    pub name: String,
}

type PairKey = (String, String);

fn pair_key(a: &str, b: &str) -> PairKey {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

// ---------------------------------------------------------------------------
// KnowledgeGraph
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    nodes: Vec<Node>,
    node_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_index: HashMap<PairKey, usize>,
    categories: BTreeMap<String, Vec<CategoryEntry>>,
}

impl KnowledgeGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from complete record sets.
    pub fn from_records<'a>(
        foods: impl IntoIterator<Item = &'a Food>,
        patients: impl IntoIterator<Item = &'a Patient>,
    ) -> Self {
        let mut graph = Self::new();
        for food in foods {
            graph.add_food(food);
        }
        for patient in patients {
            graph.add_patient(patient);
        }
        graph
    }

    /// Insert or refresh a food node and its attribute edges.
    ///
    /// Re-adding a food with the same id replaces its features, drops the
    /// edges it previously asserted, and re-asserts them from the new record.
    /// A changed category moves the food in the category index. Blank
    /// attribute values add no node.
    pub fn add_food(&mut self, food: &Food) {
        let key = NodeType::Food.key(&food.id);
        self.upsert_node(
            &key,
            NodeType::Food,
            NodeFeatures::Food(FoodFeatures::from(food)),
        );
        self.clear_edges_from(&key);
        self.index_category(&key, food);

        for (dosha, effect) in &food.dosha_effects {
            self.link(&key, NodeType::Dosha, dosha, effect.relation());
        }
        self.link(&key, NodeType::Rasa, &food.rasa, HAS_TASTE);
        for guna in &food.guna {
            self.link(&key, NodeType::Guna, guna, HAS_QUALITY);
        }
        self.link(&key, NodeType::Category, &food.category, BELONGS_TO);
        for tag in &food.health_tags {
            self.link(&key, NodeType::Condition, tag, BENEFICIAL_FOR);
        }

        debug!(food = %food.id, category = %food.category, "indexed food");
    }

    /// Insert or refresh a patient node, its prakriti edge and condition edges.
    pub fn add_patient(&mut self, patient: &Patient) {
        let key = NodeType::Patient.key(&patient.id);
        self.upsert_node(
            &key,
            NodeType::Patient,
            NodeFeatures::Patient(PatientFeatures::from(patient)),
        );
        self.clear_edges_from(&key);

        let prakriti = patient.prakriti.to_lowercase();
        self.link(&key, NodeType::Dosha, &prakriti, HAS_PRAKRITI);
        for condition in &patient.health_conditions {
            self.link(&key, NodeType::Condition, condition, HAS_CONDITION);
        }

        debug!(patient = %patient.id, "indexed patient");
    }

    // -- queries -------------------------------------------------------------

    /// Number of nodes of every type.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// `true` when no node has been added.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look a node up by its key, e.g. `food_F001`.
    pub fn node(&self, key: &str) -> Option<&Node> {
        self.node_index.get(key).map(|&i| &self.nodes[i])
    }

    /// Relation between two nodes, regardless of argument order.
    pub fn relation(&self, a: &str, b: &str) -> Option<&str> {
        self.edge_index
            .get(&pair_key(a, b))
            .map(|&i| self.edges[i].relation.as_str())
    }

    /// Edges touching `key`, in insertion order.
    pub fn edges_of<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.source == key || e.target == key)
    }

    /// `true` once at least one food is indexed under a category.
    pub fn has_category_data(&self) -> bool {
        self.categories.values().any(|entries| !entries.is_empty())
    }

    /// Food display names of one category, in insertion order.
    pub fn names_in_category(&self, category: &str) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|entries| entries.iter().map(|e| e.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Category -> food display names, each list in insertion order.
    pub fn food_names_by_category(&self) -> BTreeMap<&str, Vec<&str>> {
        self.categories
            .iter()
            .map(|(category, entries)| {
                (
                    category.as_str(),
                    entries.iter().map(|e| e.name.as_str()).collect(),
                )
            })
            .collect()
    }

    /// Index entries of one category, in insertion order.
    pub fn category_entries(&self, category: &str) -> &[CategoryEntry] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    // -- internals -----------------------------------------------------------

    fn upsert_node(&mut self, key: &str, node_type: NodeType, features: NodeFeatures) {
        match self.node_index.get(key) {
            Some(&i) => self.nodes[i].features = features,
            None => {
                self.node_index.insert(key.to_string(), self.nodes.len());
                self.nodes.push(Node {
                    key: key.to_string(),
                    node_type,
                    features,
                });
            }
        }
    }

    /// Connect `source` to the attribute node for `value`, creating it on
    /// first use. Blank values are skipped.
    fn link(&mut self, source: &str, node_type: NodeType, value: &str, relation: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let key = node_type.key(value);
        if !self.node_index.contains_key(&key) {
            self.upsert_node(&key, node_type, NodeFeatures::Attribute);
        }
        self.connect(source, &key, relation);
    }

    fn connect(&mut self, source: &str, target: &str, relation: &str) {
        let pair = pair_key(source, target);
        match self.edge_index.get(&pair) {
            Some(&i) => self.edges[i].relation = relation.to_string(),
            None => {
                self.edge_index.insert(pair, self.edges.len());
                self.edges.push(Edge {
                    source: source.to_string(),
                    target: target.to_string(),
                    relation: relation.to_string(),
                });
            }
        }
    }

    fn clear_edges_from(&mut self, source: &str) {
        let before = self.edges.len();
        self.edges.retain(|e| e.source != source);
        if self.edges.len() != before {
            self.edge_index = self
                .edges
                .iter()
                .enumerate()
                .map(|(i, e)| (pair_key(&e.source, &e.target), i))
                .collect();
        }
    }

    fn index_category(&mut self, node_key: &str, food: &Food) {
        let entry = CategoryEntry {
            node_key: node_key.to_string(),
            name: food.name.clone(),
        };

        // A food appears under exactly one category, once.
        let mut existing = None;
        for (category, entries) in self.categories.iter_mut() {
            if let Some(pos) = entries.iter().position(|e| e.node_key == node_key) {
                if *category == food.category {
                    entries[pos] = entry.clone();
                    existing = Some(category.clone());
                } else {
                    entries.remove(pos);
                }
                break;
            }
        }
        if existing.is_none() {
            self.categories
                .entry(food.category.clone())
                .or_default()
                .push(entry);
        }
        self.categories.retain(|_, entries| !entries.is_empty());
    }
}
