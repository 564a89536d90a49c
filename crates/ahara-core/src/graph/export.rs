//! Dense feature export handed to graph-conditioned generators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{FEATURE_WIDTH, KnowledgeGraph};

/// Node features and edge list of a [`KnowledgeGraph`], in node insertion order.
///
/// Edges are undirected: each pair appears once in `edge_index`, and
/// `edge_relations[i]` labels `edge_index[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureExport {
    pub node_keys: Vec<String>,
    pub node_index: BTreeMap<String, usize>,
    pub features: Vec<[f32; FEATURE_WIDTH]>,
    pub edge_index: Vec<[usize; 2]>,
    pub edge_relations: Vec<String>,
}

impl FeatureExport {
    pub fn is_empty(&self) -> bool {
        self.node_keys.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.node_keys.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_index.len()
    }

    /// Feature row of a node by key.
    pub fn features_of(&self, key: &str) -> Option<&[f32; FEATURE_WIDTH]> {
        self.node_index.get(key).map(|&i| &self.features[i])
    }

    /// Relation label between two node keys, in either order.
    pub fn relation(&self, a: &str, b: &str) -> Option<&str> {
        let a = *self.node_index.get(a)?;
        let b = *self.node_index.get(b)?;
        self.edge_index
            .iter()
            .position(|&[s, t]| (s == a && t == b) || (s == b && t == a))
            .map(|i| self.edge_relations[i].as_str())
    }

    /// Edge list with both directions spelled out, for consumers that
    /// expect a directed message-passing layout.
    pub fn symmetric_edge_index(&self) -> Vec<[usize; 2]> {
        self.edge_index
            .iter()
            .flat_map(|&[s, t]| [[s, t], [t, s]])
            .collect()
    }
}

impl KnowledgeGraph {
    /// Export every node as a fixed-width row plus the index-pair edge list.
    ///
    /// An empty graph exports empty collections; callers treat that as the
    /// signal to skip graph conditioning.
    pub fn build_feature_export(&self) -> FeatureExport {
        if self.is_empty() {
            info!("knowledge graph is empty, exporting no features");
            return FeatureExport::default();
        }

        let node_keys: Vec<String> = self.nodes.iter().map(|n| n.key.clone()).collect();
        let node_index: BTreeMap<String, usize> = node_keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), i))
            .collect();
        let features = self
            .nodes
            .iter()
            .map(|n| n.features.to_fixed_vector(n.node_type))
            .collect();

        let mut edge_index = Vec::with_capacity(self.edges.len());
        let mut edge_relations = Vec::with_capacity(self.edges.len());
        for edge in &self.edges {
            if let (Some(&s), Some(&t)) = (node_index.get(&edge.source), node_index.get(&edge.target)) {
                edge_index.push([s, t]);
                edge_relations.push(edge.relation.clone());
            }
        }

        info!(
            nodes = node_keys.len(),
            edges = edge_index.len(),
            "built feature export"
        );

        FeatureExport {
            node_keys,
            node_index,
            features,
            edge_index,
            edge_relations,
        }
    }
}
