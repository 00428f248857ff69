use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Directed;
use pastense_protocol::{Lexicon, VerbClass};
use std::collections::HashMap;

use crate::error::SolverError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    IsA,          // walk IsA Activity
    HasAttribute, // Activity HasAttribute Durative
}

/// Lexical aspect of a verb class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aspect {
    /// Unfolds over time: favors the continuous
    Durative,
    /// Happens at a point: favors the simple past
    Punctual,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Concept {
    Verb(String),
    Class(VerbClass),
    Aspect(Aspect),
}

pub struct AspectGraph {
    graph: Graph<Concept, Relation, Directed>,
    index_map: HashMap<Concept, NodeIndex>,
}

impl Default for AspectGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl AspectGraph {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            index_map: HashMap::new(),
        }
    }

    /// Verb classes from the lexicon, each class tied to its aspect.
    pub fn from_lexicon(lexicon: &Lexicon) -> Self {
        let mut graph = Self::new();
        graph.add_relation(
            Concept::Class(VerbClass::Activity),
            Concept::Aspect(Aspect::Durative),
            Relation::HasAttribute,
        );
        graph.add_relation(
            Concept::Class(VerbClass::Achievement),
            Concept::Aspect(Aspect::Punctual),
            Relation::HasAttribute,
        );
        for entry in &lexicon.verb_classes {
            graph.add_relation(
                Concept::Verb(entry.verb.clone()),
                Concept::Class(entry.class),
                Relation::IsA,
            );
        }
        graph
    }

    pub fn add_concept(&mut self, concept: Concept) -> NodeIndex {
        if let Some(idx) = self.index_map.get(&concept) {
            return *idx;
        }
        let idx = self.graph.add_node(concept.clone());
        self.index_map.insert(concept, idx);
        idx
    }

    pub fn add_relation(&mut self, from: Concept, to: Concept, rel: Relation) {
        let from_idx = self.add_concept(from);
        let to_idx = self.add_concept(to);
        self.graph.add_edge(from_idx, to_idx, rel);
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Aspect of a base verb, following IsA links up to an attribute.
    ///
    /// `Ok(None)` for a verb the graph does not know; an error for a known
    /// verb whose classes carry no aspect.
    pub fn aspect_of(&self, verb: &str) -> Result<Option<Aspect>, SolverError> {
        let start_idx = match self.index_map.get(&Concept::Verb(verb.to_string())) {
            Some(idx) => *idx,
            None => return Ok(None),
        };

        let mut stack = vec![start_idx];
        let mut visited = vec![];

        while let Some(current_idx) = stack.pop() {
            if visited.contains(&current_idx) {
                continue;
            }
            visited.push(current_idx);

            for edge in self.graph.edges(current_idx) {
                match (edge.weight(), &self.graph[edge.target()]) {
                    (Relation::HasAttribute, Concept::Aspect(aspect)) => return Ok(Some(*aspect)),
                    (Relation::IsA, _) => stack.push(edge.target()),
                    _ => {}
                }
            }
        }

        Err(SolverError::MissingAspect {
            verb: verb.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_via_class() {
        let graph = AspectGraph::from_lexicon(&Lexicon::builtin());

        assert_eq!(graph.aspect_of("walk").unwrap(), Some(Aspect::Durative));
        assert_eq!(graph.aspect_of("arrive").unwrap(), Some(Aspect::Punctual));
        assert_eq!(graph.aspect_of("stay").unwrap(), None);
    }

    #[test]
    fn test_aspect_is_inherited_through_chain() {
        // sprint IsA run IsA Activity
        let mut graph = AspectGraph::from_lexicon(&Lexicon::builtin());
        graph.add_relation(
            Concept::Verb("sprint".into()),
            Concept::Verb("run".into()),
            Relation::IsA,
        );
        assert_eq!(graph.aspect_of("sprint").unwrap(), Some(Aspect::Durative));
    }

    #[test]
    fn test_class_without_aspect_is_an_error() {
        let mut graph = AspectGraph::new();
        graph.add_relation(
            Concept::Verb("blink".into()),
            Concept::Class(VerbClass::Achievement),
            Relation::IsA,
        );
        assert!(matches!(
            graph.aspect_of("blink"),
            Err(SolverError::MissingAspect { .. })
        ));
    }

    #[test]
    fn test_concepts_are_deduplicated() {
        let lexicon = Lexicon::builtin();
        let graph = AspectGraph::from_lexicon(&lexicon);
        // every verb once, two classes, two aspects
        assert_eq!(graph.node_count(), lexicon.verb_classes.len() + 4);
    }
}
