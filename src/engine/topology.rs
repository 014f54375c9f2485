// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Topology validation for wired pipelines.
//!
//! Workers are connected through buffers rather than named dependencies, so
//! the graph is derived from buffer ids: worker `a` feeds worker `b` when `b`
//! reads a buffer that `a` writes. The validation pipeline mirrors the order
//! the checks depend on:
//!
//! 1. **Uniqueness Validation**: every worker index appears once
//! 2. **Reference Validation**: every live writer of a buffer a worker reads
//!    belongs to a worker in the pipeline
//! 3. **Cycle Detection**: DFS with a recursion stack over the derived graph
//!
//! Cycle detection only runs once the first two checks pass, since it needs a
//! well-formed graph. Errors from the first two are accumulated so the caller
//! sees all of them at once.
//!
//! # Example
//!
//! ```rust
//! use the_pipeworks::buffer::Buffer;
//! use the_pipeworks::engine::topology::{validate_topology, WorkerNode};
//!
//! let feed: Buffer<i32> = Buffer::new();
//! let nodes = vec![
//!     WorkerNode::new(0, None, vec![feed.id()]),
//!     WorkerNode::new(1, Some(feed.id()), vec![]),
//! ];
//!
//! assert!(validate_topology(&nodes).is_ok());
//! ```

use std::collections::{HashMap, HashSet};

use crate::buffer::BufferId;
use crate::errors::ValidationError;
use crate::observability::messages::validation::{
    CyclicDependencyDetected, DuplicateWorkerIndex, UnresolvedProducer, ValidationFailed,
};
use crate::observability::messages::StructuredLog;

/// The buffers one worker touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerNode {
    pub index: usize,
    pub reads: Option<BufferId>,
    pub writes: Vec<BufferId>,
    /// Live writers on `reads` when the node was taken, wherever they are held.
    pub upstream_writers: usize,
}

impl WorkerNode {
    pub fn new(index: usize, reads: Option<BufferId>, writes: Vec<BufferId>) -> Self {
        Self {
            index,
            reads,
            writes,
            upstream_writers: 0,
        }
    }

    pub fn with_upstream_writers(mut self, upstream_writers: usize) -> Self {
        self.upstream_writers = upstream_writers;
        self
    }
}

/// Worker index → indices of the workers that read what it writes.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph(pub HashMap<usize, Vec<usize>>);

impl DependencyGraph {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Derive the graph from the buffers each worker reads and writes.
    pub fn from_nodes(nodes: &[WorkerNode]) -> Self {
        let mut readers: HashMap<BufferId, Vec<usize>> = HashMap::new();
        for node in nodes {
            if let Some(buffer) = node.reads {
                readers.entry(buffer).or_default().push(node.index);
            }
        }

        let mut graph = Self::new();
        for node in nodes {
            let mut dependents: Vec<usize> = node
                .writes
                .iter()
                .filter_map(|buffer| readers.get(buffer))
                .flatten()
                .copied()
                .collect();
            dependents.sort_unstable();
            dependents.dedup();
            graph.add_dependency(node.index, dependents);
        }
        graph
    }

    pub fn add_dependency(&mut self, worker_index: usize, dependents: Vec<usize>) {
        self.0.insert(worker_index, dependents);
    }

    pub fn get_dependents(&self, worker_index: usize) -> Option<&Vec<usize>> {
        self.0.get(&worker_index)
    }

    /// Worker indices in ascending order.
    pub fn sorted_keys(&self) -> Vec<usize> {
        let mut keys: Vec<usize> = self.0.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

/// Workers with no input buffer: where data enters the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPoints(pub Vec<usize>);

impl EntryPoints {
    pub fn from_nodes(nodes: &[WorkerNode]) -> Self {
        Self(
            nodes
                .iter()
                .filter(|node| node.reads.is_none())
                .map(|node| node.index)
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &usize> {
        self.0.iter()
    }

    pub fn contains(&self, worker_index: usize) -> bool {
        self.0.contains(&worker_index)
    }
}

/// Validate a wired topology before any thread starts.
///
/// Returns every uniqueness and reference error found, or the first cycle
/// when the graph is otherwise well formed. Each error is also logged.
pub fn validate_topology(nodes: &[WorkerNode]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(duplicates) = validate_unique_indices(nodes) {
        errors.extend(duplicates);
    }

    if let Err(unresolved) = validate_producers_present(nodes) {
        errors.extend(unresolved);
    }

    if errors.is_empty() {
        if let Err(cycles) = validate_acyclic(nodes) {
            errors.extend(cycles);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        ValidationFailed {
            worker_count: nodes.len(),
            error_count: errors.len(),
        }
        .log();
        Err(errors)
    }
}

fn validate_unique_indices(nodes: &[WorkerNode]) -> Result<(), Vec<ValidationError>> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for node in nodes {
        if !seen.insert(node.index) {
            DuplicateWorkerIndex {
                worker_index: node.index,
            }
            .log();
            errors.push(ValidationError::DuplicateWorkerIndex {
                worker_index: node.index,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A buffer only closes once all of its writers are gone. A reader whose
/// buffer has no writer in the pipeline, or a writer held outside it, would
/// block forever.
fn validate_producers_present(nodes: &[WorkerNode]) -> Result<(), Vec<ValidationError>> {
    let mut writers: HashMap<BufferId, usize> = HashMap::new();
    for buffer in nodes.iter().flat_map(|node| node.writes.iter()) {
        *writers.entry(*buffer).or_default() += 1;
    }
    let mut errors = Vec::new();

    for node in nodes {
        if let Some(buffer) = node.reads {
            let in_pipeline = writers.get(&buffer).copied().unwrap_or(0);
            if in_pipeline == 0 || in_pipeline < node.upstream_writers {
                UnresolvedProducer {
                    worker_index: node.index,
                    buffer_id: buffer.get(),
                }
                .log();
                errors.push(ValidationError::UnresolvedProducer {
                    worker_index: node.index,
                    buffer_id: buffer.get(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_acyclic(nodes: &[WorkerNode]) -> Result<(), Vec<ValidationError>> {
    let graph = DependencyGraph::from_nodes(nodes);

    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    for worker_index in graph.sorted_keys() {
        if !visited.contains(&worker_index) {
            if let Some(cycle) =
                dfs_cycle_detection(worker_index, &graph, &mut visited, &mut rec_stack, &mut path)
            {
                CyclicDependencyDetected { cycle: &cycle }.log();
                return Err(vec![ValidationError::CyclicDependency { cycle }]);
            }
        }
    }

    Ok(())
}

/// DFS with an explicit recursion stack; returns the closed cycle path on a
/// back edge, e.g. `[1, 2, 3, 1]`.
fn dfs_cycle_detection(
    node: usize,
    graph: &DependencyGraph,
    visited: &mut HashSet<usize>,
    rec_stack: &mut HashSet<usize>,
    path: &mut Vec<usize>,
) -> Option<Vec<usize>> {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    if let Some(neighbors) = graph.get_dependents(node) {
        for &neighbor in neighbors {
            if !visited.contains(&neighbor) {
                if let Some(cycle) =
                    dfs_cycle_detection(neighbor, graph, visited, rec_stack, path)
                {
                    return Some(cycle);
                }
            } else if rec_stack.contains(&neighbor) {
                let cycle_start = path.iter().position(|&x| x == neighbor).unwrap_or(0);
                let mut cycle = path[cycle_start..].to_vec();
                cycle.push(neighbor);
                return Some(cycle);
            }
        }
    }

    rec_stack.remove(&node);
    path.pop();
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    fn buffer_id() -> BufferId {
        Buffer::<i32>::new().id()
    }

    fn create_test_node(
        index: usize,
        reads: Option<BufferId>,
        writes: Vec<BufferId>,
    ) -> WorkerNode {
        WorkerNode::new(index, reads, writes)
    }

    #[test]
    fn test_valid_empty_topology() {
        assert!(validate_topology(&[]).is_ok());
    }

    #[test]
    fn test_valid_linear_chain() {
        let (ab, bc) = (buffer_id(), buffer_id());
        let nodes = vec![
            create_test_node(0, None, vec![ab]),
            create_test_node(1, Some(ab), vec![bc]),
            create_test_node(2, Some(bc), vec![]),
        ];

        assert!(validate_topology(&nodes).is_ok());
    }

    #[test]
    fn test_valid_diamond() {
        let fan_out = buffer_id();
        let fan_in = buffer_id();
        let nodes = vec![
            create_test_node(0, None, vec![fan_out]),
            create_test_node(1, Some(fan_out), vec![fan_in]),
            create_test_node(2, Some(fan_out), vec![fan_in]),
            create_test_node(3, Some(fan_in), vec![]),
        ];

        assert!(validate_topology(&nodes).is_ok());

        let graph = DependencyGraph::from_nodes(&nodes);
        assert_eq!(graph.get_dependents(0), Some(&vec![1, 2]));
        assert_eq!(graph.get_dependents(1), Some(&vec![3]));
        assert_eq!(graph.get_dependents(3), Some(&vec![]));
        assert_eq!(EntryPoints::from_nodes(&nodes), EntryPoints(vec![0]));
    }

    #[test]
    fn test_duplicate_worker_index() {
        let nodes = vec![create_test_node(0, None, vec![]), create_test_node(0, None, vec![])];

        let errors = validate_topology(&nodes).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ValidationError::DuplicateWorkerIndex { worker_index: 0 }
        ));
    }

    #[test]
    fn test_reader_without_writer() {
        let orphan = buffer_id();
        let nodes = vec![
            create_test_node(0, None, vec![]),
            create_test_node(1, Some(orphan), vec![]),
        ];

        let errors = validate_topology(&nodes).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ValidationError::UnresolvedProducer { worker_index: 1, .. }
        ));
    }

    #[test]
    fn test_writer_held_outside_pipeline() {
        let fan_in = buffer_id();
        let nodes = vec![
            create_test_node(0, None, vec![fan_in]),
            create_test_node(2, Some(fan_in), vec![]).with_upstream_writers(2),
        ];

        let errors = validate_topology(&nodes).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ValidationError::UnresolvedProducer { worker_index: 2, .. }
        ));
    }

    #[test]
    fn test_all_writers_in_pipeline() {
        let fan_in = buffer_id();
        let nodes = vec![
            create_test_node(0, None, vec![fan_in]),
            create_test_node(1, None, vec![fan_in]),
            create_test_node(2, Some(fan_in), vec![]).with_upstream_writers(2),
        ];

        assert!(validate_topology(&nodes).is_ok());
    }

    #[test]
    fn test_simple_cycle() {
        let (ab, ba) = (buffer_id(), buffer_id());
        let nodes = vec![
            create_test_node(0, Some(ba), vec![ab]),
            create_test_node(1, Some(ab), vec![ba]),
        ];

        let errors = validate_topology(&nodes).unwrap_err();
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ValidationError::CyclicDependency { cycle } => assert_eq!(cycle, &vec![0, 1, 0]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_complex_cycle_reports_only_the_loop() {
        let (ab, bc, cd) = (buffer_id(), buffer_id(), buffer_id());
        let nodes = vec![
            create_test_node(0, None, vec![ab]),
            create_test_node(1, Some(ab), vec![bc]),
            create_test_node(2, Some(bc), vec![cd]),
            create_test_node(3, Some(cd), vec![ab]),
        ];

        let errors = validate_topology(&nodes).unwrap_err();
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ValidationError::CyclicDependency { cycle } => assert_eq!(cycle, &vec![1, 2, 3, 1]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cycle_detection_skipped_when_references_fail() {
        let (ab, ba, orphan) = (buffer_id(), buffer_id(), buffer_id());
        let nodes = vec![
            create_test_node(0, Some(ba), vec![ab]),
            create_test_node(1, Some(ab), vec![ba]),
            create_test_node(2, Some(orphan), vec![]),
        ];

        let errors = validate_topology(&nodes).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::UnresolvedProducer { .. }));
    }

    #[test]
    fn test_multiple_errors_accumulate() {
        let orphan = buffer_id();
        let nodes = vec![
            create_test_node(0, None, vec![]),
            create_test_node(0, None, vec![]),
            create_test_node(1, Some(orphan), vec![]),
        ];

        let errors = validate_topology(&nodes).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
