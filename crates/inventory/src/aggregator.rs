//! Stock aggregation over a location tree.
//!
//! Trees are rebuilt from the storage collaborator on every request and walked
//! with explicit worklists, so hierarchy depth is bounded by `max_depth` and
//! never by the call stack.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use stockyard_core::{DomainError, DomainResult, Entity, LocationId};

use crate::location::{LocationKind, LocationNode, LocationRow};
use crate::storage::LocationReader;

/// Default limit on levels below the root accepted while building a tree.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Read-side status of one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    pub location_id: LocationId,
    pub name: String,
    pub kind: LocationKind,
    pub total_stock: u64,
    pub capacity: u64,
    /// Rounded to two decimals.
    pub utilization_percent: f64,
    /// Stock exceeds the declared capacity (reportable, not an error).
    pub over_capacity: bool,
}

/// `stock / capacity * 100`; zero capacity is a configuration error.
pub fn utilization_percent(stock: u64, capacity: u64, subject: &str) -> DomainResult<f64> {
    if capacity == 0 {
        return Err(DomainError::configuration(format!(
            "{subject} has zero capacity; utilization is undefined"
        )));
    }
    Ok(stock as f64 / capacity as f64 * 100.0)
}

pub fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

struct PendingNode {
    row: LocationRow,
    children: Vec<usize>,
}

/// Builds location trees from a [`LocationReader`] and aggregates their stock.
#[derive(Debug)]
pub struct StockAggregator<'a, R: ?Sized> {
    reader: &'a R,
    max_depth: usize,
}

impl<'a, R> StockAggregator<'a, R>
where
    R: LocationReader + ?Sized,
{
    pub fn new(reader: &'a R) -> Self {
        Self {
            reader,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolve `root_id` and build the tree under it.
    pub fn load(&self, root_id: LocationId) -> DomainResult<LocationNode> {
        let root = self
            .reader
            .fetch_location(root_id)?
            .ok_or_else(|| DomainError::not_found(format!("location {root_id}")))?;
        self.build(root)
    }

    /// Build the tree rooted at `root`, fetching children level by level.
    ///
    /// Fails as a whole on the first storage error, on a node reached twice
    /// (shared child or cycle), or when the hierarchy exceeds `max_depth`.
    pub fn build(&self, root: LocationRow) -> DomainResult<LocationNode> {
        let mut seen = HashSet::from([root.id]);
        let mut arena = vec![PendingNode {
            row: root,
            children: Vec::new(),
        }];
        let mut worklist = vec![(0usize, 0usize)];

        while let Some((idx, depth)) = worklist.pop() {
            if arena[idx].row.kind.is_leaf() {
                continue;
            }

            let parent_id = arena[idx].row.id;
            let rows = self.reader.fetch_children(parent_id)?;
            if rows.is_empty() {
                continue;
            }
            if depth + 1 > self.max_depth {
                return Err(DomainError::configuration(format!(
                    "location hierarchy under {parent_id} exceeds the maximum depth of {}",
                    self.max_depth
                )));
            }
            debug!(location = %parent_id, children = rows.len(), depth, "loaded child locations");

            for row in rows {
                if !seen.insert(row.id) {
                    return Err(DomainError::invariant(format!(
                        "location {} is reachable through more than one parent",
                        row.id
                    )));
                }
                let child_idx = arena.len();
                arena.push(PendingNode {
                    row,
                    children: Vec::new(),
                });
                arena[idx].children.push(child_idx);
                worklist.push((child_idx, depth + 1));
            }
        }

        // Children always sit after their parent in the arena, so assembling
        // from the back finishes every subtree before its parent needs it.
        let mut built: Vec<Option<LocationNode>> = Vec::with_capacity(arena.len());
        built.resize_with(arena.len(), || None);

        for (idx, PendingNode { row, children }) in arena.into_iter().enumerate().rev() {
            let mut node = LocationNode::from_row(row);
            for child_idx in children {
                let child = built[child_idx].take().ok_or_else(|| {
                    DomainError::invariant("location subtree assembled twice")
                })?;
                node.push_child(child)?;
            }
            built[idx] = Some(node);
        }

        built
            .first_mut()
            .and_then(Option::take)
            .ok_or_else(|| DomainError::invariant("location tree has no root"))
    }

    /// Sum of bin stock under `node`, visiting bins in child-list order.
    ///
    /// A sum that does not fit in `u64` is an invariant violation.
    pub fn total_stock(&self, node: &LocationNode) -> DomainResult<u64> {
        let mut total: u64 = 0;
        for bin in node.bins() {
            let stock = self.reader.fetch_bin_stock(&bin.name)?;
            total = total.checked_add(stock).ok_or_else(|| {
                DomainError::invariant(format!(
                    "stock under location '{}' overflows at bin '{}'",
                    node.name(),
                    bin.name
                ))
            })?;
        }
        Ok(total)
    }

    /// The node's own declared capacity; children never contribute.
    pub fn capacity(&self, node: &LocationNode) -> u64 {
        node.capacity()
    }

    pub fn utilization(&self, node: &LocationNode) -> DomainResult<f64> {
        let stock = self.total_stock(node)?;
        utilization_percent(stock, node.capacity(), &format!("location '{}'", node.name()))
    }

    /// Build, aggregate and summarize the location `root_id`.
    pub fn summary(&self, root_id: LocationId) -> DomainResult<LocationSummary> {
        let tree = self.load(root_id)?;
        let total_stock = self.total_stock(&tree)?;
        let capacity = tree.capacity();
        let utilization =
            utilization_percent(total_stock, capacity, &format!("location '{}'", tree.name()))?;

        debug!(
            location = %root_id,
            nodes = tree.node_count(),
            total_stock,
            capacity,
            "aggregated location stock"
        );

        Ok(LocationSummary {
            location_id: *tree.id(),
            name: tree.name().to_string(),
            kind: tree.kind(),
            total_stock,
            capacity,
            utilization_percent: round_percent(utilization),
            over_capacity: total_stock > capacity,
        })
    }
}
