//! Location tree: warehouse → zone → rack → bin.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockyard_core::{DomainError, DomainResult, Entity, LocationId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Warehouse,
    Zone,
    Rack,
    Bin,
}

impl LocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationKind::Warehouse => "warehouse",
            LocationKind::Zone => "zone",
            LocationKind::Rack => "rack",
            LocationKind::Bin => "bin",
        }
    }

    /// Bins terminate the tree; every other kind may hold children.
    pub fn is_leaf(&self) -> bool {
        matches!(self, LocationKind::Bin)
    }
}

impl core::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warehouse" => Ok(LocationKind::Warehouse),
            "zone" => Ok(LocationKind::Zone),
            "rack" => Ok(LocationKind::Rack),
            "bin" => Ok(LocationKind::Bin),
            other => Err(DomainError::validation(format!(
                "location kind must be one of: warehouse, zone, rack, bin (got '{other}')"
            ))),
        }
    }
}

/// Location row as supplied by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRow {
    pub id: LocationId,
    pub name: String,
    pub kind: LocationKind,
    /// Declared capacity of this container; never derived from children.
    pub capacity: u64,
}

impl LocationRow {
    pub fn new(name: impl Into<String>, kind: LocationKind, capacity: u64) -> Self {
        Self {
            id: LocationId::new(),
            name: name.into(),
            kind,
            capacity,
        }
    }
}

/// A node of a location tree built for one request.
///
/// Parents own their children exclusively. Dropping a node tears its subtree
/// down with a worklist, so releasing a deep hierarchy costs no stack.
#[derive(Debug)]
pub enum LocationNode {
    Composite {
        location: LocationRow,
        children: Vec<LocationNode>,
    },
    Leaf {
        location: LocationRow,
    },
}

impl LocationNode {
    /// Wrap a row as a childless node of the variant its kind calls for.
    pub fn from_row(location: LocationRow) -> Self {
        if location.kind.is_leaf() {
            LocationNode::Leaf { location }
        } else {
            LocationNode::Composite {
                location,
                children: Vec::new(),
            }
        }
    }

    pub fn location(&self) -> &LocationRow {
        match self {
            LocationNode::Composite { location, .. } | LocationNode::Leaf { location } => location,
        }
    }

    pub fn name(&self) -> &str {
        &self.location().name
    }

    pub fn kind(&self) -> LocationKind {
        self.location().kind
    }

    /// Declared capacity of this node alone.
    pub fn capacity(&self) -> u64 {
        self.location().capacity
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, LocationNode::Leaf { .. })
    }

    pub fn children(&self) -> &[LocationNode] {
        match self {
            LocationNode::Composite { children, .. } => children.as_slice(),
            LocationNode::Leaf { .. } => &[],
        }
    }

    pub fn push_child(&mut self, child: LocationNode) -> DomainResult<()> {
        match self {
            LocationNode::Composite { children, .. } => {
                children.push(child);
                Ok(())
            }
            LocationNode::Leaf { location } => Err(DomainError::invariant(format!(
                "bin '{}' cannot hold child locations",
                location.name
            ))),
        }
    }

    /// Bins under this node (itself included), in child-list order.
    pub fn bins(&self) -> Vec<&LocationRow> {
        let mut bins = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                LocationNode::Leaf { location } => bins.push(location),
                LocationNode::Composite { children, .. } => stack.extend(children.iter().rev()),
            }
        }
        bins
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }

    /// Levels below this node (0 for a node without children).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children().iter().map(|c| (c, depth + 1)));
        }
        deepest
    }
}

impl Drop for LocationNode {
    fn drop(&mut self) {
        let mut pending = match self {
            LocationNode::Composite { children, .. } => std::mem::take(children),
            LocationNode::Leaf { .. } => return,
        };
        while let Some(mut node) = pending.pop() {
            if let LocationNode::Composite { children, .. } = &mut node {
                pending.append(children);
            }
        }
    }
}

impl Entity for LocationNode {
    type Id = LocationId;

    fn id(&self) -> &Self::Id {
        &self.location().id
    }
}
