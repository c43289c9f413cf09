//! Hierarchy read models.
//!
//! # Invariants
//! - `HierarchyEntry` sequences are ordered by `level ASC, id ASC`.
//! - Level 1 is the traversal root.

use crate::model::employee::EmployeeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One employee inside a resolved subordinate tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyEntry {
    pub id: EmployeeId,
    pub full_name: String,
    pub position: String,
    pub manager_id: Option<EmployeeId>,
    /// 1 for the root, parent level + 1 below it.
    pub level: u32,
}

/// Nested tree node built from ordered hierarchy entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub entry: HierarchyEntry,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Total number of nodes in this subtree, root included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(HierarchyNode::node_count)
            .sum::<usize>()
    }

    /// Depth of the deepest node, counting this node as 1.
    pub fn depth(&self) -> u32 {
        1 + self
            .children
            .iter()
            .map(HierarchyNode::depth)
            .max()
            .unwrap_or(0)
    }
}

/// Folds ordered `(level, id)` entries into a nested tree.
///
/// Returns `None` for an empty sequence. Entries whose manager is not an
/// earlier entry are dropped; children keep the input (`id ASC`) order.
pub fn nest(entries: &[HierarchyEntry]) -> Option<HierarchyNode> {
    let (root, rest) = entries.split_first()?;

    let mut children_of: HashMap<EmployeeId, Vec<&HierarchyEntry>> = HashMap::new();
    for entry in rest {
        if let Some(manager_id) = entry.manager_id {
            children_of.entry(manager_id).or_default().push(entry);
        }
    }

    Some(build_node(root, &children_of))
}

fn build_node(
    entry: &HierarchyEntry,
    children_of: &HashMap<EmployeeId, Vec<&HierarchyEntry>>,
) -> HierarchyNode {
    let children = children_of
        .get(&entry.id)
        .map(|children| {
            children
                .iter()
                .filter(|child| child.level == entry.level + 1)
                .map(|child| build_node(child, children_of))
                .collect()
        })
        .unwrap_or_default();
    HierarchyNode {
        entry: entry.clone(),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::{nest, HierarchyEntry};

    fn entry(id: i64, manager_id: Option<i64>, level: u32) -> HierarchyEntry {
        HierarchyEntry {
            id,
            full_name: format!("Employee {id}"),
            position: "Staff".to_string(),
            manager_id,
            level,
        }
    }

    #[test]
    fn nest_builds_multi_level_tree() {
        let entries = vec![
            entry(1, None, 1),
            entry(2, Some(1), 2),
            entry(4, Some(1), 2),
            entry(3, Some(2), 3),
        ];
        let tree = nest(&entries).expect("non-empty entries produce a tree");
        assert_eq!(tree.entry.id, 1);
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.depth(), 3);
        let child_ids: Vec<_> = tree.children.iter().map(|c| c.entry.id).collect();
        assert_eq!(child_ids, vec![2, 4]);
        assert_eq!(tree.children[0].children[0].entry.id, 3);
    }

    #[test]
    fn nest_of_empty_sequence_is_none() {
        assert!(nest(&[]).is_none());
    }
}
