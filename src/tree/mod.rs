//! Dependency tree assembly.
//!
//! Resolvers report flat adjacency lists that may be cyclic (A → B → A) or
//! re-entrant (diamonds). [`assemble`] turns them into a finite forest:
//! traversal is breadth-first from the roots, every id is expanded at most
//! once, and later occurrences become childless nodes flagged
//! `deduplicated`. Because the traversal is breadth-first, the expanded
//! occurrence of a library is always its shallowest one.
//!
//! [`propagate_vulnerability`] then marks every node that is matched itself
//! or has a matched descendant, which is what path rendering needs.
//!
//! Resolved chains can be arbitrarily deep, so every walk here keeps its
//! own stack instead of recursing.

mod render;

use std::collections::{HashSet, VecDeque};

use serde::Serialize;

use crate::model::LibraryId;

pub use render::{write_tree, write_vulnerable_paths};

/// Read access to a dependency graph.
pub trait DependencyGraph {
    /// Direct dependencies, in order.
    fn roots(&self) -> &[LibraryId];

    /// Whether `id` is a known library. Unknown ids are dropped from the tree.
    fn contains(&self, id: &LibraryId) -> bool;

    /// Direct children of `id`, in order.
    fn children_of(&self, id: &LibraryId) -> &[LibraryId];
}

/// One occurrence of a library in the forest. Owns its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyNode {
    pub id: LibraryId,
    /// The id was already expanded elsewhere; this node has no children
    pub deduplicated: bool,
    pub vulnerable: bool,
    pub children: Vec<DependencyNode>,
}

impl DependencyNode {
    #[must_use]
    pub fn has_vulnerable_children(&self) -> bool {
        self.children.iter().any(|child| child.vulnerable)
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(&node.children);
        }
        count
    }
}

impl Drop for DependencyNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Arena slot used while the forest is built.
struct Slot<'g> {
    id: &'g LibraryId,
    deduplicated: bool,
    children: Vec<usize>,
}

/// Build the deduplicated forest of `graph`.
pub fn assemble<G: DependencyGraph + ?Sized>(graph: &G) -> Vec<DependencyNode> {
    let mut slots: Vec<Slot<'_>> = Vec::new();
    let mut roots: Vec<usize> = Vec::new();
    let mut expanded: HashSet<&LibraryId> = HashSet::new();
    let mut queue: VecDeque<(&LibraryId, Option<usize>)> =
        graph.roots().iter().map(|id| (id, None)).collect();

    while let Some((id, parent)) = queue.pop_front() {
        if !graph.contains(id) {
            tracing::debug!(id = %id, "dropping dependency without library entry");
            continue;
        }

        let deduplicated = !expanded.insert(id);
        let index = slots.len();
        slots.push(Slot {
            id,
            deduplicated,
            children: Vec::new(),
        });
        match parent {
            Some(p) => slots[p].children.push(index),
            None => roots.push(index),
        }

        if !deduplicated {
            queue.extend(graph.children_of(id).iter().map(|child| (child, Some(index))));
        }
    }

    // children always sit at higher indices than their parent, so building
    // back to front finds every child already finished
    let mut built: Vec<Option<DependencyNode>> = Vec::with_capacity(slots.len());
    built.resize_with(slots.len(), || None);
    for (index, slot) in slots.iter().enumerate().rev() {
        let children = slot
            .children
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[index] = Some(DependencyNode {
            id: slot.id.clone(),
            deduplicated: slot.deduplicated,
            vulnerable: false,
            children,
        });
    }

    roots
        .into_iter()
        .filter_map(|index| built[index].take())
        .collect()
}

/// Set `vulnerable` on every node that is matched or has a vulnerable
/// descendant. Returns whether any root ended up vulnerable.
pub fn propagate_vulnerability<F>(forest: &mut [DependencyNode], is_matched: F) -> bool
where
    F: Fn(&LibraryId) -> bool,
{
    // pre-order with parent links; every child sits after its parent
    let mut parents: Vec<Option<usize>> = Vec::new();
    let mut flags: Vec<bool> = Vec::new();
    let mut stack: Vec<(&DependencyNode, Option<usize>)> =
        forest.iter().rev().map(|root| (root, None)).collect();
    while let Some((node, parent)) = stack.pop() {
        let index = parents.len();
        parents.push(parent);
        flags.push(is_matched(&node.id));
        stack.extend(node.children.iter().rev().map(|child| (child, Some(index))));
    }

    for index in (0..flags.len()).rev() {
        if flags[index]
            && let Some(parent) = parents[index]
        {
            flags[parent] = true;
        }
    }

    // same visiting order as above
    let mut any = false;
    let mut flags = flags.into_iter();
    let mut stack: Vec<(&mut DependencyNode, bool)> =
        forest.iter_mut().rev().map(|root| (root, true)).collect();
    while let Some((node, is_root)) = stack.pop() {
        node.vulnerable = flags.next().unwrap_or_default();
        any |= is_root && node.vulnerable;
        stack.extend(node.children.iter_mut().rev().map(|child| (child, false)));
    }
    any
}

/// Fold every tree bottom-up. `finish` receives each node together with the
/// folded values of its children, in order.
pub fn fold_forest<U, F>(forest: &[DependencyNode], mut finish: F) -> Vec<U>
where
    F: FnMut(&DependencyNode, Vec<U>) -> U,
{
    struct Frame<'a, U> {
        node: &'a DependencyNode,
        next: usize,
        done: Vec<U>,
    }

    let mut folded = Vec::with_capacity(forest.len());
    for root in forest {
        let mut stack = vec![Frame {
            node: root,
            next: 0,
            done: Vec::with_capacity(root.children.len()),
        }];
        while let Some(frame) = stack.last_mut() {
            let node = frame.node;
            if let Some(child) = node.children.get(frame.next) {
                frame.next += 1;
                stack.push(Frame {
                    node: child,
                    next: 0,
                    done: Vec::with_capacity(child.children.len()),
                });
                continue;
            }

            let done = std::mem::take(&mut frame.done);
            stack.pop();
            let value = finish(node, done);
            match stack.last_mut() {
                Some(parent) => parent.done.push(value),
                None => folded.push(value),
            }
        }
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Graph {
        roots: Vec<LibraryId>,
        known: HashSet<LibraryId>,
        edges: HashMap<LibraryId, Vec<LibraryId>>,
    }

    impl Graph {
        fn new(roots: &[&str], known: &[&str], edges: &[(&str, &str)]) -> Self {
            let mut graph = Self {
                roots: roots.iter().map(|&r| r.into()).collect(),
                known: known.iter().map(|&k| k.into()).collect(),
                ..Self::default()
            };
            for &(from, to) in edges {
                graph.edges.entry(from.into()).or_default().push(to.into());
            }
            graph
        }
    }

    impl DependencyGraph for Graph {
        fn roots(&self) -> &[LibraryId] {
            &self.roots
        }

        fn contains(&self, id: &LibraryId) -> bool {
            self.known.contains(id)
        }

        fn children_of(&self, id: &LibraryId) -> &[LibraryId] {
            self.edges.get(id).map(Vec::as_slice).unwrap_or_default()
        }
    }

    #[test]
    fn test_cycle_terminates() {
        let graph = Graph::new(&["a"], &["a", "b"], &[("a", "b"), ("b", "a")]);
        let forest = assemble(&graph);

        assert_eq!(forest.len(), 1);
        let a = &forest[0];
        assert!(!a.deduplicated);
        let b = &a.children[0];
        assert_eq!(b.id.as_str(), "b");
        let again = &b.children[0];
        assert_eq!(again.id.as_str(), "a");
        assert!(again.deduplicated);
        assert!(again.children.is_empty());
    }

    #[test]
    fn test_self_loop() {
        let graph = Graph::new(&["a"], &["a"], &[("a", "a")]);
        let forest = assemble(&graph);
        assert_eq!(forest[0].size(), 2);
        assert!(forest[0].children[0].deduplicated);
    }

    #[test]
    fn test_diamond_expands_once() {
        let graph = Graph::new(
            &["a"],
            &["a", "b", "c", "d", "e"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("d", "e")],
        );
        let forest = assemble(&graph);
        let a = &forest[0];
        let d_under_b = &a.children[0].children[0];
        let d_under_c = &a.children[1].children[0];

        assert!(!d_under_b.deduplicated);
        assert_eq!(d_under_b.children.len(), 1);
        assert!(d_under_c.deduplicated);
        assert!(d_under_c.children.is_empty());
        assert_eq!(a.size(), 6);
    }

    #[test]
    fn test_shallowest_occurrence_is_expanded() {
        // x is reachable at depth 2 via a and directly as a root
        let graph = Graph::new(&["a", "x"], &["a", "b", "x", "y"], &[("a", "b"), ("b", "x"), ("x", "y")]);
        let forest = assemble(&graph);

        assert!(!forest[1].deduplicated);
        assert_eq!(forest[1].children.len(), 1);
        let deep_x = &forest[0].children[0].children[0];
        assert!(deep_x.deduplicated);
    }

    #[test]
    fn test_dangling_ids_dropped() {
        let graph = Graph::new(&["a", "ghost"], &["a", "b"], &[("a", "ghost"), ("a", "b")]);
        let forest = assemble(&graph);
        assert_eq!(forest.len(), 1);
        let children: Vec<_> = forest[0].children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(children, ["b"]);
    }

    #[test]
    fn test_repeated_root_deduplicated() {
        let graph = Graph::new(&["a", "a"], &["a"], &[]);
        let forest = assemble(&graph);
        assert_eq!(forest.len(), 2);
        assert!(!forest[0].deduplicated);
        assert!(forest[1].deduplicated);
    }

    #[test]
    fn test_taint_reaches_ancestors() {
        let graph = Graph::new(
            &["a", "z"],
            &["a", "b", "c", "d", "z"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        let mut forest = assemble(&graph);
        let any = propagate_vulnerability(&mut forest, |id| id.as_str() == "d");

        assert!(any);
        let a = &forest[0];
        assert!(a.vulnerable);
        assert!(a.children[0].vulnerable);
        // the deduplicated d under c is matched on its own id
        assert!(a.children[1].vulnerable);
        assert!(a.children[1].children[0].vulnerable);
        assert!(!forest[1].vulnerable);
    }

    fn chain(depth: usize) -> Graph {
        let names: Vec<String> = (0..depth).map(|i| i.to_string()).collect();
        let mut graph = Graph::new(&["0"], &[], &[]);
        graph.known = names.iter().map(|n| n.as_str().into()).collect();
        for pair in names.windows(2) {
            graph
                .edges
                .entry(pair[0].as_str().into())
                .or_default()
                .push(pair[1].as_str().into());
        }
        graph
    }

    #[test]
    fn test_deep_chain() {
        const DEPTH: usize = 100_000;
        let leaf = LibraryId::new((DEPTH - 1).to_string());

        let mut forest = assemble(&chain(DEPTH));
        assert_eq!(forest[0].size(), DEPTH);
        assert!(propagate_vulnerability(&mut forest, |id| *id == leaf));
        assert!(forest[0].vulnerable);

        let depths = fold_forest(&forest, |_, children: Vec<usize>| {
            1 + children.into_iter().max().unwrap_or_default()
        });
        assert_eq!(depths, [DEPTH]);
    }

    #[test]
    fn test_fold_keeps_child_order() {
        let graph = Graph::new(&["a", "d"], &["a", "b", "c", "d"], &[("a", "b"), ("a", "c")]);
        let forest = assemble(&graph);
        let rendered = fold_forest(&forest, |node, children: Vec<String>| {
            if children.is_empty() {
                node.id.to_string()
            } else {
                format!("{}({})", node.id, children.join(","))
            }
        });
        assert_eq!(rendered, ["a(b,c)", "d"]);
    }

    #[test]
    fn test_no_matches_leaves_forest_clean() {
        let graph = Graph::new(&["a"], &["a", "b"], &[("a", "b")]);
        let mut forest = assemble(&graph);
        assert!(!propagate_vulnerability(&mut forest, |_| false));
        assert!(!forest[0].vulnerable && !forest[0].has_vulnerable_children());
    }
}
