//! Formula dependency graph
//!
//! Records "formula at X depends on Y" edges as formulas are attached and
//! detects reference cycles before they can reach a writer. The graph lives
//! for one builder session and is dropped at finalize.

use ahash::{AHashMap, AHashSet};
use std::fmt;
use tally_sheets_core::{CellRef, RangeRef};

/// A dependency recorded while building a formula
///
/// `sheet: None` means "the sheet the formula ends up on"; the session
/// resolves it against the current sheet when the formula is attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dependency {
    /// Dependency on a single cell
    Cell {
        sheet: Option<String>,
        cell: CellRef,
    },
    /// Dependency on a range
    Range {
        sheet: Option<String>,
        range: RangeRef,
    },
    /// Dependency on a named range, with the binding captured at build time
    Name {
        name: String,
        sheet: String,
        range: RangeRef,
    },
}

impl Dependency {
    /// Resolve to a concrete graph node, qualifying bare references with
    /// the sheet the formula is being attached to
    pub fn resolve(&self, default_sheet: &str) -> RefNode {
        match self {
            Dependency::Cell { sheet, cell } => RefNode::Cell {
                sheet: sheet.clone().unwrap_or_else(|| default_sheet.to_string()),
                cell: *cell,
            },
            Dependency::Range { sheet, range } => RefNode::Range {
                sheet: sheet.clone().unwrap_or_else(|| default_sheet.to_string()),
                range: *range,
            },
            Dependency::Name { name, sheet, range } => RefNode::Name {
                name: name.clone(),
                sheet: sheet.clone(),
                range: *range,
            },
        }
    }
}

/// A node in the dependency graph: a concrete, sheet-qualified reference
///
/// A named-range node carries its captured range, so a name redefined
/// mid-session yields a distinct node and formulas built earlier keep
/// their original dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RefNode {
    /// A single cell
    Cell { sheet: String, cell: CellRef },
    /// A rectangular range
    Range { sheet: String, range: RangeRef },
    /// A named range with its captured binding
    Name {
        name: String,
        sheet: String,
        range: RangeRef,
    },
}

impl RefNode {
    /// The range this node spans, if it is range-like
    fn span(&self) -> Option<(&str, RangeRef)> {
        match self {
            RefNode::Cell { .. } => None,
            RefNode::Range { sheet, range } => Some((sheet, *range)),
            RefNode::Name { sheet, range, .. } => Some((sheet, *range)),
        }
    }
}

impl fmt::Display for RefNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefNode::Cell { sheet, cell } => write!(f, "{}!{}", sheet, cell),
            RefNode::Range { sheet, range } => write!(f, "{}!{}", sheet, range),
            RefNode::Name { name, sheet, range } => {
                write!(f, "{} ({}!{})", name, sheet, range)
            }
        }
    }
}

/// Directed dependency graph with on-demand cycle detection
///
/// Edges run formula → referenced. Cycle detection is a three-color DFS,
/// linear in nodes + edges. A range-like node's successors include every
/// formula-bearing cell it geometrically contains, so a formula depending
/// on `A1:A10` depends on each formula cell inside that range without any
/// explicit edge being stored.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Formula node → references it depends on
    edges: AHashMap<RefNode, AHashSet<RefNode>>,
}

#[derive(Clone, Copy, PartialEq)]
enum Color {
    Gray,
    Black,
}

impl DependencyGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the formula at `from` depends on `to`
    ///
    /// Idempotent; returns whether the edge was new.
    pub fn add_edge(&mut self, from: RefNode, to: RefNode) -> bool {
        self.edges.entry(from).or_default().insert(to)
    }

    /// Remove a single edge, dropping the node entry once it has no edges
    pub fn remove_edge(&mut self, from: &RefNode, to: &RefNode) -> bool {
        let Some(targets) = self.edges.get_mut(from) else {
            return false;
        };
        let removed = targets.remove(to);
        if targets.is_empty() {
            self.edges.remove(from);
        }
        removed
    }

    /// Add a batch of edges from one formula node, returning the edges that
    /// were actually new (for rollback)
    pub fn add_edges<I>(&mut self, from: &RefNode, tos: I) -> Vec<(RefNode, RefNode)>
    where
        I: IntoIterator<Item = RefNode>,
    {
        let mut added = Vec::new();
        for to in tos {
            if self.add_edge(from.clone(), to.clone()) {
                added.push((from.clone(), to));
            }
        }
        added
    }

    /// Remove a batch of previously added edges (rollback of a failed attach)
    pub fn remove_edges(&mut self, edges: &[(RefNode, RefNode)]) {
        for (from, to) in edges {
            self.remove_edge(from, to);
        }
    }

    /// Remove and return all outgoing edges of a formula node
    ///
    /// Used when a cell that already held a formula is overwritten: the
    /// old formula's dependencies leave the graph with it.
    pub fn remove_outgoing(&mut self, from: &RefNode) -> Vec<RefNode> {
        self.edges
            .remove(from)
            .map(|targets| targets.into_iter().collect())
            .unwrap_or_default()
    }

    /// Whether an explicit edge exists
    pub fn contains_edge(&self, from: &RefNode, to: &RefNode) -> bool {
        self.edges.get(from).is_some_and(|targets| targets.contains(to))
    }

    /// Number of explicit edges
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|targets| targets.len()).sum()
    }

    /// Whether the graph has no edges
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Successors of a node: explicit edges, plus — for range-like nodes —
    /// every formula-bearing cell the range contains on its sheet
    pub fn successors(&self, node: &RefNode) -> Vec<RefNode> {
        let mut result: Vec<RefNode> = self
            .edges
            .get(node)
            .map(|targets| targets.iter().cloned().collect())
            .unwrap_or_default();

        if let Some((span_sheet, span)) = node.span() {
            for formula_node in self.edges.keys() {
                if let RefNode::Cell { sheet, cell } = formula_node {
                    if sheet == span_sheet && span.contains(cell) {
                        result.push(formula_node.clone());
                    }
                }
            }
        }

        result
    }

    /// Whether the current edge set contains any directed cycle
    pub fn has_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// Find one concrete cycle, if any, as an ordered node sequence
    ///
    /// Returns the cycle closed by the first back-edge the DFS encounters
    /// (not necessarily the shortest one). The sequence lists each node
    /// once; the last node refers back to the first.
    pub fn find_cycle(&self) -> Option<Vec<RefNode>> {
        let mut colors: AHashMap<RefNode, Color> = AHashMap::new();
        let mut stack: Vec<RefNode> = Vec::new();

        // Every cycle passes through a formula node (only they have
        // outgoing explicit edges), so formula nodes suffice as DFS roots.
        for start in self.edges.keys() {
            if colors.contains_key(start) {
                continue;
            }
            if let Some(cycle) = self.visit(start, &mut colors, &mut stack) {
                return Some(cycle);
            }
        }

        None
    }

    fn visit(
        &self,
        node: &RefNode,
        colors: &mut AHashMap<RefNode, Color>,
        stack: &mut Vec<RefNode>,
    ) -> Option<Vec<RefNode>> {
        colors.insert(node.clone(), Color::Gray);
        stack.push(node.clone());

        for succ in self.successors(node) {
            match colors.get(&succ) {
                Some(Color::Gray) => {
                    // Back-edge: the cycle is the stack from the first
                    // occurrence of `succ` to the top
                    let pos = stack.iter().position(|n| *n == succ)?;
                    return Some(stack[pos..].to_vec());
                }
                Some(Color::Black) => {}
                None => {
                    if let Some(cycle) = self.visit(&succ, colors, stack) {
                        return Some(cycle);
                    }
                }
            }
        }

        stack.pop();
        colors.insert(node.clone(), Color::Black);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(sheet: &str, a1: &str) -> RefNode {
        RefNode::Cell {
            sheet: sheet.to_string(),
            cell: CellRef::parse(a1).unwrap(),
        }
    }

    fn range(sheet: &str, a1: &str) -> RefNode {
        RefNode::Range {
            sheet: sheet.to_string(),
            range: RangeRef::parse(a1).unwrap(),
        }
    }

    #[test]
    fn test_add_edge_idempotent() {
        let mut graph = DependencyGraph::new();

        assert!(graph.add_edge(cell("S", "A1"), cell("S", "B1")));
        assert!(!graph.add_edge(cell("S", "A1"), cell("S", "B1")));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_acyclic_chain() {
        let mut graph = DependencyGraph::new();

        // A1 -> B1 -> C1
        graph.add_edge(cell("S", "A1"), cell("S", "B1"));
        graph.add_edge(cell("S", "B1"), cell("S", "C1"));

        assert!(!graph.has_cycle());
        assert_eq!(graph.find_cycle(), None);
    }

    #[test]
    fn test_self_loop() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(cell("S", "A1"), cell("S", "A1"));

        let cycle = graph.find_cycle().unwrap();
        assert_eq!(cycle, vec![cell("S", "A1")]);
    }

    #[test]
    fn test_three_node_cycle() {
        let mut graph = DependencyGraph::new();

        // A1 -> B1 -> C1 -> A1
        graph.add_edge(cell("S", "A1"), cell("S", "B1"));
        graph.add_edge(cell("S", "B1"), cell("S", "C1"));
        graph.add_edge(cell("S", "C1"), cell("S", "A1"));

        let cycle = graph.find_cycle().unwrap();
        assert_eq!(cycle.len(), 3);
        // The cycle contains all three nodes, in dependency order
        assert!(cycle.contains(&cell("S", "A1")));
        assert!(cycle.contains(&cell("S", "B1")));
        assert!(cycle.contains(&cell("S", "C1")));
    }

    #[test]
    fn test_cross_sheet_no_false_cycle() {
        let mut graph = DependencyGraph::new();

        // Same addresses on different sheets are distinct nodes
        graph.add_edge(cell("S1", "A1"), cell("S2", "A1"));
        graph.add_edge(cell("S2", "A1"), cell("S1", "B1"));

        assert!(!graph.has_cycle());
    }

    #[test]
    fn test_range_contains_formula_cell() {
        let mut graph = DependencyGraph::new();

        // Formula at A1 depends on A1:A5 — the range contains A1 itself
        graph.add_edge(cell("S", "A1"), range("S", "A1:A5"));

        let cycle = graph.find_cycle().unwrap();
        assert!(cycle.contains(&cell("S", "A1")));
        assert!(cycle.contains(&range("S", "A1:A5")));
    }

    #[test]
    fn test_range_expansion_indirect() {
        let mut graph = DependencyGraph::new();

        // B1 depends on A1:A5; A3 (inside the range) depends on B1
        graph.add_edge(cell("S", "B1"), range("S", "A1:A5"));
        assert!(!graph.has_cycle());

        graph.add_edge(cell("S", "A3"), cell("S", "B1"));
        assert!(graph.has_cycle());
    }

    #[test]
    fn test_range_on_other_sheet_not_expanded() {
        let mut graph = DependencyGraph::new();

        graph.add_edge(cell("S1", "B1"), range("S2", "A1:A5"));
        graph.add_edge(cell("S1", "A3"), cell("S1", "B1"));

        // A3 sits inside A1:A5 geometrically, but on a different sheet
        assert!(!graph.has_cycle());
    }

    #[test]
    fn test_rollback_restores_graph() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(cell("S", "A1"), cell("S", "B1"));

        let added = graph.add_edges(
            &cell("S", "B1"),
            vec![cell("S", "C1"), cell("S", "A1")],
        );
        assert_eq!(added.len(), 2);
        assert!(graph.has_cycle());

        graph.remove_edges(&added);
        assert!(!graph.has_cycle());
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.contains_edge(&cell("S", "A1"), &cell("S", "B1")));
    }

    #[test]
    fn test_named_node_identity_by_binding() {
        let old = RefNode::Name {
            name: "Total".into(),
            sheet: "S".into(),
            range: RangeRef::parse("A1:A3").unwrap(),
        };
        let new = RefNode::Name {
            name: "Total".into(),
            sheet: "S".into(),
            range: RangeRef::parse("A1:A5").unwrap(),
        };

        // Distinct bindings are distinct nodes
        assert_ne!(old, new);

        let mut graph = DependencyGraph::new();
        graph.add_edge(cell("S", "B1"), old);
        graph.add_edge(cell("S", "C1"), new);
        assert_eq!(graph.edge_count(), 2);
        assert!(!graph.has_cycle());
    }
}
