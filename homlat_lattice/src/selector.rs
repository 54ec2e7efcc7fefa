//! Representative-or-member policy.

use homlat_common::GraphId;

use crate::order::PartialOrder;

/// Decides whether a graph may give up its representative status and fold
/// into an existing equivalence class.
#[derive(Debug, Clone)]
pub(crate) struct RepresentativeSelector {
    distinct_size_threshold: usize,
}

impl RepresentativeSelector {
    pub(crate) fn new(distinct_size_threshold: usize) -> Self {
        Self {
            distinct_size_threshold,
        }
    }

    /// Small graphs always stay individually distinguishable, whatever their
    /// relations say.
    pub(crate) fn always_distinct(&self, node_count: usize) -> bool {
        node_count <= self.distinct_size_threshold
    }

    /// A graph may fold into `rep`'s class only when the relation is proven
    /// in both directions and the graph is above the size threshold.
    pub(crate) fn may_fold(
        &self,
        node_count: usize,
        forward_holds: bool,
        backward_holds: bool,
    ) -> bool {
        forward_holds && backward_holds && !self.always_distinct(node_count)
    }

    /// Whether local structure forces `id` to remain a representative: it
    /// sits on the boundary of the proven order (no outgoing or no incoming
    /// edges) or some neighbor relation is asymmetric.
    pub(crate) fn locally_required(&self, id: &GraphId, order: &PartialOrder) -> bool {
        let outgoing: Vec<&GraphId> = order
            .edges()
            .filter(|(from, _)| *from == id)
            .map(|(_, to)| to)
            .collect();
        let incoming: Vec<&GraphId> = order
            .edges()
            .filter(|(_, to)| *to == id)
            .map(|(from, _)| from)
            .collect();

        if outgoing.is_empty() || incoming.is_empty() {
            return true;
        }
        outgoing.iter().any(|b| !order.is_reachable(b, id))
            || incoming.iter().any(|b| !order.is_reachable(id, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_keeps_small_graphs_distinct() {
        let sel = RepresentativeSelector::new(2);
        assert!(sel.always_distinct(2));
        assert!(!sel.always_distinct(3));
        assert!(!sel.may_fold(2, true, true));
        assert!(sel.may_fold(3, true, true));
        assert!(!sel.may_fold(3, true, false));
    }

    #[test]
    fn boundary_nodes_are_locally_required() {
        let sel = RepresentativeSelector::new(2);
        let mut order = PartialOrder::new();
        order.relate(GraphId::from("a"), GraphId::from("b"));
        // `a` has no incoming edge, `b` no outgoing edge.
        assert!(sel.locally_required(&GraphId::from("a"), &order));
        assert!(sel.locally_required(&GraphId::from("b"), &order));
    }

    #[test]
    fn mutual_neighbors_are_not_locally_required() {
        let sel = RepresentativeSelector::new(2);
        let mut order = PartialOrder::new();
        order.relate(GraphId::from("a"), GraphId::from("b"));
        order.relate(GraphId::from("b"), GraphId::from("a"));
        assert!(!sel.locally_required(&GraphId::from("a"), &order));
    }
}
