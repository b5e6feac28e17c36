use super::{Filter, FilterNode, LeafFilter};

/// Visitor that walks filter trees bottom-up and folds child results.
///
/// Every child of a composite is visited before the composite is combined;
/// nothing short-circuits, so a failing leaf anywhere in the tree is reported.
pub trait FilterVisitor {
    /// Error type used when evaluation fails.
    type Error;
    /// Concrete value produced for every node.
    type Value;

    /// Evaluates a leaf filter.
    fn visit_leaf(&mut self, leaf: &LeafFilter) -> Result<Self::Value, Self::Error>;

    /// Combines the result of a negated child.
    fn combine_not(
        &mut self,
        original: &Filter,
        child: Self::Value,
    ) -> Result<Self::Value, Self::Error>;

    /// Combines an `AllOf` node from its children's results.
    fn combine_all(
        &mut self,
        original: &Filter,
        children: Vec<Self::Value>,
    ) -> Result<Self::Value, Self::Error>;

    /// Combines an `AnyOf` node from its children's results.
    fn combine_any(
        &mut self,
        original: &Filter,
        children: Vec<Self::Value>,
    ) -> Result<Self::Value, Self::Error>;

    /// Visits the supplied filter by walking the tree.
    fn visit_filter(&mut self, filter: &Filter) -> Result<Self::Value, Self::Error> {
        match filter.node() {
            FilterNode::Leaf(leaf) => self.visit_leaf(leaf),
            FilterNode::Not(inner) => {
                let child = self.visit_filter(inner)?;
                self.combine_not(filter, child)
            }
            FilterNode::AllOf(children) => {
                debug_assert!(!children.is_empty(), "Filter::all_of rejects empty lists");
                let mut values = Vec::with_capacity(children.len());
                for child in children {
                    values.push(self.visit_filter(child)?);
                }
                self.combine_all(filter, values)
            }
            FilterNode::AnyOf(children) => {
                debug_assert!(!children.is_empty(), "Filter::any_of rejects empty lists");
                let mut values = Vec::with_capacity(children.len());
                for child in children {
                    values.push(self.visit_filter(child)?);
                }
                self.combine_any(filter, values)
            }
        }
    }
}
