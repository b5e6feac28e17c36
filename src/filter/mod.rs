//! Filter trees: leaves combined through `AllOf`, `AnyOf` and `Not`.
//!
//! A [`Filter`] is a closed sum of four node kinds. Leaves come from the
//! operator methods on column references; composites come from the checked
//! constructors below. Nothing is bound to data until [`Filter::evaluate`].

mod eval;
mod leaf;
mod visitor;

use std::{fmt, ops};

pub use leaf::{LeafFilter, LeafPredicate};
pub use visitor::FilterVisitor;

use self::eval::{ColumnCollector, DepthMeter, SelectionEvaluator};
use crate::{
    column::AnyColumnRef,
    error::FilterError,
    logging::colfilter_log,
    option::EvalOptions,
    selection::Selection,
    table::{Binder, Table},
};

/// Node of a filter tree.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterNode {
    /// Single column test.
    Leaf(LeafFilter),
    /// Rows matching every child; never empty.
    AllOf(Vec<Filter>),
    /// Rows matching at least one child; never empty.
    AnyOf(Vec<Filter>),
    /// Rows the child does not match, missing cells included.
    Not(Box<Filter>),
}

/// Deferred predicate over the rows of a [`Table`].
///
/// Filters are immutable and hold no table; the same filter can be evaluated
/// against any number of tables, from any number of threads.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    node: FilterNode,
}

impl Filter {
    pub(crate) fn leaf(leaf: LeafFilter) -> Self {
        Self::from_node(FilterNode::Leaf(leaf))
    }

    fn from_node(node: FilterNode) -> Self {
        Self { node }
    }

    /// Returns a reference to the underlying node.
    #[must_use]
    pub fn node(&self) -> &FilterNode {
        &self.node
    }

    /// Returns true for single column tests.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.node, FilterNode::Leaf(_))
    }

    /// Builds a conjunction of `filters`, kept in the given order.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidFilter`] when `filters` is empty.
    pub fn all_of<I>(filters: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = Filter>,
    {
        Self::composite("all_of", filters, FilterNode::AllOf)
    }

    /// Builds a disjunction of `filters`, kept in the given order.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidFilter`] when `filters` is empty.
    pub fn any_of<I>(filters: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = Filter>,
    {
        Self::composite("any_of", filters, FilterNode::AnyOf)
    }

    /// Two-child conjunction.
    #[must_use]
    pub fn both(left: Filter, right: Filter) -> Self {
        Self::from_node(FilterNode::AllOf(vec![left, right]))
    }

    /// Two-child disjunction.
    #[must_use]
    pub fn either(left: Filter, right: Filter) -> Self {
        Self::from_node(FilterNode::AnyOf(vec![left, right]))
    }

    /// Wraps the filter in a negation.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::from_node(FilterNode::Not(Box::new(self)))
    }

    fn composite<I>(
        op: &'static str,
        filters: I,
        wrap: fn(Vec<Filter>) -> FilterNode,
    ) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = Filter>,
    {
        let children: Vec<Filter> = filters.into_iter().collect();
        if children.is_empty() {
            colfilter_log!(
                log::Level::Debug,
                "filter_rejected",
                "op={} reason=no_children",
                op
            );
            return Err(FilterError::InvalidFilter { op });
        }
        Ok(Self::from_node(wrap(children)))
    }

    /// Evaluates the filter against `table` with default options.
    ///
    /// # Errors
    ///
    /// Any binding failure in any leaf aborts the evaluation; see [`FilterError`].
    pub fn evaluate(&self, table: &dyn Table) -> Result<Selection, FilterError> {
        self.evaluate_with(table, &EvalOptions::default())
    }

    /// Evaluates the filter against `table`.
    ///
    /// Every leaf is evaluated, even once an intermediate result is empty, so
    /// binding errors anywhere in the tree are reported.
    ///
    /// # Errors
    ///
    /// [`FilterError::DepthExceeded`] before any binding when the tree is deeper
    /// than the configured limit, otherwise the first binding failure met in
    /// left-to-right order.
    pub fn evaluate_with(
        &self,
        table: &dyn Table,
        options: &EvalOptions,
    ) -> Result<Selection, FilterError> {
        if let Some(limit) = options.max_depth {
            let depth = self.depth();
            if depth > limit {
                return Err(FilterError::DepthExceeded { depth, limit });
            }
        }
        let binder = Binder::new(table, options.log_context)?;
        let rows = binder.rows();
        let selection = self.accept(&mut SelectionEvaluator::new(binder))?;
        colfilter_log!(
            log::Level::Debug,
            ctx: options.log_context,
            "filter_evaluate",
            "rows={} matches={} filter={}",
            rows,
            selection.len(),
            self
        );
        Ok(selection)
    }

    /// Accepts a visitor that walks the filter tree bottom-up.
    pub fn accept<V>(&self, visitor: &mut V) -> Result<V::Value, V::Error>
    where
        V: FilterVisitor + ?Sized,
    {
        visitor.visit_filter(self)
    }

    /// Applies structural rewrites that never change which rows match:
    /// nested composites of the same kind are flattened, double negations
    /// collapse and single-child composites are replaced by their child.
    #[must_use]
    pub fn simplify(self) -> Self {
        match self.node {
            FilterNode::Leaf(_) => self,
            FilterNode::Not(inner) => match inner.simplify().node {
                FilterNode::Not(grandchild) => *grandchild,
                other => Self::from_node(FilterNode::Not(Box::new(Self::from_node(other)))),
            },
            FilterNode::AllOf(children) => {
                let mut flat = Vec::with_capacity(children.len());
                for child in children {
                    match child.simplify().node {
                        FilterNode::AllOf(mut nested) => flat.append(&mut nested),
                        other => flat.push(Self::from_node(other)),
                    }
                }
                Self::collapse(flat, FilterNode::AllOf)
            }
            FilterNode::AnyOf(children) => {
                let mut flat = Vec::with_capacity(children.len());
                for child in children {
                    match child.simplify().node {
                        FilterNode::AnyOf(mut nested) => flat.append(&mut nested),
                        other => flat.push(Self::from_node(other)),
                    }
                }
                Self::collapse(flat, FilterNode::AnyOf)
            }
        }
    }

    fn collapse(mut children: Vec<Filter>, wrap: fn(Vec<Filter>) -> FilterNode) -> Self {
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return only;
            }
        }
        Self::from_node(wrap(children))
    }

    /// Nesting depth; a leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self.accept(&mut DepthMeter) {
            Ok(depth) => depth,
            Err(never) => match never {},
        }
    }

    /// Columns read by the filter, operand columns included, without duplicates
    /// and in first-seen order.
    #[must_use]
    pub fn referenced_columns(&self) -> Vec<AnyColumnRef> {
        let mut collector = ColumnCollector::default();
        match self.accept(&mut collector) {
            Ok(()) => collector.into_columns(),
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (children, keyword) = match &self.node {
            FilterNode::Leaf(leaf) => return leaf.fmt(f),
            FilterNode::Not(inner) => return write!(f, "NOT {inner}"),
            FilterNode::AllOf(children) => (children, " AND "),
            FilterNode::AnyOf(children) => (children, " OR "),
        };
        f.write_str("(")?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                f.write_str(keyword)?;
            }
            child.fmt(f)?;
        }
        f.write_str(")")
    }
}

impl ops::BitAnd for Filter {
    type Output = Filter;

    fn bitand(self, rhs: Filter) -> Filter {
        Filter::both(self, rhs)
    }
}

impl ops::BitOr for Filter {
    type Output = Filter;

    fn bitor(self, rhs: Filter) -> Filter {
        Filter::either(self, rhs)
    }
}

impl ops::Not for Filter {
    type Output = Filter;

    fn not(self) -> Filter {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::{
        array::{Float64Array, StringArray},
        datatypes::{DataType, Field, Schema},
        record_batch::RecordBatch,
    };

    use super::{Filter, FilterNode};
    use crate::{
        column::{ColumnRef, ColumnType, NumberKind, StringKind},
        error::FilterError,
        option::EvalOptions,
    };

    fn age() -> ColumnRef<NumberKind> {
        ColumnRef::new("age")
    }

    fn name() -> ColumnRef<StringKind> {
        ColumnRef::new("name")
    }

    fn batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("age", DataType::Float64, true),
            Field::new("name", DataType::Utf8, false),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Float64Array::from(vec![Some(10.0), Some(20.0), Some(30.0), None])),
                Arc::new(StringArray::from(vec!["a", "b", "c", "d"])),
            ],
        )
        .expect("record batch")
    }

    #[test]
    fn empty_composites_are_rejected() {
        assert!(matches!(
            Filter::all_of(Vec::new()),
            Err(FilterError::InvalidFilter { op: "all_of" })
        ));
        assert!(matches!(
            Filter::any_of(Vec::new()),
            Err(FilterError::InvalidFilter { op: "any_of" })
        ));
    }

    #[test]
    fn composites_keep_children_in_order() {
        let a = age().is_greater_than(15.0);
        let b = name().is_equal_to("c");
        let all = Filter::all_of([a.clone(), b.clone()]).expect("all_of");
        match all.node() {
            FilterNode::AllOf(children) => assert_eq!(children, &vec![a.clone(), b.clone()]),
            other => panic!("expected AllOf, got {other:?}"),
        }
        assert_eq!(all, Filter::both(a.clone(), b.clone()));
        assert_eq!(a.clone() | b.clone(), Filter::either(a.clone(), b));
        assert!(matches!((!a).node(), FilterNode::Not(_)));
    }

    #[test]
    fn simplify_flattens_and_collapses() {
        let a = age().is_greater_than(15.0);
        let b = name().is_equal_to("c");
        let c = age().is_missing();

        let nested = Filter::both(a.clone(), Filter::both(b.clone(), c.clone()));
        match nested.simplify().node() {
            FilterNode::AllOf(children) => assert_eq!(children.len(), 3),
            other => panic!("expected AllOf, got {other:?}"),
        }

        assert_eq!((!!a.clone()).simplify(), a);
        let single = Filter::any_of([b.clone()]).expect("any_of");
        assert_eq!(single.simplify(), b);

        // a NOT between composites of the same kind stops flattening
        let guarded = Filter::either(a.clone(), !Filter::either(b, c));
        match guarded.simplify().node() {
            FilterNode::AnyOf(children) => assert_eq!(children.len(), 2),
            other => panic!("expected AnyOf, got {other:?}"),
        }
    }

    #[test]
    fn depth_and_referenced_columns() {
        let age_over = age().is_greater_than(15.0);
        assert_eq!(age_over.depth(), 1);

        let tree = Filter::both(
            !age_over.clone(),
            Filter::either(name().is_equal_to("c"), age().is_less_than(&age())),
        );
        assert_eq!(tree.depth(), 3);
        assert_eq!(
            tree.referenced_columns()
                .iter()
                .map(|column| (column.name().to_string(), column.column_type()))
                .collect::<Vec<_>>(),
            vec![
                ("age".to_string(), ColumnType::Number),
                ("name".to_string(), ColumnType::String),
            ]
        );
    }

    #[test]
    fn display_renders_tree() {
        let tree = Filter::both(
            age().is_greater_than(15.0),
            !Filter::either(name().is_equal_to("c"), age().is_missing()),
        );
        assert_eq!(
            tree.to_string(),
            "(age > 15 AND NOT (name = \"c\" OR age is missing))"
        );
    }

    #[test]
    fn evaluates_scenario() {
        let batch = batch();
        let over = age().is_greater_than(15.0);
        assert_eq!(over.evaluate(&batch).expect("evaluate").to_vec(), vec![1, 2]);
        assert_eq!(
            (!over.clone()).evaluate(&batch).expect("evaluate").to_vec(),
            vec![0, 3]
        );
        let both = Filter::all_of([over, name().is_equal_to("c")]).expect("all_of");
        assert_eq!(both.evaluate(&batch).expect("evaluate").to_vec(), vec![2]);
    }

    #[test]
    fn errors_surface_from_any_child() {
        let batch = batch();
        // the first child already matches nothing; the second must still bind
        let filter = Filter::both(
            age().is_greater_than(100.0),
            ColumnRef::<NumberKind>::new("height").is_positive(),
        );
        assert!(matches!(
            filter.evaluate(&batch),
            Err(FilterError::ColumnNotFound(column)) if column == "height"
        ));

        let filter = Filter::either(
            age().is_missing(),
            ColumnRef::<StringKind>::new("age").is_empty_string(),
        );
        assert!(matches!(
            filter.evaluate(&batch),
            Err(FilterError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn depth_limit_is_checked_before_binding() {
        let filter = !!ColumnRef::<NumberKind>::new("unknown").is_zero();
        let options = EvalOptions::default().max_depth(Some(2));
        assert!(matches!(
            filter.evaluate_with(&batch(), &options),
            Err(FilterError::DepthExceeded { depth: 3, limit: 2 })
        ));

        let options = EvalOptions::default().max_depth(Some(3));
        assert!(matches!(
            filter.evaluate_with(&batch(), &options),
            Err(FilterError::ColumnNotFound(_))
        ));
    }
}
