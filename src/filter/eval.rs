use std::convert::Infallible;

use super::{Filter, FilterVisitor, LeafFilter};
use crate::{column::AnyColumnRef, error::FilterError, selection::Selection, table::Binder};

/// Evaluates a filter tree into the selection of matching rows.
pub(crate) struct SelectionEvaluator<'t> {
    binder: Binder<'t>,
}

impl<'t> SelectionEvaluator<'t> {
    pub(crate) fn new(binder: Binder<'t>) -> Self {
        Self { binder }
    }
}

impl FilterVisitor for SelectionEvaluator<'_> {
    type Error = FilterError;
    type Value = Selection;

    fn visit_leaf(&mut self, leaf: &LeafFilter) -> Result<Selection, FilterError> {
        leaf.select(&self.binder)
    }

    fn combine_not(&mut self, _: &Filter, child: Selection) -> Result<Selection, FilterError> {
        Ok(child.complement(self.binder.rows()))
    }

    fn combine_all(
        &mut self,
        _: &Filter,
        children: Vec<Selection>,
    ) -> Result<Selection, FilterError> {
        Ok(children
            .into_iter()
            .reduce(|acc, next| acc.intersect(&next))
            .unwrap_or_else(|| Selection::universe(self.binder.rows())))
    }

    fn combine_any(
        &mut self,
        _: &Filter,
        children: Vec<Selection>,
    ) -> Result<Selection, FilterError> {
        Ok(children
            .into_iter()
            .reduce(|acc, next| acc.union(&next))
            .unwrap_or_default())
    }
}

/// Collects every column a filter reads, operands included, in first-seen order.
#[derive(Default)]
pub(crate) struct ColumnCollector {
    columns: Vec<AnyColumnRef>,
}

impl ColumnCollector {
    pub(crate) fn into_columns(self) -> Vec<AnyColumnRef> {
        self.columns
    }

    fn push(&mut self, column: &AnyColumnRef) {
        if !self.columns.contains(column) {
            self.columns.push(column.clone());
        }
    }
}

impl FilterVisitor for ColumnCollector {
    type Error = Infallible;
    type Value = ();

    fn visit_leaf(&mut self, leaf: &LeafFilter) -> Result<(), Infallible> {
        self.push(leaf.column());
        if let Some(operand) = leaf.predicate().operand_column() {
            self.push(operand);
        }
        Ok(())
    }

    fn combine_not(&mut self, _: &Filter, _: ()) -> Result<(), Infallible> {
        Ok(())
    }

    fn combine_all(&mut self, _: &Filter, _: Vec<()>) -> Result<(), Infallible> {
        Ok(())
    }

    fn combine_any(&mut self, _: &Filter, _: Vec<()>) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Measures nesting: a leaf has depth 1, each composite adds one level.
pub(crate) struct DepthMeter;

impl FilterVisitor for DepthMeter {
    type Error = Infallible;
    type Value = usize;

    fn visit_leaf(&mut self, _: &LeafFilter) -> Result<usize, Infallible> {
        Ok(1)
    }

    fn combine_not(&mut self, _: &Filter, child: usize) -> Result<usize, Infallible> {
        Ok(child + 1)
    }

    fn combine_all(&mut self, _: &Filter, children: Vec<usize>) -> Result<usize, Infallible> {
        Ok(children.into_iter().max().unwrap_or(0) + 1)
    }

    fn combine_any(&mut self, _: &Filter, children: Vec<usize>) -> Result<usize, Infallible> {
        Ok(children.into_iter().max().unwrap_or(0) + 1)
    }
}
