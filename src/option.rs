use crate::logging::LogContext;

/// Knobs applied to a single [`Filter::evaluate_with`](crate::Filter::evaluate_with) call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvalOptions {
    pub(crate) max_depth: Option<usize>,
    pub(crate) log_context: LogContext,
}

impl EvalOptions {
    /// Rejects filter trees nested deeper than `max_depth` before any column is bound.
    ///
    /// `None` (the default) leaves depth unbounded.
    pub fn max_depth(self, max_depth: Option<usize>) -> Self {
        EvalOptions { max_depth, ..self }
    }

    /// Appends `common_kv` (for example `"query=42"`) to every log line of the evaluation.
    pub fn log_context(self, common_kv: &'static str) -> Self {
        EvalOptions {
            log_context: LogContext::new(common_kv),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EvalOptions;

    #[test]
    fn builder_keeps_previous_settings() {
        let options = EvalOptions::default()
            .max_depth(Some(8))
            .log_context("query=7");
        assert_eq!(options.max_depth, Some(8));
        assert_eq!(options.log_context.common_kv(), Some("query=7"));

        let reset = options.max_depth(None);
        assert_eq!(reset.max_depth, None);
        assert_eq!(reset.log_context.common_kv(), Some("query=7"));
    }

    #[test]
    fn default_is_unbounded_and_silent() {
        let options = EvalOptions::default();
        assert_eq!(options.max_depth, None);
        assert_eq!(options.log_context.common_kv(), None);
    }
}
