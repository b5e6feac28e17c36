//! Structured log lines for filter construction and evaluation.
//!
//! Every line goes to the `colfilter` target and starts with `event=<name>`,
//! followed by the evaluation's common key/values (if any) and the event's own
//! `key=value` pairs.

use std::fmt;

pub(crate) const LOG_TARGET: &str = "colfilter";

/// Key/value pairs stamped on every log line of one evaluation, such as
/// `"query=42 tenant=a"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogContext {
    common_kv: &'static str,
}

impl LogContext {
    /// Wraps `common_kv`; an empty string adds nothing to log lines.
    pub const fn new(common_kv: &'static str) -> Self {
        Self { common_kv }
    }

    pub(crate) fn common_kv(&self) -> Option<&'static str> {
        (!self.common_kv.is_empty()).then_some(self.common_kv)
    }
}

// Renders as the separator plus pairs, or as nothing for an empty context.
impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.common_kv() {
            Some(common_kv) => write!(f, " {common_kv}"),
            None => Ok(()),
        }
    }
}

macro_rules! colfilter_log {
    ($level:expr, $event:expr, $fmt:expr $(, $args:expr)* $(,)?) => {
        $crate::logging::colfilter_log!(
            $level,
            ctx: $crate::logging::LogContext::default(),
            $event,
            $fmt
            $(, $args)*
        )
    };
    ($level:expr, ctx: $ctx:expr, $event:expr, $fmt:expr $(, $args:expr)* $(,)?) => {{
        if log::log_enabled!(target: $crate::logging::LOG_TARGET, $level) {
            log::log!(
                target: $crate::logging::LOG_TARGET,
                $level,
                "event={}{} {}",
                $event,
                $ctx,
                format_args!($fmt $(, $args)*)
            );
        }
    }};
}

pub(crate) use colfilter_log;

#[cfg(test)]
mod tests {
    use super::LogContext;

    #[test]
    fn context_renders_leading_separator() {
        assert_eq!(LogContext::new("query=7").to_string(), " query=7");
        assert_eq!(LogContext::default().to_string(), "");
        assert_eq!(LogContext::new("").common_kv(), None);
    }
}
