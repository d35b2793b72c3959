//! Tagged step results for the degrade-gracefully contract.
//!
//! Steps with a documented fallback run through `with_fallback`: the
//! underlying call either succeeds or its error is captured and the local
//! fallback value substituted, so each step's degradation behavior is an
//! explicit, independently testable unit rather than a catch block inline
//! in the workflow.

use std::future::Future;

use tracing::warn;

#[derive(Debug, Clone)]
pub enum StepOutcome<T> {
    Success(T),
    Fallback { value: T, error: String },
}

impl<T> StepOutcome<T> {
    pub fn into_value(self) -> T {
        match self {
            StepOutcome::Success(v) => v,
            StepOutcome::Fallback { value, .. } => value,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            StepOutcome::Success(v) => v,
            StepOutcome::Fallback { value, .. } => value,
        }
    }

    pub fn degraded(&self) -> bool {
        matches!(self, StepOutcome::Fallback { .. })
    }

    pub fn fallback_error(&self) -> Option<&str> {
        match self {
            StepOutcome::Success(_) => None,
            StepOutcome::Fallback { error, .. } => Some(error),
        }
    }
}

/// Run a fallible step, substituting `fallback` if it errors.
pub async fn with_fallback<T, Fut>(step: &str, attempt: Fut, fallback: T) -> StepOutcome<T>
where
    Fut: Future<Output = anyhow::Result<T>>,
{
    match attempt.await {
        Ok(value) => StepOutcome::Success(value),
        Err(e) => {
            warn!(step, error = %e, "Step failed, substituting fallback");
            StepOutcome::Fallback {
                value: fallback,
                error: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn success_passes_the_value_through() {
        let outcome = with_fallback("demo", async { Ok(7) }, 0).await;
        assert!(!outcome.degraded());
        assert_eq!(outcome.into_value(), 7);
    }

    #[tokio::test]
    async fn failure_substitutes_the_fallback_and_keeps_the_error() {
        let outcome = with_fallback(
            "demo",
            async { Err::<i32, _>(anyhow::anyhow!("upstream down")) },
            42,
        )
        .await;
        assert!(outcome.degraded());
        assert_eq!(outcome.fallback_error(), Some("upstream down"));
        assert_eq!(outcome.into_value(), 42);
    }
}
