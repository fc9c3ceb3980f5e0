use std::sync::atomic::{AtomicU64, Ordering};

use crate::{error::FetchError, RecipeSource, INGREDIENT_SUGGESTION_LIMIT};

/// Hands out increasing request tickets; only the newest ticket is current.
#[derive(Debug, Default)]
pub struct RequestGuard {
    latest: AtomicU64,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

/// Keystroke-driven ingredient suggestions that never deliver a stale answer.
pub struct Autocompleter<S: RecipeSource> {
    source: S,
    guard: RequestGuard,
}

impl<S: RecipeSource> Autocompleter<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            guard: RequestGuard::new(),
        }
    }

    /// `Ok(None)` means a newer request was issued while this one was in flight,
    /// and its result must not be shown.
    pub async fn suggest(&self, partial: &str) -> Result<Option<Vec<String>>, FetchError> {
        let ticket = self.guard.issue();

        if partial.trim().is_empty() {
            return Ok(Some(vec![]));
        }

        let result = self.source.suggest_ingredients(partial.trim()).await;

        if !self.guard.is_current(ticket) {
            log::warn!("Dropping stale suggestions for {partial:?}");
            return Ok(None);
        }

        result.map(|mut names| {
            names.truncate(INGREDIENT_SUGGESTION_LIMIT);
            Some(names)
        })
    }
}
