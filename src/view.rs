//! Derived task views.

use std::borrow::Cow;

use crate::model::Task;
use crate::repository::Revision;

/// Tasks to display for the given completion filter.
///
/// With `only_completed` the result is the completed subsequence in original
/// order; otherwise it borrows `tasks` unchanged.
pub fn visible_tasks(tasks: &[Task], only_completed: bool) -> Cow<'_, [Task]> {
    if only_completed {
        Cow::Owned(tasks.iter().filter(|task| task.completed).cloned().collect())
    } else {
        Cow::Borrowed(tasks)
    }
}

/// Memoized [`visible_tasks`].
///
/// The caller passes the repository's [`Revision`] alongside the tasks; the
/// filter recomputes only when the revision or the flag differs from the last
/// call. Revisions from different repositories never compare equal.
#[derive(Debug, Default)]
pub struct ViewFilter {
    cached: Option<CachedView>,
    recomputations: usize,
}

#[derive(Debug)]
struct CachedView {
    revision: Revision,
    only_completed: bool,
    indices: Vec<usize>,
}

impl ViewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible<'a>(
        &mut self,
        tasks: &'a [Task],
        revision: &Revision,
        only_completed: bool,
    ) -> Vec<&'a Task> {
        let stale = match &self.cached {
            Some(cached) => {
                cached.revision != *revision || cached.only_completed != only_completed
            }
            None => true,
        };

        if stale {
            let indices = tasks
                .iter()
                .enumerate()
                .filter(|(_, task)| !only_completed || task.completed)
                .map(|(index, _)| index)
                .collect();
            self.cached = Some(CachedView {
                revision: revision.clone(),
                only_completed,
                indices,
            });
            self.recomputations += 1;
        }

        self.cached
            .as_ref()
            .map(|cached| cached.indices.iter().filter_map(|&i| tasks.get(i)).collect())
            .unwrap_or_default()
    }

    /// How many times the view was rebuilt
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }
}
