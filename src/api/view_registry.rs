use tracing::debug;

use crate::error::{ViewError, ViewResult};
use crate::render::{ViewAdapter, ViewKind};

use super::LinkedViewsEngine;

impl LinkedViewsEngine {
    /// Registers a view with a unique identifier.
    ///
    /// The view is not rendered until the next coordination cycle or
    /// `render_all`.
    pub fn register_view(&mut self, view: Box<dyn ViewAdapter>) -> ViewResult<()> {
        let view_id = view.id().to_owned();
        if view_id.is_empty() {
            return Err(ViewError::InvalidData("view id must not be empty".to_owned()));
        }
        if self.has_view(&view_id) {
            return Err(ViewError::DuplicateView(view_id));
        }
        debug!(view_id = %view_id, kind = ?view.kind(), "register view");
        self.views.push(view);
        Ok(())
    }

    /// Unregisters a view by id. Returns `true` when removed.
    pub fn unregister_view(&mut self, view_id: &str) -> bool {
        if let Some(position) = self.views.iter().position(|view| view.id() == view_id) {
            self.views.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    #[must_use]
    pub fn has_view(&self, view_id: &str) -> bool {
        self.views.iter().any(|view| view.id() == view_id)
    }

    /// Registered view ids with their kinds, in registration order.
    pub fn views(&self) -> impl Iterator<Item = (&str, ViewKind)> {
        self.views.iter().map(|view| (view.id(), view.kind()))
    }
}
