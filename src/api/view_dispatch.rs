use tracing::{trace, warn};

use crate::error::{ViewError, ViewResult};
use crate::render::DerivedView;

use super::{LinkedViewsEngine, ViewTopics};

impl LinkedViewsEngine {
    /// Re-derives and renders every registered view.
    pub fn render_all(&mut self) -> ViewResult<usize> {
        self.render_topics(ViewTopics::all())
    }

    /// Renders every view whose kind is in `topics`, deriving each kind's
    /// content once.
    ///
    /// Every targeted view is rendered even when an earlier one fails, so no
    /// view keeps content from a superseded state; the first failure is
    /// returned afterwards.
    pub(super) fn render_topics(&mut self, topics: ViewTopics) -> ViewResult<usize> {
        let derived: Vec<DerivedView> = topics
            .kinds()
            .filter(|kind| self.views.iter().any(|view| view.kind() == *kind))
            .map(|kind| self.derive_view(kind))
            .collect();

        let mut rendered = 0;
        let mut first_error = None::<ViewError>;
        for view in &mut self.views {
            let Some(content) = derived
                .iter()
                .find(|content| content.kind() == view.kind())
            else {
                continue;
            };
            match view.render(content) {
                Ok(()) => {
                    rendered += 1;
                    trace!(
                        view_id = view.id(),
                        revision = content.revision(),
                        empty = content.is_empty(),
                        "view rendered"
                    );
                }
                Err(err) => {
                    warn!(view_id = view.id(), error = %err, "view failed to render");
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(rendered),
        }
    }
}
