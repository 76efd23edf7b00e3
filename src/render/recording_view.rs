use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{ViewError, ViewResult};
use crate::render::{DerivedView, ViewAdapter, ViewKind};

/// What a `RecordingView` has been handed so far.
#[derive(Debug, Default)]
pub struct RecordedRenders {
    pub render_count: usize,
    pub last: Option<DerivedView>,
}

/// Shared read handle onto a `RecordingView`'s history.
pub type RecordingHandle = Rc<RefCell<RecordedRenders>>;

/// Headless view used by tests and replay tooling.
///
/// It validates every frame it receives, so derivation bugs surface even
/// without a real chart backend.
#[derive(Debug)]
pub struct RecordingView {
    id: String,
    kind: ViewKind,
    renders: RecordingHandle,
}

impl RecordingView {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ViewKind) -> (Self, RecordingHandle) {
        let renders = RecordingHandle::default();
        (
            Self {
                id: id.into(),
                kind,
                renders: renders.clone(),
            },
            renders,
        )
    }
}

impl ViewAdapter for RecordingView {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> ViewKind {
        self.kind
    }

    fn render(&mut self, view: &DerivedView) -> ViewResult<()> {
        if view.kind() != self.kind {
            return Err(ViewError::Render {
                view_id: self.id.clone(),
                reason: format!("expected {:?} content, got {:?}", self.kind, view.kind()),
            });
        }
        view.validate()?;
        let mut renders = self.renders.borrow_mut();
        renders.render_count += 1;
        renders.last = Some(view.clone());
        Ok(())
    }
}
