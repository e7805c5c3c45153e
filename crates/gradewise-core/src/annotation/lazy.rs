//! Initialise-once annotator wrapper.

use once_cell::sync::OnceCell;

use super::{Annotation, Annotator};
use crate::error::AnnotationResult;

type Factory = Box<dyn Fn() -> AnnotationResult<Box<dyn Annotator>> + Send + Sync>;

/// Defers building an expensive annotator until the first request.
///
/// Concurrent first calls race on a single initialisation; the winner's
/// annotator is shared read-only afterwards. A failed initialisation is
/// reported to the caller and retried on the next request.
pub struct LazyAnnotator {
    cell: OnceCell<Box<dyn Annotator>>,
    factory: Factory,
}

impl LazyAnnotator {
    /// Wrap a fallible annotator factory.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> AnnotationResult<Box<dyn Annotator>> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    /// Returns `true` once the inner annotator has been built.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    fn inner(&self) -> AnnotationResult<&dyn Annotator> {
        self.cell
            .get_or_try_init(|| {
                tracing::debug!("initialising annotator");
                (self.factory)()
            })
            .map(|annotator| &**annotator)
    }
}

impl std::fmt::Debug for LazyAnnotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyAnnotator")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

impl Annotator for LazyAnnotator {
    fn annotate(&self, text: &str) -> AnnotationResult<Annotation> {
        self.inner()?.annotate(text)
    }
}
