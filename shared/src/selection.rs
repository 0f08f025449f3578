//! Selection based copy on a document-like host.
//!
//! [`LegacySelectionCopier`] drives the insert / select / copy / remove
//! sequence and guarantees the helper element is removed on every exit path.
//! The host only supplies the primitive steps.

use std::fmt;

use crate::copy::SelectionCopier;

/// Primitive steps of a selection copy.
pub trait SelectionHost {
    /// Handle to the inserted helper element.
    type Element;
    /// Platform error raised by a step.
    type Error: fmt::Display;

    /// Insert an off-screen, read-only element holding `text`.
    fn insert_hidden_text(&self, text: &str) -> Result<Self::Element, Self::Error>;
    /// Focus `element` and select its whole content.
    fn focus_and_select(&self, element: &Self::Element) -> Result<(), Self::Error>;
    /// Run the platform "copy current selection" command.
    fn exec_copy(&self) -> Result<bool, Self::Error>;
    /// Detach `element` from the document.
    fn remove(&self, element: &Self::Element);
}

/// [`SelectionCopier`] built on a [`SelectionHost`].
#[derive(Debug, Clone, Default)]
pub struct LegacySelectionCopier<H> {
    host: H,
}

impl<H> LegacySelectionCopier<H> {
    /// Wrap `host`.
    pub fn new(host: H) -> Self {
        Self {
            host,
        }
    }

    /// The wrapped host.
    pub fn host(&self) -> &H {
        &self.host
    }
}

struct RemoveOnDrop<'a, H: SelectionHost> {
    host: &'a H,
    element: H::Element,
}

impl<H: SelectionHost> Drop for RemoveOnDrop<'_, H> {
    fn drop(&mut self) {
        self.host.remove(&self.element);
    }
}

impl<H: SelectionHost> SelectionCopier for LegacySelectionCopier<H> {
    fn copy_via_selection(&self, text: &str) -> bool {
        let element = match self.host.insert_hidden_text(text) {
            Ok(element) => element,
            Err(err) => {
                tracing::debug!(error = %err, "could not insert copy helper element");
                return false;
            },
        };
        let guard = RemoveOnDrop {
            host: &self.host,
            element,
        };

        let outcome = self
            .host
            .focus_and_select(&guard.element)
            .and_then(|()| self.host.exec_copy());
        drop(guard);

        match outcome {
            Ok(copied) => copied,
            Err(err) => {
                tracing::debug!(error = %err, "selection copy command failed");
                false
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Clone, Copy, PartialEq)]
    enum Step {
        Ok(bool),
        Throw,
    }

    struct FakeDocument {
        nodes: RefCell<Vec<String>>,
        insert_fails: bool,
        select_fails: bool,
        exec: Step,
    }

    impl FakeDocument {
        fn new(exec: Step) -> Self {
            Self {
                nodes: RefCell::new(Vec::new()),
                insert_fails: false,
                select_fails: false,
                exec,
            }
        }
    }

    impl SelectionHost for FakeDocument {
        type Element = usize;
        type Error = String;

        fn insert_hidden_text(&self, text: &str) -> Result<usize, String> {
            if self.insert_fails {
                return Err("no body".to_string());
            }
            let mut nodes = self.nodes.borrow_mut();
            nodes.push(text.to_string());
            Ok(nodes.len() - 1)
        }

        fn focus_and_select(&self, _element: &usize) -> Result<(), String> {
            if self.select_fails {
                Err("select threw".to_string())
            } else {
                Ok(())
            }
        }

        fn exec_copy(&self) -> Result<bool, String> {
            match self.exec {
                Step::Ok(value) => Ok(value),
                Step::Throw => Err("execCommand threw".to_string()),
            }
        }

        fn remove(&self, element: &usize) {
            self.nodes.borrow_mut().remove(*element);
        }
    }

    #[test]
    fn reports_success_and_cleans_up() {
        let copier = LegacySelectionCopier::new(FakeDocument::new(Step::Ok(true)));
        assert!(copier.copy_via_selection("hello"));
        assert!(copier.host().nodes.borrow().is_empty());
    }

    #[test]
    fn reports_refusal_and_cleans_up() {
        let copier = LegacySelectionCopier::new(FakeDocument::new(Step::Ok(false)));
        assert!(!copier.copy_via_selection("hello"));
        assert!(copier.host().nodes.borrow().is_empty());
    }

    #[test]
    fn cleans_up_when_copy_command_throws() {
        let copier = LegacySelectionCopier::new(FakeDocument::new(Step::Throw));
        assert!(!copier.copy_via_selection("hello"));
        assert!(copier.host().nodes.borrow().is_empty());
    }

    #[test]
    fn cleans_up_when_select_throws() {
        let mut doc = FakeDocument::new(Step::Ok(true));
        doc.select_fails = true;
        let copier = LegacySelectionCopier::new(doc);
        assert!(!copier.copy_via_selection("hello"));
        assert!(copier.host().nodes.borrow().is_empty());
    }

    #[test]
    fn insert_failure_is_a_plain_miss() {
        let mut doc = FakeDocument::new(Step::Ok(true));
        doc.insert_fails = true;
        let copier = LegacySelectionCopier::new(doc);
        assert!(!copier.copy_via_selection("hello"));
    }
}
