//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `page`: A fresh [`PageContext`] with tracing initialized
//! - `doc_tree`: A temporary documentation output tree with an `implementors/` directory
//!
//! [`Recorder`] captures every batch a consumer receives so tests can assert on
//! delivery order.

use rstest::fixture;
use rustdoc_implementors::{Batch, ImplementorRecord, PageContext, TraitId};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

/// A temporary documentation output directory for test isolation.
///
/// Cleaned up automatically when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct DocTree {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl DocTree {
    /// Creates a new tree containing an empty `implementors/` directory.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        std::fs::create_dir_all(root.join("implementors"))
            .expect("Failed to create implementors directory");
        Self { _temp: temp, root }
    }

    /// Returns the root path of the tree.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Returns the `implementors/` directory.
    pub fn implementors(&self) -> PathBuf {
        self.root.join("implementors")
    }

    /// Writes a fragment relative to `implementors/`, creating parent directories.
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn write_fragment(&self, path: &str, content: &str) {
        let full_path = self.implementors().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write fragment '{}': {}", path, e));
    }
}

/// Captures every batch delivered to a consumer, in delivery order.
#[derive(Clone, Default)]
#[allow(dead_code)] // Methods used across different integration test crates
pub struct Recorder {
    seen: Rc<RefCell<Vec<Batch>>>,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A consumer closure that appends to this recorder.
    pub fn consumer(&self) -> impl FnMut(&Batch) + 'static {
        let seen = Rc::clone(&self.seen);
        move |batch: &Batch| seen.borrow_mut().push(batch.clone())
    }

    /// Batches received so far.
    pub fn batches(&self) -> Vec<Batch> {
        self.seen.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.seen.borrow().len()
    }
}

/// Builds a batch for one trait whose records carry the given display texts.
#[allow(dead_code)]
pub fn batch(trait_id: &str, texts: &[&str]) -> Batch {
    let records = texts.iter().map(|text| ImplementorRecord::new(*text)).collect();
    Batch::from([(TraitId::new(trait_id), records)])
}

/// Display texts of a trait's merged sequence.
#[allow(dead_code)]
pub fn merged_texts(page: &PageContext, trait_id: &str) -> Vec<String> {
    page.registry()
        .implementors(trait_id)
        .iter()
        .map(|record| record.display_text.clone())
        .collect()
}

/// Fixture: a fresh page context.
#[fixture]
pub fn page() -> PageContext {
    rustdoc_implementors::tracing::init();
    PageContext::new()
}

/// Fixture: an empty documentation output tree.
#[fixture]
pub fn doc_tree() -> DocTree {
    rustdoc_implementors::tracing::init();
    DocTree::new()
}
