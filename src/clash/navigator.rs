//! Selection and cyclic navigation over a fetched clash collection.

use super::{Clash, ClashId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Owns the current clash collection and the single "current" pointer.
///
/// The collection is replaced wholesale on every fetch and the selection is
/// reset whenever that happens, so a clash from a superseded fetch is never
/// left selected.
#[derive(Debug, Clone)]
pub struct ClashNavigator {
    clashes: Arc<[Clash]>,
    current: Option<Clash>,
}

impl ClashNavigator {
    pub fn new() -> Self {
        Self {
            clashes: Arc::from(Vec::<Clash>::new()),
            current: None,
        }
    }

    /// Replace the collection. Always clears the selection.
    pub fn set_collection(&mut self, clashes: impl Into<Arc<[Clash]>>) {
        self.clashes = clashes.into();
        self.current = None;
        debug!("🗂️ Clash collection replaced ({} clashes)", self.clashes.len());
    }

    pub fn clashes(&self) -> &[Clash] {
        &self.clashes
    }

    pub fn current(&self) -> Option<&Clash> {
        self.current.as_ref()
    }

    /// Select a clash without checking that it belongs to the collection.
    pub fn select(&mut self, clash: Clash) {
        if !self.contains(clash.id) {
            debug!("🗂️ Selecting clash {} outside the current collection", clash.id);
        }
        self.set_current(Some(clash));
    }

    pub fn unselect(&mut self) {
        self.set_current(None);
    }

    pub fn contains(&self, id: ClashId) -> bool {
        self.clashes.iter().any(|clash| clash.id == id)
    }

    /// Position of the current selection in the collection, matched by id.
    /// A selection that is not part of the collection has no index.
    pub fn current_index(&self) -> Option<usize> {
        let current = self.current.as_ref()?;
        self.clashes.iter().position(|clash| clash.id == current.id)
    }

    /// Advance to the following clash, wrapping to the first one.
    pub fn next(&mut self) {
        self.step(1);
    }

    /// Go back to the preceding clash, wrapping to the last one.
    pub fn previous(&mut self) {
        self.step(-1);
    }

    /// Move the selection by `offset` positions with wraparound.
    ///
    /// Without a (known) selection, a forward step lands on the first clash
    /// and a backward step on the last one. On an empty collection the
    /// selection is cleared.
    pub fn step(&mut self, offset: isize) {
        let len = self.clashes.len();
        if len == 0 {
            self.set_current(None);
            return;
        }

        let index = match self.current_index() {
            None if offset < 0 => len - 1,
            None => 0,
            Some(index) => {
                // Reduce first so the sum stays below 2 * len
                let offset = offset.rem_euclid(len as isize) as usize;
                (index + offset) % len
            }
        };
        self.set_current(Some(self.clashes[index].clone()));
    }

    /// Select the clash whose first schedule entry starts earliest. Ties go
    /// to the clash that comes first in the collection. Clashes without any
    /// schedule entry are skipped.
    pub fn select_nearest(&mut self) {
        let mut nearest: Option<(&Clash, i64)> = None;
        for clash in self.clashes.iter() {
            let start_time = match clash.first_start_time() {
                Ok(start_time) => start_time,
                Err(e) => {
                    warn!("⚠️ Skipping clash in nearest selection: {}", e);
                    continue;
                }
            };
            match nearest {
                Some((_, best)) if best <= start_time => {}
                _ => nearest = Some((clash, start_time)),
            }
        }

        let nearest = nearest.map(|(clash, _)| clash.clone());
        self.set_current(nearest);
    }

    fn set_current(&mut self, clash: Option<Clash>) {
        match &clash {
            Some(clash) => debug!("🗂️ Current clash: {}", clash),
            None => debug!("🗂️ Current clash cleared"),
        }
        self.current = clash;
    }
}

impl Default for ClashNavigator {
    fn default() -> Self {
        Self::new()
    }
}
