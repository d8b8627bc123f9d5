use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};

use super::{Font, FontSource};
use crate::error::FontLoadError;

/// A font fetch that any number of waiters can await.
pub type FontFuture = Shared<LocalBoxFuture<'static, Result<Rc<Font>, FontLoadError>>>;

/// Per-identifier font cache.
///
/// Each identifier is fetched at most once: the first request starts the
/// fetch and every later request, even one made while the fetch is still in
/// flight, shares it. A failed fetch is not served again: the next request
/// for that identifier replaces it with a fresh fetch.
pub struct FontCache {
    source: Box<dyn FontSource>,
    entries: HashMap<String, FontFuture>,
}

impl FontCache {
    pub fn new(source: impl FontSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            entries: HashMap::new(),
        }
    }

    /// Shared fetch of font `id`, started on first use
    pub fn get(&mut self, id: &str) -> FontFuture {
        if let Some(entry) = self.entries.get(id) {
            if !Self::is_failed(entry) {
                return entry.clone();
            }
            log::debug!("font {id}: previous fetch failed, fetching again");
        }

        log::info!("loading font {id}");
        let name = id.to_string();
        let future = self
            .source
            .load(id)
            .map(move |result| {
                if result.is_ok() {
                    log::info!("font {name} loaded");
                }
                result.map(Rc::new)
            })
            .boxed_local()
            .shared();
        self.entries.insert(id.to_string(), future.clone());
        future
    }

    /// The font if its fetch has already completed successfully
    pub fn loaded(&self, id: &str) -> Option<Rc<Font>> {
        match self.entries.get(id)?.peek() {
            Some(Ok(font)) => Some(Rc::clone(font)),
            _ => None,
        }
    }

    fn is_failed(entry: &FontFuture) -> bool {
        matches!(entry.peek(), Some(Err(_)))
    }

    /// Fonts loaded or still in flight; failed fetches do not count
    pub fn len(&self) -> usize {
        self.entries.values().filter(|entry| !Self::is_failed(entry)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every cached font, e.g. when the display session ends
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for FontCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontCache")
            .field("fonts", &self.entries.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
