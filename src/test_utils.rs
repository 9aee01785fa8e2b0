//! Shared test utilities: a scripted fake gateway and canned cascade data.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::watch;

use crate::gateway::{GatewayInterpreter, GatewayRequest, GatewayResponse};
use crate::types::{CollectionItem, LeafContent, SubCollectionItem};

/// Canned book list: Genesis (3 chapters) and Exodus (2 chapters).
pub fn bible_books() -> Vec<CollectionItem> {
    vec![
        CollectionItem::new("exodus", "Exodus"),
        CollectionItem::new("genesis", "Genesis"),
    ]
}

/// Canned chapters for a book.
pub fn bible_chapters(book: &str, count: u32) -> Vec<SubCollectionItem> {
    (1..=count)
        .map(|n| SubCollectionItem::new(format!("{}-{}", book, n), n, book))
        .collect()
}

/// A scripted in-memory gateway.
///
/// Supports per-parent holds (the call blocks until released, for
/// supersession tests) and per-action scripted failures.
pub struct FakeGateway {
    books: Vec<CollectionItem>,
    chapters: HashMap<String, Vec<SubCollectionItem>>,
    contents: HashMap<String, LeafContent>,
    failures: Mutex<HashMap<&'static str, String>>,
    holds: Mutex<HashMap<String, watch::Receiver<bool>>>,
}

impl FakeGateway {
    /// A gateway serving the canned bible data.
    pub fn bible() -> Self {
        let mut chapters = HashMap::new();
        chapters.insert("genesis".to_string(), bible_chapters("genesis", 3));
        chapters.insert("exodus".to_string(), bible_chapters("exodus", 2));

        let mut contents = HashMap::new();
        for (book, title) in [("genesis", "Genesis"), ("exodus", "Exodus")] {
            for chapter in chapters[book].iter() {
                contents.insert(
                    chapter.id.as_str().to_string(),
                    LeafContent::new(
                        chapter.id.clone(),
                        format!("<p>{} {}</p>", title, chapter.ordinal),
                        format!("{} {}", title, chapter.ordinal),
                        "KJV",
                    ),
                );
            }
        }

        FakeGateway {
            books: bible_books(),
            chapters,
            contents,
            failures: Mutex::new(HashMap::new()),
            holds: Mutex::new(HashMap::new()),
        }
    }

    /// Scripts the named action to fail with `message` until cleared.
    pub fn fail_action(&self, action: &'static str, message: impl Into<String>) {
        self.failures.lock().unwrap().insert(action, message.into());
    }

    /// Clears a scripted failure.
    pub fn clear_failure(&self, action: &'static str) {
        self.failures.lock().unwrap().remove(action);
    }

    /// Holds every call issued for `parent_label` until the returned sender
    /// is flipped to `true` (or dropped).
    pub fn hold(&self, parent_label: &str) -> watch::Sender<bool> {
        let (tx, rx) = watch::channel(false);
        self.holds
            .lock()
            .unwrap()
            .insert(parent_label.to_string(), rx);
        tx
    }
}

impl GatewayInterpreter for FakeGateway {
    type Error = String;

    async fn interpret(&self, request: GatewayRequest) -> Result<GatewayResponse, String> {
        let hold = self
            .holds
            .lock()
            .unwrap()
            .get(request.parent_label())
            .cloned();
        if let Some(mut gate) = hold {
            // Released either by flipping to true or by dropping the sender.
            let _ = gate.wait_for(|released| *released).await;
        }

        if let Some(message) = self.failures.lock().unwrap().get(request.action()) {
            return Err(message.clone());
        }

        match request {
            GatewayRequest::CollectionItems { .. } => {
                Ok(GatewayResponse::CollectionItems(self.books.clone()))
            }
            GatewayRequest::SubCollectionItems { parent } => Ok(
                GatewayResponse::SubCollectionItems(
                    self.chapters.get(parent.as_str()).cloned().unwrap_or_default(),
                ),
            ),
            GatewayRequest::LeafContent { id } => self
                .contents
                .get(id.as_str())
                .cloned()
                .map(GatewayResponse::LeafContent)
                .ok_or_else(|| format!("no content for {}", id)),
        }
    }
}
