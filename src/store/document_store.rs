use crate::{context::Credentials, error::FireqlResult, store::{Document, StoreQuery}};

/// Lazy sequence of documents. `None` means the stream is exhausted; an
/// `Err` item is a transport failure reported by the store.
pub type DocumentStream<'a> = Box<dyn Iterator<Item = FireqlResult<Document>> + 'a>;

/// Identity and authentication material for one query execution.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSession {
    pub project_id: String,
    pub credentials: Option<Credentials>,
}

impl StoreSession {
    pub fn new(project_id: impl Into<String>, credentials: Option<Credentials>) -> Self {
        Self { project_id: project_id.into(), credentials }
    }
}

/// A document store able to run filter/sort/limit/select queries.
///
/// Implementations own their connection lifecycle; the query engine only
/// asks for one stream per execution and drains it.
pub trait DocumentStore {
    fn documents(&self, session: &StoreSession, query: &StoreQuery) -> FireqlResult<DocumentStream<'_>>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn documents(&self, session: &StoreSession, query: &StoreQuery) -> FireqlResult<DocumentStream<'_>> {
        (**self).documents(session, query)
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<T> {
    fn documents(&self, session: &StoreSession, query: &StoreQuery) -> FireqlResult<DocumentStream<'_>> {
        (**self).documents(session, query)
    }
}
