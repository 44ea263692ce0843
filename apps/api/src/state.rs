use std::sync::Arc;

use crate::config::Config;
use crate::domain::repositories::{Collection, Document, DocumentStore};
use crate::infrastructure::atlas::ClusterProvisioner;
use crate::infrastructure::email::{self, EmailMessage, Notifier};
use crate::infrastructure::llm::TextGenerator;
use crate::infrastructure::HTTP_TIMEOUT;

/// Shared application state handed to every handler
///
/// Cheap to clone; everything lives behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DocumentStore>,
    pub notifier: Arc<dyn Notifier>,
    pub llm: Option<Arc<dyn TextGenerator>>,
    pub provisioner: Option<Arc<dyn ClusterProvisioner>>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            notifier,
            llm: None,
            provisioner: None,
        }
    }

    pub fn with_llm(mut self, llm: Arc<dyn TextGenerator>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_provisioner(mut self, provisioner: Arc<dyn ClusterProvisioner>) -> Self {
        self.provisioner = Some(provisioner);
        self
    }

    /// Typed access to one collection of the store
    pub fn collection<T: Document>(&self) -> Collection<T> {
        Collection::new(Arc::clone(&self.store))
    }

    /// Sends an email; delivery failures and timeouts are logged, never returned
    pub async fn notify(&self, message: EmailMessage) {
        email::dispatch(self.notifier.as_ref(), message, HTTP_TIMEOUT).await;
    }
}
