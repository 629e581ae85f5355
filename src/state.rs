use std::sync::Arc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::config::Config;
use crate::translate::{TranslateFactory, TranslateInterface};
use crate::widget::WidgetStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub translator: Arc<dyn TranslateInterface>,
    /// One widget session per connected client
    pub sessions: Arc<DashMap<String, WidgetStore>>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let translator = TranslateFactory::create_translator(&config.translate)?;
        Ok(Self::with_translator(config, translator))
    }

    /// Build around an existing translator, e.g. a test double
    pub fn with_translator(config: Config, translator: Arc<dyn TranslateInterface>) -> Self {
        Self {
            config,
            translator,
            sessions: Arc::new(DashMap::new()),
        }
    }

    pub fn generate_client_uid(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// Create and register a fresh widget for `client_uid`
    pub fn open_session(&self, client_uid: &str) -> WidgetStore {
        let store = WidgetStore::new(&self.config.translate, self.translator.clone());
        self.sessions.insert(client_uid.to_string(), store.clone());
        store
    }

    pub fn close_session(&self, client_uid: &str) {
        self.sessions.remove(client_uid);
    }

    pub fn session(&self, client_uid: &str) -> Option<WidgetStore> {
        self.sessions.get(client_uid).map(|e| e.value().clone())
    }
}
