// src/state.rs
use crate::{
    api::ApiClient,
    config::AppConfig,
    services::{session_service::SessionManager, validacao_service::Decisor},
    store::LocalStore,
};

/// Raiz da aplicação: é daqui que as vistas recebem (por referência) tudo o
/// que precisam. A sessão é um objeto explícito aqui dentro, nada de estado
/// global ambiente.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub api: ApiClient,
    pub store: LocalStore,
    pub sessao: SessionManager,
    pub decisor: Decisor,
}

impl AppState {
    pub fn nova(config: AppConfig) -> Self {
        let api = ApiClient::nova(&config);
        let store = LocalStore::carregar(&config.storage_path);
        if let Some(token) = &config.token_override {
            tracing::debug!("Token do ambiente em uso; substitui o persistido");
            store.set_token(token);
        }
        Self {
            config,
            api,
            store,
            sessao: SessionManager::nova(),
            decisor: Decisor::novo(),
        }
    }
}
