// src/config.rs
use crate::error::AppResult;
use std::{env, path::PathBuf};

/// Configuração da aplicação, lida do ambiente (.env via dotenvy no main).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// URL base do backend REST (ex: http://localhost:8080/api)
    pub api_url: String,
    /// Caminho do ficheiro de estado local (token, espelho de registos, etc.)
    pub storage_path: PathBuf,
    /// Token fixo vindo do ambiente. Quando presente, tem precedência sobre
    /// o token persistido no estado local (útil para scripts e depuração).
    pub token_override: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let api_url = env::var("REHOSAR_API_URL")?;
        // O armazenamento local é opcional; por omissão fica junto ao binário
        let storage_path = env::var("REHOSAR_STORAGE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("rehosar_local.json"));
        let token_override = env::var("REHOSAR_TOKEN").ok().filter(|t| !t.is_empty());

        // Normaliza a URL (sem barra final, para facilitar a concatenação)
        let api_url = api_url.trim_end_matches('/').to_string();

        tracing::debug!("Configuração carregada: api_url={}", api_url);
        Ok(Self {
            api_url,
            storage_path,
            token_override,
        })
    }
}
