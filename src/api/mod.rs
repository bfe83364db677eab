// src/api/mod.rs
pub mod associacoes;
pub mod atividades;
pub mod auth;
pub mod disciplinas;
pub mod fichas;
pub mod registos;
pub mod users;
pub mod validacoes;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
};
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::{Arc, RwLock};

/// Cliente HTTP partilhado por todos os módulos de recurso.
/// Injeta o token bearer em cada pedido e converte estados HTTP em
/// `AppError` num único ponto (401/403 → NaoAutorizado, 404 → NaoEncontrado,
/// 409 → Conflito, resto → Api). Não há retry nem backoff em lado nenhum.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    // Partilhado entre clones (o estado da app e os testes clonam o cliente)
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn nova(config: &AppConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.api_url.clone(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn set_token(&self, token: &str) {
        *self.token.write().expect("lock do token envenenado") = Some(token.to_string());
    }

    pub fn limpar_token(&self) {
        *self.token.write().expect("lock do token envenenado") = None;
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().expect("lock do token envenenado").clone()
    }

    fn url(&self, caminho: &str) -> String {
        format!("{}{}", self.base_url, caminho)
    }

    fn com_token(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Envia o pedido e aplica o mapeamento global de erros.
    async fn enviar(&self, builder: RequestBuilder) -> AppResult<Response> {
        let resposta = self.com_token(builder).send().await?;
        let status = resposta.status();
        if status.is_success() {
            return Ok(resposta);
        }
        // Corpo de erro é texto livre; serve só para a mensagem
        let mensagem = resposta.text().await.unwrap_or_default();
        tracing::debug!("Pedido falhou com {}: {}", status, mensagem);
        Err(AppError::do_status(status.as_u16(), mensagem))
    }

    pub async fn get<T: DeserializeOwned>(&self, caminho: &str) -> AppResult<T> {
        tracing::debug!("GET {}", caminho);
        let resposta = self.enviar(self.http.get(self.url(caminho))).await?;
        Ok(resposta.json().await?)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        caminho: &str,
        corpo: &B,
    ) -> AppResult<T> {
        tracing::debug!("POST {}", caminho);
        let resposta = self
            .enviar(self.http.post(self.url(caminho)).json(corpo))
            .await?;
        Ok(resposta.json().await?)
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        caminho: &str,
        corpo: &B,
    ) -> AppResult<T> {
        tracing::debug!("PUT {}", caminho);
        let resposta = self
            .enviar(self.http.put(self.url(caminho)).json(corpo))
            .await?;
        Ok(resposta.json().await?)
    }

    pub async fn delete(&self, caminho: &str) -> AppResult<()> {
        tracing::debug!("DELETE {}", caminho);
        self.enviar(self.http.delete(self.url(caminho))).await?;
        Ok(())
    }
}
