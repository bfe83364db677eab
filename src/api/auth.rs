// src/api/auth.rs
use crate::{
    api::ApiClient,
    error::{AppError, AppResult},
    models::user::{Credenciais, TokenClaims},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;

/// Resposta do endpoint de autenticação: token assinado + flag de sucesso.
#[derive(Debug, Deserialize)]
pub struct RespostaLogin {
    pub token: String,
    #[serde(alias = "success")]
    pub sucesso: bool,
}

/// POST /auth/login: troca credenciais por um token bearer.
pub async fn entrar(api: &ApiClient, credenciais: &Credenciais) -> AppResult<RespostaLogin> {
    api.post("/auth/login", credenciais).await
}

/// Descodifica o segmento de payload de um JWT (base64url, sem padding)
/// apenas para extrair o código do utilizador. NÃO verifica a assinatura:
/// o token só é aceite como identidade pelo backend, nunca por nós.
pub fn decodificar_claims(token: &str) -> AppResult<TokenClaims> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| AppError::Sessao("token sem segmento de payload".into()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| AppError::Sessao(format!("payload do token não é base64 válido: {}", e)))?;

    Ok(serde_json::from_slice(&bytes)?)
}
