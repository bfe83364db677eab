// src/api/users.rs
use crate::{
    api::ApiClient,
    error::AppResult,
    models::user::{NovoUser, User},
};

pub async fn listar(api: &ApiClient) -> AppResult<Vec<User>> {
    api.get("/users").await
}

pub async fn buscar(api: &ApiClient, codigo: &str) -> AppResult<User> {
    api.get(&format!("/users/{}", urlencoding::encode(codigo)))
        .await
}

pub async fn criar(api: &ApiClient, novo: &NovoUser) -> AppResult<User> {
    api.post("/users", novo).await
}

pub async fn atualizar(api: &ApiClient, codigo: &str, dados: &NovoUser) -> AppResult<User> {
    api.put(&format!("/users/{}", urlencoding::encode(codigo)), dados)
        .await
}

/// DELETE /users/{codigo}: pode responder 409 se o utilizador ainda tiver
/// associações a disciplinas (ver admin_service para o fluxo de cascata).
pub async fn apagar(api: &ApiClient, codigo: &str) -> AppResult<()> {
    api.delete(&format!("/users/{}", urlencoding::encode(codigo)))
        .await
}
