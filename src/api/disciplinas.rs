// src/api/disciplinas.rs
use crate::{api::ApiClient, error::AppResult, models::disciplina::Disciplina};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct NovaDisciplina {
    pub nome: String,
}

pub async fn listar(api: &ApiClient) -> AppResult<Vec<Disciplina>> {
    api.get("/disciplinas").await
}

pub async fn criar(api: &ApiClient, nome: &str) -> AppResult<Disciplina> {
    api.post(
        "/disciplinas",
        &NovaDisciplina {
            nome: nome.to_string(),
        },
    )
    .await
}

pub async fn atualizar(api: &ApiClient, id: i64, nome: &str) -> AppResult<Disciplina> {
    api.put(
        &format!("/disciplinas/{}", id),
        &NovaDisciplina {
            nome: nome.to_string(),
        },
    )
    .await
}

/// DELETE /disciplinas/{id}: 409 se ainda existirem associações.
pub async fn apagar(api: &ApiClient, id: i64) -> AppResult<()> {
    api.delete(&format!("/disciplinas/{}", id)).await
}
