// src/api/associacoes.rs
use crate::{
    api::ApiClient,
    error::AppResult,
    models::disciplina::{NovaAssociacao, UserDisciplina},
};

pub async fn criar(api: &ApiClient, nova: &NovaAssociacao) -> AppResult<UserDisciplina> {
    api.post("/associacoes", nova).await
}

pub async fn apagar(api: &ApiClient, id: i64) -> AppResult<()> {
    api.delete(&format!("/associacoes/{}", id)).await
}

pub async fn listar_por_user(api: &ApiClient, codigo: &str) -> AppResult<Vec<UserDisciplina>> {
    api.get(&format!("/associacoes?user={}", urlencoding::encode(codigo)))
        .await
}

pub async fn listar_por_disciplina(
    api: &ApiClient,
    nome: &str,
) -> AppResult<Vec<UserDisciplina>> {
    api.get(&format!(
        "/associacoes?disciplina={}",
        urlencoding::encode(nome)
    ))
    .await
}
