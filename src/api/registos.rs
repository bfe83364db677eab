// src/api/registos.rs
use crate::{
    api::ApiClient,
    error::AppResult,
    models::registo::{NovoRegisto, RegistoWire},
};
use chrono::NaiveDate;

/// Lista todos os registos do programa (visão do encargado).
/// Devolve a forma de wire crua; a normalização acontece nos serviços,
/// sempre através de `models::registo::normalizar`.
pub async fn listar(api: &ApiClient) -> AppResult<Vec<RegistoWire>> {
    api.get("/registos").await
}

pub async fn listar_por_user(api: &ApiClient, codigo: &str) -> AppResult<Vec<RegistoWire>> {
    api.get(&format!("/registos?user={}", urlencoding::encode(codigo)))
        .await
}

pub async fn listar_por_user_e_intervalo(
    api: &ApiClient,
    codigo: &str,
    de: NaiveDate,
    ate: NaiveDate,
) -> AppResult<Vec<RegistoWire>> {
    api.get(&format!(
        "/registos?user={}&de={}&ate={}",
        urlencoding::encode(codigo),
        de,
        ate
    ))
    .await
}

pub async fn criar(api: &ApiClient, novo: &NovoRegisto) -> AppResult<RegistoWire> {
    api.post("/registos", novo).await
}

pub async fn atualizar(api: &ApiClient, id: i64, dados: &NovoRegisto) -> AppResult<RegistoWire> {
    api.put(&format!("/registos/{}", id), dados).await
}

pub async fn apagar(api: &ApiClient, id: i64) -> AppResult<()> {
    api.delete(&format!("/registos/{}", id)).await
}
