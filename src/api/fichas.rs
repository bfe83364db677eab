// src/api/fichas.rs
use crate::{
    api::ApiClient,
    error::AppResult,
    models::ficha::{Ficha, NovaFicha},
};

/// Lista TODAS as fichas do programa (caminho do encargado; é daqui que sai
/// o mapa ficha → estado usado na derivação do estado dos registos).
pub async fn listar(api: &ApiClient) -> AppResult<Vec<Ficha>> {
    api.get("/fichas").await
}

pub async fn buscar(api: &ApiClient, id: i64) -> AppResult<Ficha> {
    api.get(&format!("/fichas/{}", id)).await
}

pub async fn listar_por_user(api: &ApiClient, codigo: &str) -> AppResult<Vec<Ficha>> {
    api.get(&format!("/fichas?user={}", urlencoding::encode(codigo)))
        .await
}

pub async fn criar(api: &ApiClient, nova: &NovaFicha) -> AppResult<Ficha> {
    api.post("/fichas", nova).await
}
