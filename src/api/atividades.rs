// src/api/atividades.rs
use crate::{
    api::ApiClient,
    error::AppResult,
    models::atividade::{Atividade, CategoriaAtividade},
};

pub async fn listar(api: &ApiClient) -> AppResult<Vec<Atividade>> {
    api.get("/atividades").await
}

pub async fn listar_por_categoria(
    api: &ApiClient,
    categoria: CategoriaAtividade,
) -> AppResult<Vec<Atividade>> {
    let etiqueta = match categoria {
        CategoriaAtividade::Social => "SOCIAL",
        CategoriaAtividade::Remunerada => "PAID",
    };
    api.get(&format!("/atividades?categoria={}", etiqueta)).await
}
