// src/api/validacoes.rs
use crate::{
    api::ApiClient,
    error::AppResult,
    models::validacao::{NovaValidacao, Rejeicao, Validacao},
};

/// POST /validacoes: regista uma aprovação sobre a ficha.
pub async fn aprovar(api: &ApiClient, nova: &NovaValidacao) -> AppResult<Validacao> {
    api.post("/validacoes", nova).await
}

/// POST /validacoes/rejeitar: endpoint dedicado, leva a observação.
pub async fn rejeitar(api: &ApiClient, rejeicao: &Rejeicao) -> AppResult<Validacao> {
    api.post("/validacoes/rejeitar", rejeicao).await
}

pub async fn listar_por_encargado(api: &ApiClient, encargado_id: i64) -> AppResult<Vec<Validacao>> {
    api.get(&format!("/validacoes?encargado={}", encargado_id))
        .await
}
