// src/models/validacao.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Resultado de uma decisão do encargado sobre uma ficha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultadoValidacao {
    #[serde(rename = "APPROVED")]
    Aprovada,
    #[serde(rename = "REJECTED")]
    Rejeitada,
}

/// Validação: um evento de decisão. Aprovar/rejeitar opera sobre a FICHA e
/// propaga-se conceptualmente aos registos que ela agrega.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Validacao {
    pub id: i64,
    #[serde(alias = "formId")]
    pub ficha_id: i64,
    #[serde(alias = "supervisorId")]
    pub encargado_id: i64,
    pub data: NaiveDate,
    #[serde(alias = "outcome")]
    pub resultado: ResultadoValidacao,
    #[serde(default, alias = "remark")]
    pub observacao: Option<String>,
}

/// Payload de aprovação.
#[derive(Debug, Clone, Serialize)]
pub struct NovaValidacao {
    pub ficha_id: i64,
    pub encargado_id: i64,
    pub data: NaiveDate,
}

/// Payload de rejeição (endpoint dedicado, leva observação em texto livre).
#[derive(Debug, Clone, Serialize)]
pub struct Rejeicao {
    pub ficha_id: i64,
    pub encargado_id: i64,
    pub data: NaiveDate,
    pub observacao: String,
}
