// src/models/ficha.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Estado de uma ficha (envelope de submissão).
/// Os registos de horas herdam SEMPRE este estado, nunca guardam o seu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoFicha {
    #[serde(rename = "PENDING")]
    Pendente,
    #[serde(rename = "APPROVED")]
    Aprovada,
    #[serde(rename = "REJECTED")]
    Rejeitada,
}

impl Default for EstadoFicha {
    fn default() -> Self {
        EstadoFicha::Pendente
    }
}

/// Ficha: agrega os registos em curso de um utilizador até à decisão do
/// encargado. Criada de forma preguiçosa na primeira submissão.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ficha {
    pub id: i64,
    #[serde(alias = "creationDate", alias = "data_criacao")]
    pub data_criacao: NaiveDate,
    #[serde(alias = "state")]
    pub estado: EstadoFicha,
    #[serde(alias = "userCode", alias = "codigo_user")]
    pub codigo_user: String,
}

/// Payload de criação de uma ficha nova (estado inicial é sempre Pendente).
#[derive(Debug, Clone, Serialize)]
pub struct NovaFicha {
    pub codigo_user: String,
    pub data_criacao: NaiveDate,
}
