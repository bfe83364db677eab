// src/models/notificacao.rs
use crate::models::ficha::EstadoFicha;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Entrada do badge de notificações. Deriva do espelho local de registos,
/// não de nenhum mecanismo de push; reflete o estado do último reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notificacao {
    pub registo_id: i64,
    pub ficha_id: i64,
    pub estado: EstadoFicha,
    pub data: NaiveDate,
}
