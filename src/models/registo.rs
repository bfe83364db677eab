// src/models/registo.rs
use crate::models::ficha::EstadoFicha;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Registo de horas tal como chega do backend.
/// O backend mistura snake_case com camelCase conforme o endpoint, e nalguns
/// caminhos devolve ids embrulhados numa lista de um elemento. Este struct
/// aceita todas as variantes conhecidas; a forma canónica é `RegistoHoras`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistoWire {
    pub id: i64,
    #[serde(alias = "date")]
    pub data: NaiveDate,
    #[serde(alias = "horaInicio", alias = "start_time", alias = "startTime")]
    pub hora_inicio: String,
    #[serde(alias = "horaFim", alias = "end_time", alias = "endTime")]
    pub hora_fim: String,
    #[serde(
        alias = "horasEfetivas",
        alias = "effective_hours",
        alias = "effectiveHours"
    )]
    pub horas_efetivas: f64,
    #[serde(alias = "room")]
    pub sala: String,
    #[serde(alias = "subject", alias = "subjectName")]
    pub disciplina: String,
    #[serde(
        alias = "atividadeId",
        alias = "activity_id",
        alias = "activityId",
        deserialize_with = "escalar_ou_primeiro"
    )]
    pub atividade_id: i64,
    #[serde(
        alias = "fichaId",
        alias = "form_id",
        alias = "formId",
        deserialize_with = "escalar_ou_primeiro"
    )]
    pub ficha_id: i64,
    // Alguns endpoints devolvem o estado da ficha já junto ao registo;
    // NUNCA é usado diretamente, só como fallback em derivar_estado.
    #[serde(default, alias = "state")]
    pub estado: Option<EstadoFicha>,
}

/// Forma canónica de um registo de horas, depois da normalização.
/// `estado` é sempre derivado da ficha dona (ver `normalizar`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistoHoras {
    pub id: i64,
    pub data: NaiveDate,
    pub hora_inicio: String,
    pub hora_fim: String,
    pub horas_efetivas: f64,
    pub sala: String,
    pub disciplina: String,
    pub atividade_id: i64,
    pub ficha_id: i64,
    pub estado: EstadoFicha,
}

/// Payload de criação de um registo novo.
#[derive(Debug, Clone, Serialize)]
pub struct NovoRegisto {
    pub data: NaiveDate,
    pub hora_inicio: String,
    pub hora_fim: String,
    pub horas_efetivas: f64,
    pub sala: String,
    pub disciplina: String,
    pub atividade_id: i64,
    pub ficha_id: i64,
}

/// Aceita tanto um escalar como uma lista de um elemento (variante que
/// certos endpoints do backend devolvem para ids).
fn escalar_ou_primeiro<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum UmOuLista {
        Um(i64),
        Lista(Vec<i64>),
    }

    match UmOuLista::deserialize(deserializer)? {
        UmOuLista::Um(v) => Ok(v),
        UmOuLista::Lista(v) => v
            .into_iter()
            .next()
            .ok_or_else(|| serde::de::Error::custom("lista de ids vazia")),
    }
}

/// Deriva o estado exibido de um registo: o estado da ficha dona manda;
/// na falta dela, usa-se o estado que o backend embutiu no registo;
/// sem nenhum dos dois, assume-se Pendente (e fica um aviso no log).
pub fn derivar_estado(
    ficha_id: i64,
    embutido: Option<EstadoFicha>,
    fichas: &HashMap<i64, EstadoFicha>,
) -> EstadoFicha {
    if let Some(estado) = fichas.get(&ficha_id) {
        return *estado;
    }
    if let Some(estado) = embutido {
        return estado;
    }
    tracing::warn!(
        "Ficha {} desconhecida e sem estado embutido; assumindo Pendente",
        ficha_id
    );
    EstadoFicha::Pendente
}

/// Normalização única na fronteira de dados (os serviços nunca veem
/// `RegistoWire` nem adivinham nomes de campos).
pub fn normalizar(wire: RegistoWire, fichas: &HashMap<i64, EstadoFicha>) -> RegistoHoras {
    let estado = derivar_estado(wire.ficha_id, wire.estado, fichas);
    RegistoHoras {
        id: wire.id,
        data: wire.data,
        hora_inicio: wire.hora_inicio,
        hora_fim: wire.hora_fim,
        horas_efetivas: wire.horas_efetivas,
        sala: wire.sala,
        disciplina: wire.disciplina,
        atividade_id: wire.atividade_id,
        ficha_id: wire.ficha_id,
        estado,
    }
}

pub fn normalizar_todos(
    wires: Vec<RegistoWire>,
    fichas: &HashMap<i64, EstadoFicha>,
) -> Vec<RegistoHoras> {
    wires.into_iter().map(|w| normalizar(w, fichas)).collect()
}
