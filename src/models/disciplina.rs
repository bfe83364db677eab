// src/models/disciplina.rs
use serde::{Deserialize, Serialize};

/// Disciplina (matéria) do programa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disciplina {
    pub id: i64,
    pub nome: String,
}

/// Associação muitos-para-muitos entre utilizador e disciplina.
/// Uma única linha responde às duas pesquisas (por user e por disciplina),
/// o que mantém as listas simétricas por construção.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDisciplina {
    pub id: i64,
    #[serde(alias = "userCode")]
    pub codigo_user: String,
    #[serde(alias = "subjectName")]
    pub nome_disciplina: String,
}

/// Payload de criação de uma associação (o backend atribui o id).
#[derive(Debug, Clone, Serialize)]
pub struct NovaAssociacao {
    pub codigo_user: String,
    pub nome_disciplina: String,
}
