// src/models/user.rs
use serde::{Deserialize, Serialize};

/// Papéis reconhecidos pelo backend.
/// O valor legado "INSTRUCTOR_NORMAL" ainda aparece em contas antigas e é
/// tratado como instrutor não remunerado (atividades sociais).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ENCARGADO")]
    Encargado,
    #[serde(rename = "INSTRUCTOR_UNPAID", alias = "INSTRUCTOR_NORMAL")]
    InstrutorNaoRemunerado,
    #[serde(rename = "INSTRUCTOR_PAID")]
    InstrutorRemunerado,
}

impl Role {
    pub fn e_encargado(&self) -> bool {
        matches!(self, Role::Encargado)
    }
}

/// Utilizador tal como devolvido pelo backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub codigo: String,
    pub nome: String,
    pub apelido: String,
    pub email: String,
    pub role: Role,
}

/// Dados para criar/atualizar um utilizador (área do encargado).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovoUser {
    pub codigo: String,
    pub nome: String,
    pub apelido: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

/// Credenciais do formulário de login.
#[derive(Debug, Clone, Serialize)]
pub struct Credenciais {
    pub codigo: String,
    pub password: String,
}

/// Payload do token JWT, descodificado SEM verificação de assinatura.
/// Só precisamos do código do utilizador para buscar o perfil completo;
/// a verificação real é responsabilidade do backend.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    #[serde(alias = "codigo")]
    pub sub: String,
}
