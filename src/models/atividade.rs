// src/models/atividade.rs
use crate::models::user::Role;
use serde::{Deserialize, Serialize};

/// Categoria de uma atividade, tal como guardada no backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoriaAtividade {
    #[serde(rename = "SOCIAL")]
    Social,
    #[serde(rename = "PAID")]
    Remunerada,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atividade {
    pub id: i64,
    pub nome: String,
    pub categoria: CategoriaAtividade,
}

/// Categoria permitida para um papel, ou None se o papel vê todas.
/// Encargado vê tudo; instrutor não remunerado só atividades sociais;
/// instrutor remunerado só atividades pagas.
pub fn categoria_permitida(role: Role) -> Option<CategoriaAtividade> {
    match role {
        Role::Encargado => None,
        Role::InstrutorNaoRemunerado => Some(CategoriaAtividade::Social),
        Role::InstrutorRemunerado => Some(CategoriaAtividade::Remunerada),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encargado_ve_todas_as_categorias() {
        assert_eq!(categoria_permitida(Role::Encargado), None);
    }

    #[test]
    fn instrutor_nao_remunerado_fica_nas_sociais() {
        assert_eq!(
            categoria_permitida(Role::InstrutorNaoRemunerado),
            Some(CategoriaAtividade::Social)
        );
    }

    #[test]
    fn instrutor_remunerado_fica_nas_pagas() {
        assert_eq!(
            categoria_permitida(Role::InstrutorRemunerado),
            Some(CategoriaAtividade::Remunerada)
        );
    }
}
