// src/services/validacao_service.rs
use crate::{
    api::{self, ApiClient},
    error::{AppError, AppResult},
    models::{
        atividade::Atividade,
        disciplina::Disciplina,
        ficha::EstadoFicha,
        registo::{self, RegistoHoras},
        user::User,
        validacao::{NovaValidacao, Rejeicao, ResultadoValidacao, Validacao},
    },
    store::LocalStore,
};
use chrono::Local;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Tamanho fixo de página da tabela de pendentes (a paginação é toda do
/// lado do cliente).
pub const TAMANHO_PAGINA: usize = 15;

/// Linha da vista de validação: registo canónico + dados juntados das outras
/// listagens (nome do instrutor, atividade).
#[derive(Debug, Clone)]
pub struct RegistoPendente {
    pub registo: RegistoHoras,
    pub codigo_user: String,
    pub nome_user: String,
    pub atividade: String,
}

/// Resultado completo do carregamento da vista: linhas pendentes + catálogo
/// de disciplinas (a vista usa-o para o seletor de filtro).
#[derive(Debug, Clone)]
pub struct VistaPendentes {
    pub linhas: Vec<RegistoPendente>,
    pub disciplinas: Vec<Disciplina>,
}

/// Confere que a vista de validação só é montada por um encargado.
/// Porta do lado do cliente, não fronteira de segurança: o backend volta a
/// impor a regra em cada mutação.
pub fn exigir_encargado(user: &User) -> AppResult<()> {
    if user.role.e_encargado() {
        Ok(())
    } else {
        tracing::warn!(
            "Acesso à validação negado para {} (role {:?})",
            user.codigo,
            user.role
        );
        Err(AppError::AcessoNegado)
    }
}

/// Carrega a lista de pendentes para o encargado: busca em paralelo os
/// registos, fichas, utilizadores, disciplinas e atividades (uma falha
/// qualquer falha o conjunto, não há fallback parcial), normaliza tudo numa
/// passagem e filtra os registos com estado derivado Pendente.
pub async fn carregar_pendentes(
    api: &ApiClient,
    store: &LocalStore,
    encargado: &User,
    filtro: Option<&str>,
) -> AppResult<VistaPendentes> {
    exigir_encargado(encargado)?;

    let (wires, fichas, users, disciplinas, atividades) = tokio::try_join!(
        api::registos::listar(api),
        api::fichas::listar(api),
        api::users::listar(api),
        api::disciplinas::listar(api),
        api::atividades::listar(api),
    )?;

    let estados: HashMap<i64, EstadoFicha> =
        fichas.iter().map(|f| (f.id, f.estado)).collect();
    let donos: HashMap<i64, &str> = fichas
        .iter()
        .map(|f| (f.id, f.codigo_user.as_str()))
        .collect();
    let nomes: HashMap<&str, &User> = users.iter().map(|u| (u.codigo.as_str(), u)).collect();
    let nomes_atividades: HashMap<i64, &Atividade> =
        atividades.iter().map(|a| (a.id, a)).collect();

    let registos = registo::normalizar_todos(wires, &estados);

    // O badge do encargado alimenta-se deste espelho (visão do programa todo)
    store.substituir_espelho(registos.clone());

    let filtro = filtro.map(str::trim).filter(|f| !f.is_empty());
    let mut pendentes: Vec<RegistoPendente> = registos
        .into_iter()
        .filter(|r| r.estado == EstadoFicha::Pendente)
        .filter_map(|r| {
            let codigo = donos.get(&r.ficha_id).copied().unwrap_or_default();
            if let Some(f) = filtro {
                if !codigo.contains(f) {
                    return None;
                }
            }
            let nome_user = nomes
                .get(codigo)
                .map(|u| format!("{} {}", u.nome, u.apelido))
                .unwrap_or_else(|| "(desconhecido)".to_string());
            let atividade = nomes_atividades
                .get(&r.atividade_id)
                .map(|a| a.nome.clone())
                .unwrap_or_else(|| "(sem atividade)".to_string());
            Some(RegistoPendente {
                codigo_user: codigo.to_string(),
                nome_user,
                atividade,
                registo: r,
            })
        })
        .collect();

    // Ordem determinística para a paginação ser estável entre reloads
    pendentes.sort_by_key(|p| (p.registo.data, p.registo.id));

    tracing::debug!("{} registos pendentes carregados", pendentes.len());
    Ok(VistaPendentes {
        linhas: pendentes,
        disciplinas,
    })
}

/// Resultado do recorte de uma página.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginacao {
    pub pagina: usize,
    pub total_paginas: usize,
    pub total_itens: usize,
}

/// Recorta a página pedida do conjunto filtrado. Páginas fora do intervalo
/// são encostadas a [1, total_paginas]; com zero itens fica a página 1 vazia.
pub fn paginar<T>(itens: &[T], pagina: usize) -> (&[T], Paginacao) {
    let total_itens = itens.len();
    let total_paginas = total_itens.div_ceil(TAMANHO_PAGINA).max(1);
    let pagina = pagina.clamp(1, total_paginas);

    let inicio = (pagina - 1) * TAMANHO_PAGINA;
    let fim = (inicio + TAMANHO_PAGINA).min(total_itens);
    let recorte = if inicio < total_itens {
        &itens[inicio..fim]
    } else {
        &[]
    };

    (
        recorte,
        Paginacao {
            pagina,
            total_paginas,
            total_itens,
        },
    )
}

/// Guarda das decisões em curso: enquanto a decisão de um registo está em
/// voo, novas decisões sobre ESSE registo são ignoradas; os outros registos
/// continuam livres (não há lock global da tabela).
#[derive(Clone, Default)]
pub struct Decisor {
    em_curso: Arc<Mutex<HashSet<i64>>>,
}

impl Decisor {
    pub fn novo() -> Self {
        Self::default()
    }

    fn reservar(&self, registo_id: i64) -> bool {
        self.em_curso
            .lock()
            .expect("lock do decisor envenenado")
            .insert(registo_id)
    }

    fn libertar(&self, registo_id: i64) {
        self.em_curso
            .lock()
            .expect("lock do decisor envenenado")
            .remove(&registo_id);
    }

    /// Aplica a decisão do encargado à ficha do registo. Devolve `false` se
    /// já havia uma decisão em voo para este registo (pedido ignorado).
    /// Em ambos os desfechos NÃO há mutação otimista: o chamador recarrega a
    /// lista completa a seguir, para o estado derivado vir da fonte de
    /// verdade.
    pub async fn decidir(
        &self,
        api: &ApiClient,
        encargado: &User,
        pendente: &RegistoPendente,
        resultado: ResultadoValidacao,
        observacao: Option<String>,
    ) -> AppResult<Option<Validacao>> {
        exigir_encargado(encargado)?;

        let registo_id = pendente.registo.id;
        if !self.reservar(registo_id) {
            tracing::warn!("Decisão já em curso para o registo {}; ignorado", registo_id);
            return Ok(None);
        }

        let resultado_envio = match resultado {
            ResultadoValidacao::Aprovada => {
                api::validacoes::aprovar(
                    api,
                    &NovaValidacao {
                        ficha_id: pendente.registo.ficha_id,
                        encargado_id: encargado.id,
                        data: Local::now().date_naive(),
                    },
                )
                .await
            }
            ResultadoValidacao::Rejeitada => {
                api::validacoes::rejeitar(
                    api,
                    &Rejeicao {
                        ficha_id: pendente.registo.ficha_id,
                        encargado_id: encargado.id,
                        data: Local::now().date_naive(),
                        observacao: observacao.unwrap_or_default(),
                    },
                )
                .await
            }
        };
        self.libertar(registo_id);

        let validacao = resultado_envio?;
        tracing::info!(
            "✅ Ficha {} {:?} pelo encargado {}",
            pendente.registo.ficha_id,
            resultado,
            encargado.codigo
        );
        Ok(Some(validacao))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dezasseis_itens_dao_duas_paginas() {
        let itens: Vec<i64> = (1..=16).collect();

        let (pagina1, info1) = paginar(&itens, 1);
        assert_eq!(pagina1.len(), 15);
        assert_eq!(info1.total_paginas, 2);

        let (pagina2, info2) = paginar(&itens, 2);
        assert_eq!(pagina2.len(), 1);
        assert_eq!(info2.pagina, 2);
    }

    #[test]
    fn pagina_fora_do_intervalo_encosta() {
        let itens: Vec<i64> = (1..=16).collect();

        // Página 3 não existe: encosta à 2
        let (recorte, info) = paginar(&itens, 3);
        assert_eq!(info.pagina, 2);
        assert_eq!(recorte.len(), 1);

        // Página 0 encosta à 1
        let (recorte, info) = paginar(&itens, 0);
        assert_eq!(info.pagina, 1);
        assert_eq!(recorte.len(), 15);
    }

    #[test]
    fn lista_vazia_fica_na_pagina_um() {
        let itens: Vec<i64> = Vec::new();
        let (recorte, info) = paginar(&itens, 7);
        assert!(recorte.is_empty());
        assert_eq!(info.pagina, 1);
        assert_eq!(info.total_paginas, 1);
    }

    #[test]
    fn gate_recusa_nao_encargado() {
        use crate::models::user::{Role, User};
        let instrutor = User {
            id: 2,
            codigo: "u200".into(),
            nome: "Rui".into(),
            apelido: "Costa".into(),
            email: "rui@exemplo.pt".into(),
            role: Role::InstrutorNaoRemunerado,
        };
        assert!(matches!(
            exigir_encargado(&instrutor),
            Err(AppError::AcessoNegado)
        ));
    }
}
