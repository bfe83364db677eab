// src/services/admin_service.rs
use crate::{
    api::{self, ApiClient},
    error::{AppError, AppResult},
    models::{
        disciplina::{Disciplina, NovaAssociacao, UserDisciplina},
        user::{NovoUser, User},
    },
};
use futures_util::future::try_join_all;

/// Gestão de utilizadores e disciplinas, área exclusiva do encargado.
/// A porta de role fica nas vistas (validacao_service::exigir_encargado);
/// aqui assume-se que o chamador já a passou, e o backend volta a impor.

pub async fn listar_users(api: &ApiClient) -> AppResult<Vec<User>> {
    api::users::listar(api).await
}

pub async fn listar_disciplinas(api: &ApiClient) -> AppResult<Vec<Disciplina>> {
    api::disciplinas::listar(api).await
}

/// Cria o utilizador e, no mesmo passo, as associações às disciplinas
/// escolhidas. Cada associação é uma única linha que responde às pesquisas
/// dos dois lados, por isso as listas ficam simétricas por construção.
pub async fn criar_user(
    api: &ApiClient,
    novo: &NovoUser,
    disciplinas: &[String],
) -> AppResult<User> {
    let user = api::users::criar(api, novo).await?;
    tracing::info!("✅ Utilizador '{}' criado.", user.codigo);

    associar_disciplinas(api, &user.codigo, disciplinas).await?;
    Ok(user)
}

/// Atualiza os dados do utilizador e reconcilia as associações: apaga as que
/// saíram da seleção e cria as novas (delete-então-insere, sem transação
/// porque o backend não oferece uma).
pub async fn atualizar_user(
    api: &ApiClient,
    codigo: &str,
    dados: &NovoUser,
    disciplinas: &[String],
) -> AppResult<User> {
    let user = api::users::atualizar(api, codigo, dados).await?;

    let atuais = api::associacoes::listar_por_user(api, codigo).await?;
    let a_remover: Vec<&UserDisciplina> = atuais
        .iter()
        .filter(|a| !disciplinas.contains(&a.nome_disciplina))
        .collect();
    let a_criar: Vec<&String> = disciplinas
        .iter()
        .filter(|d| !atuais.iter().any(|a| &a.nome_disciplina == *d))
        .collect();

    try_join_all(a_remover.iter().map(|a| api::associacoes::apagar(api, a.id))).await?;
    for nome in a_criar {
        api::associacoes::criar(
            api,
            &NovaAssociacao {
                codigo_user: codigo.to_string(),
                nome_disciplina: nome.clone(),
            },
        )
        .await?;
    }

    tracing::info!("✅ Utilizador '{}' atualizado.", codigo);
    Ok(user)
}

async fn associar_disciplinas(
    api: &ApiClient,
    codigo: &str,
    disciplinas: &[String],
) -> AppResult<()> {
    for nome in disciplinas {
        api::associacoes::criar(
            api,
            &NovaAssociacao {
                codigo_user: codigo.to_string(),
                nome_disciplina: nome.clone(),
            },
        )
        .await?;
    }
    Ok(())
}

/// Apaga um utilizador. Se o backend responder 409 (ainda há associações) e
/// o chamador NÃO tiver confirmado a cascata, o Conflito propaga para a
/// vista perguntar; com confirmação, apagam-se primeiro todas as associações
/// e o delete é repetido uma única vez.
pub async fn apagar_user(api: &ApiClient, codigo: &str, cascata_confirmada: bool) -> AppResult<()> {
    match api::users::apagar(api, codigo).await {
        Ok(()) => {
            tracing::info!("Utilizador '{}' apagado.", codigo);
            Ok(())
        }
        Err(AppError::Conflito) if cascata_confirmada => {
            tracing::info!(
                "Delete de '{}' bloqueado por associações; a apagar em cascata",
                codigo
            );
            let associacoes = api::associacoes::listar_por_user(api, codigo).await?;
            try_join_all(
                associacoes
                    .iter()
                    .map(|a| api::associacoes::apagar(api, a.id)),
            )
            .await?;
            // Uma única repetição; se voltar a falhar, propaga
            api::users::apagar(api, codigo).await?;
            tracing::info!("✅ Utilizador '{}' apagado (com cascata).", codigo);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

pub async fn criar_disciplina(api: &ApiClient, nome: &str) -> AppResult<Disciplina> {
    let disciplina = api::disciplinas::criar(api, nome).await?;
    tracing::info!("✅ Disciplina '{}' criada.", disciplina.nome);
    Ok(disciplina)
}

pub async fn atualizar_disciplina(api: &ApiClient, id: i64, nome: &str) -> AppResult<Disciplina> {
    api::disciplinas::atualizar(api, id, nome).await
}

/// Mesmo fluxo de 409 + cascata do apagar_user, mas do lado da disciplina.
pub async fn apagar_disciplina(
    api: &ApiClient,
    disciplina: &Disciplina,
    cascata_confirmada: bool,
) -> AppResult<()> {
    match api::disciplinas::apagar(api, disciplina.id).await {
        Ok(()) => {
            tracing::info!("Disciplina '{}' apagada.", disciplina.nome);
            Ok(())
        }
        Err(AppError::Conflito) if cascata_confirmada => {
            tracing::info!(
                "Delete de '{}' bloqueado por associações; a apagar em cascata",
                disciplina.nome
            );
            let associacoes =
                api::associacoes::listar_por_disciplina(api, &disciplina.nome).await?;
            try_join_all(
                associacoes
                    .iter()
                    .map(|a| api::associacoes::apagar(api, a.id)),
            )
            .await?;
            api::disciplinas::apagar(api, disciplina.id).await?;
            tracing::info!("✅ Disciplina '{}' apagada (com cascata).", disciplina.nome);
            Ok(())
        }
        Err(e) => Err(e),
    }
}
