// src/cli.rs
//
// As "vistas" de terminal da aplicação: cada função compõe os serviços tal
// como as vistas do browser compunham os resource clients. Rendering é texto
// simples; a lógica (filtros, paginação, confirmação de cascata) vive nos
// serviços.
use crate::{
    error::{AppError, AppResult},
    models::{
        atividade,
        ficha::EstadoFicha,
        user::{Credenciais, NovoUser, Role, User},
        validacao::ResultadoValidacao,
    },
    services::{
        admin_service, notificacao_service, registo_service, registo_service::CamposRegisto,
        validacao_service,
    },
    state::AppState,
    store::Atualidade,
};
use chrono::NaiveDate;
use std::io::{self, BufRead, Write};

/// Obtém o utilizador autenticado ou falha com um erro de sessão.
fn exigir_sessao(state: &AppState) -> AppResult<User> {
    state
        .sessao
        .user_atual()
        .ok_or_else(|| AppError::Sessao("nenhuma sessão ativa; use 'entrar' primeiro".into()))
}

/// Pergunta sim/não no terminal (usada na confirmação da cascata de 409).
fn confirmar(pergunta: &str) -> bool {
    print!("{} [s/N] ", pergunta);
    let _ = io::stdout().flush();
    let mut linha = String::new();
    if io::stdin().lock().read_line(&mut linha).is_err() {
        return false;
    }
    matches!(linha.trim(), "s" | "S" | "sim")
}

fn parse_data(texto: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(texto, "%Y-%m-%d")
        .map_err(|_| AppError::Uso(format!("data inválida (esperado AAAA-MM-DD): {}", texto)))
}

// --- Sessão ---

pub async fn ver_entrar(state: &AppState, codigo: &str, password: &str) -> AppResult<()> {
    let user = state
        .sessao
        .entrar(
            &state.api,
            &state.store,
            &Credenciais {
                codigo: codigo.to_string(),
                password: password.to_string(),
            },
        )
        .await?;
    println!("Sessão iniciada: {} {} ({:?})", user.nome, user.apelido, user.role);
    Ok(())
}

pub fn ver_sair(state: &AppState) {
    state.sessao.sair(&state.api, &state.store);
    println!("Sessão terminada.");
}

/// Edição da própria conta. As associações a disciplinas ficam como estão;
/// no fim, o perfil novo é publicado aos subscritores da sessão.
pub async fn ver_perfil(
    state: &AppState,
    nome: &str,
    apelido: &str,
    email: &str,
    password: &str,
) -> AppResult<()> {
    let atual = exigir_sessao(state)?;
    let disciplinas: Vec<String> =
        crate::api::associacoes::listar_por_user(&state.api, &atual.codigo)
            .await?
            .into_iter()
            .map(|a| a.nome_disciplina)
            .collect();
    let dados = NovoUser {
        codigo: atual.codigo.clone(),
        nome: nome.to_string(),
        apelido: apelido.to_string(),
        email: email.to_string(),
        role: atual.role,
        password: password.to_string(),
    };
    let user = admin_service::atualizar_user(&state.api, &atual.codigo, &dados, &disciplinas).await?;
    state.sessao.atualizar_user(&state.store, &user);
    println!("Perfil atualizado: {} {} <{}>", user.nome, user.apelido, user.email);
    Ok(())
}

// --- Vista de submissão (instrutor) ---

pub async fn ver_atividades(state: &AppState) -> AppResult<()> {
    let user = exigir_sessao(state)?;
    // O encargado vê o catálogo todo; os instrutores só a sua categoria
    let visiveis = match atividade::categoria_permitida(user.role) {
        None => crate::api::atividades::listar(&state.api).await?,
        Some(cat) => crate::api::atividades::listar_por_categoria(&state.api, cat).await?,
    };
    println!("Atividades disponíveis para {:?}:", user.role);
    for a in visiveis {
        println!("  [{}] {} ({:?})", a.id, a.nome, a.categoria);
    }
    Ok(())
}

pub async fn ver_submeter(state: &AppState, campos: CamposRegisto) -> AppResult<()> {
    let user = exigir_sessao(state)?;
    let registo = registo_service::submeter(&state.api, &state.store, &user, &campos).await?;
    println!(
        "Registo {} submetido: {} {}–{} ({} h) na sala {}",
        registo.id,
        registo.data,
        registo.hora_inicio,
        registo.hora_fim,
        registo.horas_efetivas,
        registo.sala
    );
    Ok(())
}

pub async fn ver_registos(state: &AppState) -> AppResult<()> {
    let user = exigir_sessao(state)?;
    let resultado =
        registo_service::carregar_registos(&state.api, &state.store, &user.codigo).await?;
    if resultado.atualidade == Atualidade::Desatualizado {
        println!("⚠ Backend inacessível — a mostrar o espelho local (possivelmente desatualizado)");
    }
    for r in &resultado.dados {
        println!(
            "  [{}] {} {}–{} {} sala {} — {:?}",
            r.id, r.data, r.hora_inicio, r.hora_fim, r.disciplina, r.sala, r.estado
        );
    }
    println!("{} registos.", resultado.dados.len());
    Ok(())
}

pub async fn ver_editar(state: &AppState, id: i64, campos: CamposRegisto) -> AppResult<()> {
    let user = exigir_sessao(state)?;
    let atuais =
        registo_service::carregar_registos(&state.api, &state.store, &user.codigo).await?;
    let registo = atuais
        .dados
        .iter()
        .find(|r| r.id == id)
        .ok_or(AppError::NaoEncontrado)?;
    let atualizado =
        registo_service::editar(&state.api, &state.store, &user, registo, &campos).await?;
    println!("Registo {} atualizado.", atualizado.id);
    Ok(())
}

pub async fn ver_remover(state: &AppState, id: i64) -> AppResult<()> {
    exigir_sessao(state)?;
    registo_service::remover(&state.api, &state.store, id).await?;
    println!("Registo {} removido.", id);
    Ok(())
}

// --- Vista de validação (encargado) ---

/// Interpreta os argumentos da vista de pendentes: um primeiro argumento
/// numérico é a página; qualquer outro texto é o filtro por código (e a
/// página fica na 1).
pub fn argumentos_pendentes(args: &[String]) -> (usize, Option<&str>) {
    match args.first() {
        None => (1, None),
        Some(primeiro) => match primeiro.parse::<usize>() {
            Ok(pagina) => (pagina, args.get(1).map(String::as_str)),
            Err(_) => (1, Some(primeiro.as_str())),
        },
    }
}

pub async fn ver_pendentes(
    state: &AppState,
    pagina: usize,
    filtro: Option<&str>,
) -> AppResult<()> {
    let user = exigir_sessao(state)?;
    let vista =
        validacao_service::carregar_pendentes(&state.api, &state.store, &user, filtro).await?;

    let (linhas, paginacao) = validacao_service::paginar(&vista.linhas, pagina);
    println!(
        "Registos pendentes — página {}/{} ({} no total)",
        paginacao.pagina, paginacao.total_paginas, paginacao.total_itens
    );
    for p in linhas {
        println!(
            "  [{}] {} — {} ({}) {} {}–{}, {} — {}",
            p.registo.id,
            p.registo.data,
            p.nome_user,
            p.codigo_user,
            p.registo.disciplina,
            p.registo.hora_inicio,
            p.registo.hora_fim,
            p.registo.sala,
            p.atividade,
        );
    }
    let nomes: Vec<&str> = vista.disciplinas.iter().map(|d| d.nome.as_str()).collect();
    println!("Disciplinas (filtro): {}", nomes.join(", "));
    Ok(())
}

pub async fn ver_decidir(
    state: &AppState,
    registo_id: i64,
    resultado: ResultadoValidacao,
    observacao: Option<String>,
) -> AppResult<()> {
    let user = exigir_sessao(state)?;
    let vista =
        validacao_service::carregar_pendentes(&state.api, &state.store, &user, None).await?;
    let pendente = vista
        .linhas
        .iter()
        .find(|p| p.registo.id == registo_id)
        .ok_or(AppError::NaoEncontrado)?;

    match state
        .decisor
        .decidir(&state.api, &user, pendente, resultado, observacao)
        .await?
    {
        Some(_) => {
            // Reload completo em vez de mutação otimista
            let vista =
                validacao_service::carregar_pendentes(&state.api, &state.store, &user, None)
                    .await?;
            println!(
                "Decisão registada. Restam {} registos pendentes.",
                vista.linhas.len()
            );
        }
        None => println!("Já havia uma decisão em curso para esse registo."),
    }
    Ok(())
}

/// Histórico de decisões do próprio encargado, com o estado atual de cada
/// ficha decidida (pode entretanto ter sido decidida outra vez).
pub async fn ver_decisoes(state: &AppState) -> AppResult<()> {
    let user = exigir_sessao(state)?;
    validacao_service::exigir_encargado(&user)?;

    let decisoes = crate::api::validacoes::listar_por_encargado(&state.api, user.id).await?;
    for v in &decisoes {
        let ficha = crate::api::fichas::buscar(&state.api, v.ficha_id).await?;
        println!(
            "  {} ficha {} de {}: {:?}{}",
            v.data,
            v.ficha_id,
            ficha.codigo_user,
            v.resultado,
            v.observacao
                .as_deref()
                .filter(|o| !o.is_empty())
                .map(|o| format!(" ({})", o))
                .unwrap_or_default(),
        );
    }
    println!("{} decisões registadas.", decisoes.len());
    Ok(())
}

// --- Vista de histórico/relatório ---

pub async fn ver_historico(state: &AppState, de: &str, ate: &str) -> AppResult<()> {
    let user = exigir_sessao(state)?;
    let de = parse_data(de)?;
    let ate = parse_data(ate)?;
    let aprovados = registo_service::historico(&state.api, &user.codigo, de, ate).await?;

    let total: f64 = aprovados.iter().map(|r| r.horas_efetivas).sum();
    println!("Registos aprovados de {} a {}:", de, ate);
    for r in &aprovados {
        println!(
            "  {} {}–{} {} ({} h) sala {}",
            r.data, r.hora_inicio, r.hora_fim, r.disciplina, r.horas_efetivas, r.sala
        );
    }
    println!("Total de horas efetivas: {:.1}", total);
    Ok(())
}

// --- Badge de notificações ---

pub async fn ver_notificacoes(state: &AppState) -> AppResult<()> {
    let user = exigir_sessao(state)?;

    // Refresca o espelho antes de derivar o badge (visão do programa todo
    // para o encargado, só os registos próprios para os instrutores)
    let proprias: Vec<i64> = if user.role.e_encargado() {
        validacao_service::carregar_pendentes(&state.api, &state.store, &user, None).await?;
        Vec::new()
    } else {
        registo_service::carregar_registos(&state.api, &state.store, &user.codigo).await?;
        crate::api::fichas::listar_por_user(&state.api, &user.codigo)
            .await?
            .into_iter()
            .map(|f| f.id)
            .collect()
    };

    let badge = notificacao_service::calcular_badge(
        &user,
        &state.store.espelho(),
        &proprias,
        &state.store.vistas(),
    );
    if badge.is_empty() {
        println!("Sem notificações novas.");
        return Ok(());
    }
    for n in &badge {
        let texto = match n.estado {
            EstadoFicha::Pendente => "aguarda validação",
            EstadoFicha::Aprovada => "foi aprovado",
            EstadoFicha::Rejeitada => "foi rejeitado",
        };
        println!("  registo {} ({}): {}", n.registo_id, n.data, texto);
    }
    println!("{} notificações.", badge.len());
    Ok(())
}

pub fn ver_notificacao_vista(state: &AppState, registo_id: i64) {
    notificacao_service::marcar_vista(&state.store, registo_id);
    println!("Notificação {} reconhecida.", registo_id);
}

// --- Vista de administração (encargado) ---

pub async fn ver_users(state: &AppState) -> AppResult<()> {
    let user = exigir_sessao(state)?;
    validacao_service::exigir_encargado(&user)?;
    for u in admin_service::listar_users(&state.api).await? {
        println!("  {} — {} {} <{}> {:?}", u.codigo, u.nome, u.apelido, u.email, u.role);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn ver_user_criar(
    state: &AppState,
    codigo: &str,
    nome: &str,
    apelido: &str,
    email: &str,
    role: Role,
    password: &str,
    disciplinas: &[String],
) -> AppResult<()> {
    let atual = exigir_sessao(state)?;
    validacao_service::exigir_encargado(&atual)?;
    let novo = NovoUser {
        codigo: codigo.to_string(),
        nome: nome.to_string(),
        apelido: apelido.to_string(),
        email: email.to_string(),
        role,
        password: password.to_string(),
    };
    let criado = admin_service::criar_user(&state.api, &novo, disciplinas).await?;
    println!("Utilizador {} criado.", criado.codigo);
    Ok(())
}

pub async fn ver_user_apagar(state: &AppState, codigo: &str) -> AppResult<()> {
    let atual = exigir_sessao(state)?;
    validacao_service::exigir_encargado(&atual)?;

    match admin_service::apagar_user(&state.api, codigo, false).await {
        Ok(()) => {
            println!("Utilizador {} apagado.", codigo);
            Ok(())
        }
        Err(AppError::Conflito) => {
            if confirmar(&format!(
                "O utilizador {} ainda tem disciplinas associadas. Apagar tudo?",
                codigo
            )) {
                admin_service::apagar_user(&state.api, codigo, true).await?;
                println!("Utilizador {} apagado (com associações).", codigo);
                Ok(())
            } else {
                println!("Operação cancelada.");
                Ok(())
            }
        }
        Err(e) => Err(e),
    }
}

pub async fn ver_disciplinas(state: &AppState) -> AppResult<()> {
    exigir_sessao(state)?;
    for d in admin_service::listar_disciplinas(&state.api).await? {
        println!("  [{}] {}", d.id, d.nome);
    }
    Ok(())
}

pub async fn ver_disciplina_criar(state: &AppState, nome: &str) -> AppResult<()> {
    let atual = exigir_sessao(state)?;
    validacao_service::exigir_encargado(&atual)?;
    let criada = admin_service::criar_disciplina(&state.api, nome).await?;
    println!("Disciplina [{}] {} criada.", criada.id, criada.nome);
    Ok(())
}

pub async fn ver_disciplina_renomear(state: &AppState, nome: &str, novo: &str) -> AppResult<()> {
    let atual = exigir_sessao(state)?;
    validacao_service::exigir_encargado(&atual)?;

    let disciplina = admin_service::listar_disciplinas(&state.api)
        .await?
        .into_iter()
        .find(|d| d.nome == nome)
        .ok_or(AppError::NaoEncontrado)?;
    let renomeada = admin_service::atualizar_disciplina(&state.api, disciplina.id, novo).await?;
    println!("Disciplina [{}] renomeada para {}.", renomeada.id, renomeada.nome);
    Ok(())
}

pub async fn ver_disciplina_apagar(state: &AppState, nome: &str) -> AppResult<()> {
    let atual = exigir_sessao(state)?;
    validacao_service::exigir_encargado(&atual)?;

    let disciplina = admin_service::listar_disciplinas(&state.api)
        .await?
        .into_iter()
        .find(|d| d.nome == nome)
        .ok_or(AppError::NaoEncontrado)?;

    match admin_service::apagar_disciplina(&state.api, &disciplina, false).await {
        Ok(()) => {
            println!("Disciplina {} apagada.", nome);
            Ok(())
        }
        Err(AppError::Conflito) => {
            if confirmar(&format!(
                "A disciplina {} ainda tem utilizadores associados. Apagar tudo?",
                nome
            )) {
                admin_service::apagar_disciplina(&state.api, &disciplina, true).await?;
                println!("Disciplina {} apagada (com associações).", nome);
                Ok(())
            } else {
                println!("Operação cancelada.");
                Ok(())
            }
        }
        Err(e) => Err(e),
    }
}
