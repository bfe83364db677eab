// src/main.rs

// --- Imports ---
use chrono::NaiveDate;
use rehosar::{
    cli,
    config::AppConfig,
    error::{AppError, AppResult},
    models::{user::Role, validacao::ResultadoValidacao},
    services::registo_service::CamposRegisto,
    state::AppState,
};
use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USO: &str = "\
Uso: rehosar <comando> [args]

Sessão:
  entrar <codigo> <password>
  sair
  perfil <nome> <apelido> <email> <password>

Registos de horas:
  atividades
  submeter <disciplina> <atividade_id> <AAAA-MM-DD> <HH:MM> <HH:MM> <sala>
  registos
  editar <id> <disciplina> <atividade_id> <AAAA-MM-DD> <HH:MM> <HH:MM> <sala>
  remover <id>
  historico <de> <ate>

Validação (encargado):
  pendentes [pagina] [filtro_codigo]
  aprovar <registo_id>
  rejeitar <registo_id> [observacao]
  decisoes

Notificações:
  notificacoes
  notificacao-vista <registo_id>

Administração (encargado):
  users
  user-criar <codigo> <nome> <apelido> <email> <role> <password> [disciplinas,separadas,por,virgula]
  user-apagar <codigo>
  disciplinas
  disciplina-criar <nome>
  disciplina-renomear <nome> <novo_nome>
  disciplina-apagar <nome>
";

fn arg(args: &[String], i: usize, nome: &str) -> AppResult<String> {
    args.get(i)
        .cloned()
        .ok_or_else(|| AppError::Uso(format!("argumento em falta: {}", nome)))
}

fn arg_id(args: &[String], i: usize, nome: &str) -> AppResult<i64> {
    arg(args, i, nome)?
        .parse()
        .map_err(|_| AppError::Uso(format!("argumento inválido: {}", nome)))
}

fn campos_de_args(args: &[String], base: usize) -> AppResult<CamposRegisto> {
    Ok(CamposRegisto {
        disciplina: arg(args, base, "disciplina")?,
        atividade_id: Some(arg_id(args, base + 1, "atividade_id")?),
        data: Some(
            NaiveDate::parse_from_str(&arg(args, base + 2, "data")?, "%Y-%m-%d")
                .map_err(|_| AppError::Uso("data inválida (esperado AAAA-MM-DD)".into()))?,
        ),
        hora_inicio: arg(args, base + 3, "hora_inicio")?,
        hora_fim: arg(args, base + 4, "hora_fim")?,
        sala: arg(args, base + 5, "sala")?,
    })
}

fn role_de_texto(texto: &str) -> AppResult<Role> {
    match texto {
        "encargado" => Ok(Role::Encargado),
        "instrutor" => Ok(Role::InstrutorNaoRemunerado),
        "instrutor-remunerado" => Ok(Role::InstrutorRemunerado),
        outro => Err(AppError::Uso(format!(
            "role desconhecida: {} (use encargado | instrutor | instrutor-remunerado)",
            outro
        ))),
    }
}

async fn executar(state: &AppState, comando: &str, args: &[String]) -> AppResult<()> {
    match comando {
        "entrar" => {
            cli::ver_entrar(state, &arg(args, 0, "codigo")?, &arg(args, 1, "password")?).await
        }
        "sair" => {
            cli::ver_sair(state);
            Ok(())
        }
        "perfil" => {
            cli::ver_perfil(
                state,
                &arg(args, 0, "nome")?,
                &arg(args, 1, "apelido")?,
                &arg(args, 2, "email")?,
                &arg(args, 3, "password")?,
            )
            .await
        }
        "atividades" => cli::ver_atividades(state).await,
        "submeter" => cli::ver_submeter(state, campos_de_args(args, 0)?).await,
        "registos" => cli::ver_registos(state).await,
        "editar" => {
            let id = arg_id(args, 0, "id")?;
            cli::ver_editar(state, id, campos_de_args(args, 1)?).await
        }
        "remover" => cli::ver_remover(state, arg_id(args, 0, "id")?).await,
        "historico" => {
            cli::ver_historico(state, &arg(args, 0, "de")?, &arg(args, 1, "ate")?).await
        }
        "pendentes" => {
            let (pagina, filtro) = cli::argumentos_pendentes(args);
            cli::ver_pendentes(state, pagina, filtro).await
        }
        "aprovar" => {
            cli::ver_decidir(
                state,
                arg_id(args, 0, "registo_id")?,
                ResultadoValidacao::Aprovada,
                None,
            )
            .await
        }
        "rejeitar" => {
            cli::ver_decidir(
                state,
                arg_id(args, 0, "registo_id")?,
                ResultadoValidacao::Rejeitada,
                args.get(1).cloned(),
            )
            .await
        }
        "decisoes" => cli::ver_decisoes(state).await,
        "notificacoes" => cli::ver_notificacoes(state).await,
        "notificacao-vista" => {
            cli::ver_notificacao_vista(state, arg_id(args, 0, "registo_id")?);
            Ok(())
        }
        "users" => cli::ver_users(state).await,
        "user-criar" => {
            let disciplinas: Vec<String> = args
                .get(6)
                .map(|lista| lista.split(',').map(str::to_string).collect())
                .unwrap_or_default();
            cli::ver_user_criar(
                state,
                &arg(args, 0, "codigo")?,
                &arg(args, 1, "nome")?,
                &arg(args, 2, "apelido")?,
                &arg(args, 3, "email")?,
                role_de_texto(&arg(args, 4, "role")?)?,
                &arg(args, 5, "password")?,
                &disciplinas,
            )
            .await
        }
        "user-apagar" => cli::ver_user_apagar(state, &arg(args, 0, "codigo")?).await,
        "disciplinas" => cli::ver_disciplinas(state).await,
        "disciplina-criar" => cli::ver_disciplina_criar(state, &arg(args, 0, "nome")?).await,
        "disciplina-renomear" => {
            cli::ver_disciplina_renomear(state, &arg(args, 0, "nome")?, &arg(args, 1, "novo_nome")?)
                .await
        }
        "disciplina-apagar" => cli::ver_disciplina_apagar(state, &arg(args, 0, "nome")?).await,
        _ => {
            eprintln!("{}", USO);
            Err(AppError::Uso(format!("comando desconhecido: {}", comando)))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuração do Logging (Tracing) ---
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            env::var("RUST_LOG")
                .unwrap_or_else(|_| "rehosar=debug,reqwest=warn".into())
                .into()
        }))
        .with(fmt::layer())
        .init();

    tracing::info!("🚀 Iniciando REHOSAR...");

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("❌ Falha crítica ao carregar a configuração: {}", e);
            return Err(anyhow::anyhow!("Configuração inválida: {}", e));
        }
    };

    let state = AppState::nova(config);

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(comando) = args.first().cloned() else {
        eprintln!("{}", USO);
        return Ok(());
    };

    // Restaura a sessão guardada antes de qualquer comando (exceto o próprio login)
    if comando != "entrar" {
        if let Err(e) = state.sessao.restaurar(&state.api, &state.store).await {
            tracing::warn!("⚠️ Restauro da sessão falhou: {}", e);
        }
    }

    let resultado = executar(&state, &comando, &args[1..]).await;

    if let Err(erro) = resultado {
        // 401/403 em qualquer ponto derruba a sessão globalmente
        let erro = state.sessao.tratar_erro(erro, &state.api, &state.store);
        tracing::error!("❌ {}", erro);
        return Err(anyhow::anyhow!("{}", erro));
    }

    if let Err(e) = state.store.guardar() {
        tracing::warn!("⚠️ Falha ao persistir o estado local: {}", e);
    }

    Ok(())
}
