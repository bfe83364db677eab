// src/error.rs
use thiserror::Error;

/// Erros da aplicação REHOSAR.
/// A taxonomia segue o comportamento do backend: 401/403 derrubam a sessão,
/// 404 é tratado como transitório em alguns caminhos, 409 sinaliza conflito
/// de associações em deletes, e o resto vira mensagem genérica (sem retry).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro de rede ao contactar o backend: {0}")]
    Rede(#[from] reqwest::Error),

    #[error("O backend respondeu {status}: {mensagem}")]
    Api { status: u16, mensagem: String },

    // 401/403: interceptado globalmente, força sign-out
    #[error("Não autorizado")]
    NaoAutorizado,

    #[error("Recurso não encontrado")]
    NaoEncontrado,

    // 409: delete bloqueado por associações existentes
    #[error("Conflito: o recurso tem associações dependentes")]
    Conflito,

    // Mensagem fixa e genérica, de propósito (o backend é a fronteira real)
    #[error("ID ou senha inválidos")]
    CredenciaisInvalidas,

    #[error("Campos obrigatórios em falta: {}", .0.join(", "))]
    CamposEmFalta(Vec<String>),

    #[error("O registo já foi validado e não pode ser alterado")]
    RegistoJaValidado,

    #[error("Hora inválida (esperado HH:MM): {0}")]
    HoraInvalida(String),

    #[error("Acesso restrito ao encargado")]
    AcessoNegado,

    #[error("Erro na sessão: {0}")]
    Sessao(String),

    // Erros de linha de comandos (comando ou argumento inválido)
    #[error("Uso inválido: {0}")]
    Uso(String),

    #[error("Erro ao aceder ao armazenamento local: {0}")]
    Armazenamento(#[from] std::io::Error),

    #[error("Erro ao processar JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Erro de variável de ambiente: {0}")]
    Config(#[from] std::env::VarError),
}

impl AppError {
    /// Constrói o erro adequado a partir de um status HTTP não-2xx.
    pub fn do_status(status: u16, mensagem: String) -> Self {
        match status {
            401 | 403 => AppError::NaoAutorizado,
            404 => AppError::NaoEncontrado,
            409 => AppError::Conflito,
            _ => AppError::Api { status, mensagem },
        }
    }

    /// Falhas que NÃO devem derrubar a sessão no restauro do perfil
    /// (404, rede, 5xx: tratadas como transitórias, ver session_service).
    pub fn e_transitorio(&self) -> bool {
        match self {
            AppError::Rede(_) | AppError::NaoEncontrado => true,
            AppError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;
