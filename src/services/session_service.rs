// src/services/session_service.rs
use crate::{
    api::{self, ApiClient},
    error::{AppError, AppResult},
    models::user::{Credenciais, User},
    store::LocalStore,
};
use tokio::sync::watch;

/// Fase da máquina de estados da sessão:
/// NaoAutenticado → Verificando → {Autenticado, NaoAutenticado}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaseSessao {
    NaoAutenticado,
    Verificando,
    Autenticado,
}

#[derive(Debug, Clone)]
pub struct EstadoSessao {
    pub fase: FaseSessao,
    pub user: Option<User>,
}

impl EstadoSessao {
    fn vazio() -> Self {
        Self {
            fase: FaseSessao::NaoAutenticado,
            user: None,
        }
    }
}

/// Gestor explícito da sessão, propriedade da raiz da aplicação (AppState).
/// Nada de singletons ambiente: quem precisa de reagir a mudanças subscreve
/// o canal watch e recebe cada novo EstadoSessao.
#[derive(Clone)]
pub struct SessionManager {
    tx: watch::Sender<EstadoSessao>,
}

impl SessionManager {
    pub fn nova() -> Self {
        let (tx, _rx) = watch::channel(EstadoSessao::vazio());
        Self { tx }
    }

    /// Canal de notificação para vistas reativas.
    pub fn subscrever(&self) -> watch::Receiver<EstadoSessao> {
        self.tx.subscribe()
    }

    pub fn estado(&self) -> EstadoSessao {
        self.tx.borrow().clone()
    }

    pub fn user_atual(&self) -> Option<User> {
        self.tx.borrow().user.clone()
    }

    fn publicar(&self, estado: EstadoSessao) {
        // send_replace nunca falha mesmo sem subscritores
        self.tx.send_replace(estado);
    }

    /// Restaura a sessão no arranque a partir do token persistido.
    ///
    /// Decisão deliberada sobre falhas do fetch do perfil:
    /// - 401/403 → o token já não vale nada: limpa e força sign-out;
    /// - 404/rede/5xx → transitório: mantém a sessão com o perfil em cache
    ///   (um soluço do backend não deve deslogar ninguém).
    pub async fn restaurar(&self, api: &ApiClient, store: &LocalStore) -> AppResult<FaseSessao> {
        let Some(token) = store.token() else {
            tracing::debug!("Sem token persistido; sessão não autenticada");
            self.publicar(EstadoSessao::vazio());
            return Ok(FaseSessao::NaoAutenticado);
        };

        self.publicar(EstadoSessao {
            fase: FaseSessao::Verificando,
            user: store.user_em_cache(),
        });
        api.set_token(&token);

        // O payload só serve para saber QUEM buscar; a assinatura fica
        // por verificar (o backend é a fronteira de confiança)
        let claims = match api::auth::decodificar_claims(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!("Token persistido ilegível ({}); a limpar sessão", e);
                self.sair(api, store);
                return Ok(FaseSessao::NaoAutenticado);
            }
        };

        match api::users::buscar(api, &claims.sub).await {
            Ok(user) => {
                tracing::info!("✅ Sessão restaurada para {}", user.codigo);
                store.set_user(&user);
                self.publicar(EstadoSessao {
                    fase: FaseSessao::Autenticado,
                    user: Some(user),
                });
                Ok(FaseSessao::Autenticado)
            }
            Err(AppError::NaoAutorizado) => {
                tracing::info!("Token recusado pelo backend; sessão terminada");
                self.sair(api, store);
                Ok(FaseSessao::NaoAutenticado)
            }
            Err(e) if e.e_transitorio() => {
                // Mantém a sessão viva com o perfil que já tínhamos
                match store.user_em_cache() {
                    Some(user) => {
                        tracing::warn!(
                            "Falha transitória ao refrescar o perfil ({}); a usar cache",
                            e
                        );
                        self.publicar(EstadoSessao {
                            fase: FaseSessao::Autenticado,
                            user: Some(user),
                        });
                        Ok(FaseSessao::Autenticado)
                    }
                    None => {
                        tracing::warn!("Falha transitória e sem perfil em cache: {}", e);
                        self.publicar(EstadoSessao::vazio());
                        Ok(FaseSessao::NaoAutenticado)
                    }
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Autentica com credenciais. Qualquer falha vira o erro genérico
    /// CredenciaisInvalidas; o detalhe não é exposto ao chamador, de
    /// propósito (simplificação assumida, não fronteira de segurança).
    pub async fn entrar(
        &self,
        api: &ApiClient,
        store: &LocalStore,
        credenciais: &Credenciais,
    ) -> AppResult<User> {
        tracing::info!("Tentativa de login para código: {}", credenciais.codigo);

        let resposta = api::auth::entrar(api, credenciais)
            .await
            .map_err(|e| match e {
                AppError::Rede(e) => AppError::Rede(e),
                _ => AppError::CredenciaisInvalidas,
            })?;

        if !resposta.sucesso {
            tracing::warn!("Login recusado para {}", credenciais.codigo);
            return Err(AppError::CredenciaisInvalidas);
        }

        store.set_token(&resposta.token);
        api.set_token(&resposta.token);

        let claims = api::auth::decodificar_claims(&resposta.token)
            .map_err(|_| AppError::CredenciaisInvalidas)?;
        let user = api::users::buscar(api, &claims.sub)
            .await
            .map_err(|_| AppError::CredenciaisInvalidas)?;

        store.set_user(&user);
        self.publicar(EstadoSessao {
            fase: FaseSessao::Autenticado,
            user: Some(user.clone()),
        });
        tracing::info!("✅ Login bem-sucedido para: {}", user.codigo);
        Ok(user)
    }

    /// Termina a sessão localmente. Não há invalidação no servidor: o token
    /// bearer é stateless.
    pub fn sair(&self, api: &ApiClient, store: &LocalStore) {
        let quem = self.user_atual().map(|u| u.codigo);
        api.limpar_token();
        store.limpar_sessao();
        self.publicar(EstadoSessao::vazio());
        match quem {
            Some(codigo) => tracing::info!("🚪 Utilizador '{}' desligado.", codigo),
            None => tracing::info!("🚪 Sessão anónima desligada."),
        }
    }

    /// Substitui o perfil em cache sem ir à rede (usado quando o encargado
    /// edita a própria conta).
    pub fn atualizar_user(&self, store: &LocalStore, user: &User) {
        store.set_user(user);
        let fase = self.tx.borrow().fase;
        self.publicar(EstadoSessao {
            fase,
            user: Some(user.clone()),
        });
        tracing::debug!("Perfil em cache substituído para {}", user.codigo);
    }

    /// Interceptor global: qualquer recurso que devolva 401/403 deve passar
    /// o erro por aqui para derrubar a sessão (e mantê-lo a propagar).
    pub fn tratar_erro(&self, erro: AppError, api: &ApiClient, store: &LocalStore) -> AppError {
        if matches!(erro, AppError::NaoAutorizado) {
            tracing::warn!("Resposta 401/403 de um recurso; a terminar a sessão");
            self.sair(api, store);
        }
        erro
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::nova()
    }
}
