// src/store.rs
use crate::{
    error::AppResult,
    models::{registo::RegistoHoras, user::User},
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

/// Estado persistido localmente (o análogo do localStorage do browser).
/// É SEMPRE cache de melhor esforço, nunca fonte de verdade: o backend manda.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstadoLocal {
    pub token: Option<String>,
    pub user: Option<User>,
    /// Espelho completo dos registos, alimentado pelos reloads dos serviços
    pub registos: Vec<RegistoHoras>,
    /// Ids de notificações já reconhecidas pelo utilizador
    pub vistas: Vec<i64>,
}

/// Frescura de um resultado lido através do store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Atualidade {
    Fresco,
    /// Veio do espelho local porque o backend estava inacessível
    Desatualizado,
}

/// Resultado de uma leitura read-through: dados + indicação de frescura,
/// para a vista poder avisar quando mostra dados possivelmente velhos.
#[derive(Debug, Clone)]
pub struct Espelhado<T> {
    pub dados: T,
    pub atualidade: Atualidade,
}

/// Acesso ao ficheiro de estado local. Vários serviços escrevem aqui sem
/// disciplina de lock entre processos; o último a escrever ganha.
#[derive(Clone)]
pub struct LocalStore {
    caminho: PathBuf,
    estado: Arc<Mutex<EstadoLocal>>,
}

impl LocalStore {
    /// Carrega o estado do disco. Ficheiro ausente ou corrompido não é fatal:
    /// fica um aviso no log e parte-se de um estado vazio.
    pub fn carregar(caminho: &Path) -> Self {
        let estado = match fs::read_to_string(caminho) {
            Ok(texto) => match serde_json::from_str(&texto) {
                Ok(estado) => estado,
                Err(e) => {
                    tracing::warn!(
                        "Estado local corrompido em {:?} ({}); a recomeçar vazio",
                        caminho,
                        e
                    );
                    EstadoLocal::default()
                }
            },
            Err(_) => {
                tracing::debug!("Sem estado local em {:?}; a começar vazio", caminho);
                EstadoLocal::default()
            }
        };

        Self {
            caminho: caminho.to_path_buf(),
            estado: Arc::new(Mutex::new(estado)),
        }
    }

    fn trancar(&self) -> std::sync::MutexGuard<'_, EstadoLocal> {
        self.estado.lock().expect("lock do estado local envenenado")
    }

    /// Escreve o estado no disco. Falha de escrita é só um aviso: o espelho
    /// é cache, e perder uma escrita não compromete nada.
    fn persistir(&self, estado: &EstadoLocal) {
        match serde_json::to_string_pretty(estado) {
            Ok(texto) => {
                if let Err(e) = fs::write(&self.caminho, texto) {
                    tracing::warn!("Falha ao gravar estado local em {:?}: {}", self.caminho, e);
                }
            }
            Err(e) => tracing::warn!("Falha ao serializar estado local: {}", e),
        }
    }

    /// Escrita explícita (usada no encerramento); aqui a falha propaga.
    pub fn guardar(&self) -> AppResult<()> {
        let estado = self.trancar().clone();
        let texto = serde_json::to_string_pretty(&estado)?;
        fs::write(&self.caminho, texto)?;
        Ok(())
    }

    // --- Sessão ---

    pub fn token(&self) -> Option<String> {
        self.trancar().token.clone()
    }

    pub fn set_token(&self, token: &str) {
        let mut estado = self.trancar();
        estado.token = Some(token.to_string());
        self.persistir(&estado);
    }

    pub fn user_em_cache(&self) -> Option<User> {
        self.trancar().user.clone()
    }

    pub fn set_user(&self, user: &User) {
        let mut estado = self.trancar();
        estado.user = Some(user.clone());
        self.persistir(&estado);
    }

    /// Apaga token e perfil (sign-out). O espelho de registos fica, pois continua
    /// útil para o badge no próximo arranque.
    pub fn limpar_sessao(&self) {
        let mut estado = self.trancar();
        estado.token = None;
        estado.user = None;
        self.persistir(&estado);
    }

    // --- Espelho de registos ---

    pub fn espelho(&self) -> Vec<RegistoHoras> {
        self.trancar().registos.clone()
    }

    pub fn substituir_espelho(&self, registos: Vec<RegistoHoras>) {
        let mut estado = self.trancar();
        estado.registos = registos;
        self.persistir(&estado);
    }

    /// Funde um registo no espelho (substitui pelo id, ou acrescenta).
    pub fn fundir_registo(&self, registo: &RegistoHoras) {
        let mut estado = self.trancar();
        match estado.registos.iter_mut().find(|r| r.id == registo.id) {
            Some(existente) => *existente = registo.clone(),
            None => estado.registos.push(registo.clone()),
        }
        self.persistir(&estado);
    }

    pub fn remover_registo(&self, id: i64) {
        let mut estado = self.trancar();
        estado.registos.retain(|r| r.id != id);
        self.persistir(&estado);
    }

    // --- Notificações vistas ---

    pub fn vistas(&self) -> Vec<i64> {
        self.trancar().vistas.clone()
    }

    pub fn marcar_vista(&self, registo_id: i64) {
        let mut estado = self.trancar();
        if !estado.vistas.contains(&registo_id) {
            estado.vistas.push(registo_id);
        }
        self.persistir(&estado);
    }
}
