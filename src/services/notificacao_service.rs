// src/services/notificacao_service.rs
use crate::{
    models::{
        ficha::EstadoFicha,
        notificacao::Notificacao,
        registo::RegistoHoras,
        user::{Role, User},
    },
    store::LocalStore,
};

/// Calcula o conjunto do badge a partir do espelho local.
/// Encargado: todos os registos Pendentes do programa (trabalho por fazer).
/// Restantes papéis: os próprios registos que JÁ saíram de Pendente (houve
/// uma decisão). A lista de vistas suprime o que já foi reconhecido.
///
/// Fonte: só o espelho (nada de push nem polling); o badge reflete o estado
/// do último reload completo.
pub fn calcular_badge(
    user: &User,
    espelho: &[RegistoHoras],
    proprios_ficha_ids: &[i64],
    vistas: &[i64],
) -> Vec<Notificacao> {
    let relevantes = espelho.iter().filter(|r| match user.role {
        Role::Encargado => r.estado == EstadoFicha::Pendente,
        _ => proprios_ficha_ids.contains(&r.ficha_id) && r.estado != EstadoFicha::Pendente,
    });

    relevantes
        .filter(|r| !vistas.contains(&r.id))
        .map(|r| Notificacao {
            registo_id: r.id,
            ficha_id: r.ficha_id,
            estado: r.estado,
            data: r.data,
        })
        .collect()
}

/// Reconhece uma notificação: entra na lista persistida de vistas e deixa de
/// contar para o badge em todos os próximos cálculos.
pub fn marcar_vista(store: &LocalStore, registo_id: i64) {
    store.marcar_vista(registo_id);
    tracing::debug!("Notificação do registo {} marcada como vista", registo_id);
}
