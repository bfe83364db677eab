// src/services/registo_service.rs
use crate::{
    api::{self, ApiClient},
    error::{AppError, AppResult},
    models::{
        ficha::{EstadoFicha, Ficha, NovaFicha},
        registo::{self, NovoRegisto, RegistoHoras},
        user::User,
    },
    store::{Atualidade, Espelhado, LocalStore},
};
use chrono::{Local, NaiveDate, NaiveTime};
use std::collections::HashMap;

/// Campos do formulário de submissão, tal como vêm da vista.
#[derive(Debug, Clone, Default)]
pub struct CamposRegisto {
    pub disciplina: String,
    pub atividade_id: Option<i64>,
    pub data: Option<NaiveDate>,
    pub hora_inicio: String,
    pub hora_fim: String,
    pub sala: String,
}

impl CamposRegisto {
    /// Validação de presença, antes de qualquer chamada à rede.
    /// Falha cedo com a lista dos campos em falta.
    pub fn validar(&self) -> AppResult<()> {
        let mut em_falta = Vec::new();
        if self.disciplina.trim().is_empty() {
            em_falta.push("disciplina".to_string());
        }
        if self.atividade_id.is_none() {
            em_falta.push("atividade".to_string());
        }
        if self.data.is_none() {
            em_falta.push("data".to_string());
        }
        if self.hora_inicio.trim().is_empty() {
            em_falta.push("hora de início".to_string());
        }
        if self.hora_fim.trim().is_empty() {
            em_falta.push("hora de fim".to_string());
        }
        if self.sala.trim().is_empty() {
            em_falta.push("sala".to_string());
        }
        if em_falta.is_empty() {
            Ok(())
        } else {
            Err(AppError::CamposEmFalta(em_falta))
        }
    }

    /// Extrai os campos que `validar()` já garantiu presentes.
    fn obrigatorios(&self) -> AppResult<(NaiveDate, i64)> {
        let data = self
            .data
            .ok_or_else(|| AppError::CamposEmFalta(vec!["data".to_string()]))?;
        let atividade_id = self
            .atividade_id
            .ok_or_else(|| AppError::CamposEmFalta(vec!["atividade".to_string()]))?;
        Ok((data, atividade_id))
    }
}

/// Horas efetivas = (fim − início) em horas fracionárias.
/// ATENÇÃO: não há tratamento de passagem da meia-noite: com fim <= início
/// o resultado é não-positivo e NÃO é rejeitado aqui. É o comportamento
/// que o backend espera, e fica assente nos testes.
pub fn calcular_horas_efetivas(inicio: &str, fim: &str) -> AppResult<f64> {
    let inicio = NaiveTime::parse_from_str(inicio.trim(), "%H:%M")
        .map_err(|_| AppError::HoraInvalida(inicio.to_string()))?;
    let fim = NaiveTime::parse_from_str(fim.trim(), "%H:%M")
        .map_err(|_| AppError::HoraInvalida(fim.to_string()))?;

    let minutos = (fim - inicio).num_minutes();
    Ok(minutos as f64 / 60.0)
}

/// Resolve a ficha Pendente aberta do utilizador, criando-a se não existir.
///
/// Re-busca SEMPRE as fichas antes de criar, para não duplicar a ficha
/// aberta. A janela de corrida entre duas submissões simultâneas continua a
/// existir; fechá-la de vez é responsabilidade do backend (constraint
/// única), não nossa.
pub async fn resolver_ficha_aberta(api: &ApiClient, codigo_user: &str) -> AppResult<Ficha> {
    let fichas = api::fichas::listar_por_user(api, codigo_user).await?;
    if let Some(aberta) = fichas
        .into_iter()
        .find(|f| f.estado == EstadoFicha::Pendente)
    {
        tracing::debug!("Ficha aberta {} reutilizada para {}", aberta.id, codigo_user);
        return Ok(aberta);
    }

    tracing::info!("Sem ficha aberta para {}; a criar uma nova", codigo_user);
    api::fichas::criar(
        api,
        &NovaFicha {
            codigo_user: codigo_user.to_string(),
            data_criacao: Local::now().date_naive(),
        },
    )
    .await
}

/// Mapa ficha → estado do próprio utilizador (para a derivação do estado).
async fn mapa_fichas_do_user(
    api: &ApiClient,
    codigo_user: &str,
) -> AppResult<HashMap<i64, EstadoFicha>> {
    let fichas = api::fichas::listar_por_user(api, codigo_user).await?;
    Ok(fichas.into_iter().map(|f| (f.id, f.estado)).collect())
}

/// Recarrega do backend os registos do utilizador e substitui o espelho
/// local ("read-after-write": a única reconciliação que o sistema faz).
pub async fn recarregar_espelho(
    api: &ApiClient,
    store: &LocalStore,
    codigo_user: &str,
) -> AppResult<Vec<RegistoHoras>> {
    let (wires, fichas) = tokio::try_join!(
        api::registos::listar_por_user(api, codigo_user),
        mapa_fichas_do_user(api, codigo_user),
    )?;
    let registos = registo::normalizar_todos(wires, &fichas);
    store.substituir_espelho(registos.clone());
    tracing::debug!(
        "Espelho local recarregado: {} registos para {}",
        registos.len(),
        codigo_user
    );
    Ok(registos)
}

/// Leitura read-through: prefere sempre a busca fresca; em falha de REDE cai
/// para o espelho local, marcado como possivelmente desatualizado. Outras
/// falhas propagam (não queremos mascarar 401 nem erros do backend).
pub async fn carregar_registos(
    api: &ApiClient,
    store: &LocalStore,
    codigo_user: &str,
) -> AppResult<Espelhado<Vec<RegistoHoras>>> {
    match recarregar_espelho(api, store, codigo_user).await {
        Ok(registos) => Ok(Espelhado {
            dados: registos,
            atualidade: Atualidade::Fresco,
        }),
        Err(AppError::Rede(e)) => {
            tracing::warn!("Backend inacessível ({}); a servir o espelho local", e);
            Ok(Espelhado {
                dados: store.espelho(),
                atualidade: Atualidade::Desatualizado,
            })
        }
        Err(e) => Err(e),
    }
}

/// Submete um registo novo: valida, calcula as horas, resolve a ficha
/// aberta, cria o registo e reconcilia o espelho com um reload completo.
pub async fn submeter(
    api: &ApiClient,
    store: &LocalStore,
    user: &User,
    campos: &CamposRegisto,
) -> AppResult<RegistoHoras> {
    // 1. Validação local (nenhuma chamada à rede antes disto passar)
    campos.validar()?;
    let (data, atividade_id) = campos.obrigatorios()?;
    let horas = calcular_horas_efetivas(&campos.hora_inicio, &campos.hora_fim)?;

    // 2. Ficha aberta (criada preguiçosamente na primeira submissão)
    let ficha = resolver_ficha_aberta(api, &user.codigo).await?;

    // 3. Criação do registo preso à ficha
    let novo = NovoRegisto {
        data,
        hora_inicio: campos.hora_inicio.trim().to_string(),
        hora_fim: campos.hora_fim.trim().to_string(),
        horas_efetivas: horas,
        sala: campos.sala.trim().to_string(),
        disciplina: campos.disciplina.trim().to_string(),
        atividade_id,
        ficha_id: ficha.id,
    };
    let criado = api::registos::criar(api, &novo).await?;

    // 4. Funde no espelho e recarrega tudo do backend (campos derivados
    //    do lado do servidor ficam reconciliados)
    let fichas = HashMap::from([(ficha.id, ficha.estado)]);
    let registo = registo::normalizar(criado, &fichas);
    store.fundir_registo(&registo);
    recarregar_espelho(api, store, &user.codigo).await?;

    tracing::info!("✅ Registo {} submetido na ficha {}", registo.id, ficha.id);
    Ok(registo)
}

/// Edita um registo existente. Só é permitido enquanto o estado derivado for
/// Pendente; depois da decisão do encargado o registo é imutável.
pub async fn editar(
    api: &ApiClient,
    store: &LocalStore,
    user: &User,
    registo: &RegistoHoras,
    campos: &CamposRegisto,
) -> AppResult<RegistoHoras> {
    if registo.estado != EstadoFicha::Pendente {
        tracing::warn!(
            "Edição recusada: registo {} já está {:?}",
            registo.id,
            registo.estado
        );
        return Err(AppError::RegistoJaValidado);
    }

    campos.validar()?;
    let (data, atividade_id) = campos.obrigatorios()?;
    let horas = calcular_horas_efetivas(&campos.hora_inicio, &campos.hora_fim)?;

    let dados = NovoRegisto {
        data,
        hora_inicio: campos.hora_inicio.trim().to_string(),
        hora_fim: campos.hora_fim.trim().to_string(),
        horas_efetivas: horas,
        sala: campos.sala.trim().to_string(),
        disciplina: campos.disciplina.trim().to_string(),
        atividade_id,
        ficha_id: registo.ficha_id,
    };
    let atualizado = api::registos::atualizar(api, registo.id, &dados).await?;

    let fichas = mapa_fichas_do_user(api, &user.codigo).await?;
    let atualizado = registo::normalizar(atualizado, &fichas);
    store.fundir_registo(&atualizado);
    recarregar_espelho(api, store, &user.codigo).await?;

    tracing::info!("✅ Registo {} atualizado", atualizado.id);
    Ok(atualizado)
}

/// Remove um registo. A autorização (dono + ficha Pendente) é imposta pelo
/// backend; aqui só reconciliamos o espelho depois do sucesso. Uma segunda
/// chamada com o mesmo id devolve NaoEncontrado e não mexe no estado local.
pub async fn remover(api: &ApiClient, store: &LocalStore, id: i64) -> AppResult<()> {
    api::registos::apagar(api, id).await?;
    store.remover_registo(id);
    tracing::info!("Registo {} removido", id);
    Ok(())
}

/// Histórico aprovado de um utilizador num intervalo de datas (alimenta a
/// vista de relatório; a exportação em si fica fora deste módulo).
pub async fn historico(
    api: &ApiClient,
    codigo_user: &str,
    de: NaiveDate,
    ate: NaiveDate,
) -> AppResult<Vec<RegistoHoras>> {
    let (wires, fichas) = tokio::try_join!(
        api::registos::listar_por_user_e_intervalo(api, codigo_user, de, ate),
        mapa_fichas_do_user(api, codigo_user),
    )?;

    let mut aprovados: Vec<RegistoHoras> = registo::normalizar_todos(wires, &fichas)
        .into_iter()
        .filter(|r| r.estado == EstadoFicha::Aprovada)
        .collect();
    aprovados.sort_by_key(|r| (r.data, r.id));
    Ok(aprovados)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duas_horas_certas() {
        assert_eq!(calcular_horas_efetivas("08:00", "10:00").unwrap(), 2.0);
    }

    #[test]
    fn meia_hora() {
        assert_eq!(calcular_horas_efetivas("08:30", "09:00").unwrap(), 0.5);
    }

    // Comportamento atual documentado, NÃO validado: fim <= início produz um
    // valor não-positivo em vez de erro (lacuna conhecida, assente aqui).
    #[test]
    fn fim_antes_do_inicio_da_nao_positivo() {
        assert_eq!(calcular_horas_efetivas("10:00", "08:00").unwrap(), -2.0);
        assert_eq!(calcular_horas_efetivas("09:00", "09:00").unwrap(), 0.0);
    }

    #[test]
    fn hora_malformada_e_erro() {
        assert!(matches!(
            calcular_horas_efetivas("8h00", "10:00"),
            Err(AppError::HoraInvalida(_))
        ));
    }

    #[test]
    fn validar_lista_todos_os_campos_em_falta() {
        let campos = CamposRegisto::default();
        match campos.validar() {
            Err(AppError::CamposEmFalta(faltam)) => {
                assert_eq!(faltam.len(), 6);
                assert!(faltam.contains(&"sala".to_string()));
            }
            outro => panic!("esperava CamposEmFalta, veio {:?}", outro),
        }
    }

    #[test]
    fn validar_aceita_campos_completos() {
        let campos = CamposRegisto {
            disciplina: "Matemática".into(),
            atividade_id: Some(3),
            data: NaiveDate::from_ymd_opt(2024, 3, 4),
            hora_inicio: "08:00".into(),
            hora_fim: "10:00".into(),
            sala: "B12".into(),
        };
        assert!(campos.validar().is_ok());
    }
}
