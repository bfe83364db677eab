// tests/common/mod.rs
//
// Backend REST falso para os testes de integração: um router axum efémero
// numa porta aleatória, com o estado em memória partilhado com o teste.
// As respostas imitam as manias do backend real (camelCase num endpoint,
// snake_case noutro, ids embrulhados em listas de um elemento).
#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

pub const PASSWORD_VALIDA: &str = "1234";

/// Estado da aplicação apontado ao mock, com o armazenamento local num
/// diretório temporário do teste.
pub fn estado_de_teste(base_url: &str, dir: &tempfile::TempDir) -> rehosar::state::AppState {
    rehosar::state::AppState::nova(rehosar::config::AppConfig {
        api_url: base_url.to_string(),
        storage_path: dir.path().join("estado.json"),
        token_override: None,
    })
}

/// Variante com o token vindo "do ambiente" (o override de configuração).
pub fn estado_com_token(
    base_url: &str,
    dir: &tempfile::TempDir,
    token: &str,
) -> rehosar::state::AppState {
    rehosar::state::AppState::nova(rehosar::config::AppConfig {
        api_url: base_url.to_string(),
        storage_path: dir.path().join("estado.json"),
        token_override: Some(token.to_string()),
    })
}

#[derive(Default)]
pub struct Dados {
    pub users: Vec<Value>,
    pub disciplinas: Vec<Value>,
    pub associacoes: Vec<Value>,
    pub atividades: Vec<Value>,
    pub fichas: Vec<Value>,
    pub registos: Vec<Value>,
    pub validacoes: Vec<Value>,
    /// Quando true, GET /users/{codigo} responde 404 (backend do perfil em baixo).
    pub perfil_indisponivel: bool,
    pub aprovacoes: usize,
    pub rejeicoes: usize,
    proximo_id: i64,
}

impl Dados {
    fn id(&mut self) -> i64 {
        self.proximo_id += 1;
        self.proximo_id + 100
    }
}

type Estado = Arc<Mutex<Dados>>;

pub struct MockBackend {
    pub base_url: String,
    pub dados: Estado,
}

/// Constrói um JWT de fachada (cabeçalho e payload reais, assinatura falsa;
/// o cliente só descodifica o payload, nunca verifica).
pub fn token_para(codigo: &str) -> String {
    let cab = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let corpo = URL_SAFE_NO_PAD.encode(json!({ "sub": codigo }).to_string().as_bytes());
    format!("{}.{}.assinatura-falsa", cab, corpo)
}

impl MockBackend {
    pub async fn arrancar() -> Self {
        let dados: Estado = Arc::new(Mutex::new(Dados::default()));
        let app = router(dados.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind da porta efémera");
        let addr = listener.local_addr().expect("endereço local");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend");
        });

        Self {
            base_url: format!("http://{}", addr),
            dados,
        }
    }

    // --- Semeadura de dados ---

    pub fn semear_user(&self, codigo: &str, nome: &str, role: &str) -> i64 {
        let mut dados = self.dados.lock().unwrap();
        let id = dados.id();
        dados.users.push(json!({
            "id": id,
            "codigo": codigo,
            "nome": nome,
            "apelido": "Teste",
            "email": format!("{}@exemplo.pt", codigo),
            "role": role,
        }));
        id
    }

    pub fn semear_disciplina(&self, nome: &str) -> i64 {
        let mut dados = self.dados.lock().unwrap();
        let id = dados.id();
        dados.disciplinas.push(json!({ "id": id, "nome": nome }));
        id
    }

    pub fn semear_associacao(&self, codigo_user: &str, nome_disciplina: &str) -> i64 {
        let mut dados = self.dados.lock().unwrap();
        let id = dados.id();
        dados.associacoes.push(json!({
            "id": id,
            "codigo_user": codigo_user,
            "nome_disciplina": nome_disciplina,
        }));
        id
    }

    pub fn semear_atividade(&self, nome: &str, categoria: &str) -> i64 {
        let mut dados = self.dados.lock().unwrap();
        let id = dados.id();
        dados
            .atividades
            .push(json!({ "id": id, "nome": nome, "categoria": categoria }));
        id
    }

    pub fn semear_ficha(&self, codigo_user: &str, estado: &str) -> i64 {
        let mut dados = self.dados.lock().unwrap();
        let id = dados.id();
        dados.fichas.push(json!({
            "id": id,
            "data_criacao": "2024-03-01",
            "estado": estado,
            "codigo_user": codigo_user,
        }));
        id
    }

    pub fn semear_registo(&self, ficha_id: i64, data: &str, atividade_id: i64) -> i64 {
        let mut dados = self.dados.lock().unwrap();
        let id = dados.id();
        dados.registos.push(json!({
            "id": id,
            "data": data,
            "hora_inicio": "08:00",
            "hora_fim": "10:00",
            "horas_efetivas": 2.0,
            "sala": "B12",
            "disciplina": "Matemática",
            "atividade_id": atividade_id,
            "ficha_id": ficha_id,
        }));
        id
    }

    pub fn estado_da_ficha(&self, id: i64) -> String {
        let dados = self.dados.lock().unwrap();
        dados
            .fichas
            .iter()
            .find(|f| f["id"] == json!(id))
            .map(|f| f["estado"].as_str().unwrap_or_default().to_string())
            .unwrap_or_default()
    }
}

fn router(dados: Estado) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/users", get(listar_users).post(criar_user))
        .route(
            "/users/{codigo}",
            get(buscar_user).put(atualizar_user).delete(apagar_user),
        )
        .route("/disciplinas", get(listar_disciplinas).post(criar_disciplina))
        .route("/disciplinas/{id}", axum::routing::delete(apagar_disciplina))
        .route("/associacoes", get(listar_associacoes).post(criar_associacao))
        .route("/associacoes/{id}", axum::routing::delete(apagar_associacao))
        .route("/atividades", get(listar_atividades))
        .route("/fichas", get(listar_fichas).post(criar_ficha))
        .route("/fichas/{id}", get(buscar_ficha))
        .route("/registos", get(listar_registos).post(criar_registo))
        .route(
            "/registos/{id}",
            axum::routing::put(atualizar_registo).delete(apagar_registo),
        )
        .route("/validacoes", get(listar_validacoes).post(aprovar))
        .route("/validacoes/rejeitar", post(rejeitar))
        .with_state(dados)
}

// --- Autenticação ---

async fn login(State(dados): State<Estado>, Json(corpo): Json<Value>) -> Json<Value> {
    let dados = dados.lock().unwrap();
    let codigo = corpo["codigo"].as_str().unwrap_or_default();
    let password = corpo["password"].as_str().unwrap_or_default();
    let conhecido = dados.users.iter().any(|u| u["codigo"] == json!(codigo));

    if conhecido && password == PASSWORD_VALIDA {
        Json(json!({ "token": token_para(codigo), "success": true }))
    } else {
        Json(json!({ "token": "", "success": false }))
    }
}

// --- Utilizadores ---

async fn listar_users(State(dados): State<Estado>) -> Json<Value> {
    Json(Value::Array(dados.lock().unwrap().users.clone()))
}

async fn buscar_user(
    State(dados): State<Estado>,
    Path(codigo): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let dados = dados.lock().unwrap();
    if dados.perfil_indisponivel {
        return Err(StatusCode::NOT_FOUND);
    }
    dados
        .users
        .iter()
        .find(|u| u["codigo"] == json!(codigo))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn criar_user(State(dados): State<Estado>, Json(corpo): Json<Value>) -> Json<Value> {
    let mut dados = dados.lock().unwrap();
    let id = dados.id();
    let user = json!({
        "id": id,
        "codigo": corpo["codigo"],
        "nome": corpo["nome"],
        "apelido": corpo["apelido"],
        "email": corpo["email"],
        "role": corpo["role"],
    });
    dados.users.push(user.clone());
    Json(user)
}

async fn atualizar_user(
    State(dados): State<Estado>,
    Path(codigo): Path<String>,
    Json(corpo): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut dados = dados.lock().unwrap();
    let user = dados
        .users
        .iter_mut()
        .find(|u| u["codigo"] == json!(codigo))
        .ok_or(StatusCode::NOT_FOUND)?;
    for campo in ["nome", "apelido", "email", "role"] {
        user[campo] = corpo[campo].clone();
    }
    Ok(Json(user.clone()))
}

async fn apagar_user(
    State(dados): State<Estado>,
    Path(codigo): Path<String>,
) -> StatusCode {
    let mut dados = dados.lock().unwrap();
    let associado = dados
        .associacoes
        .iter()
        .any(|a| a["codigo_user"] == json!(codigo));
    if associado {
        return StatusCode::CONFLICT;
    }
    let antes = dados.users.len();
    dados.users.retain(|u| u["codigo"] != json!(codigo));
    if dados.users.len() == antes {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

// --- Disciplinas e associações ---

async fn listar_disciplinas(State(dados): State<Estado>) -> Json<Value> {
    Json(Value::Array(dados.lock().unwrap().disciplinas.clone()))
}

async fn criar_disciplina(State(dados): State<Estado>, Json(corpo): Json<Value>) -> Json<Value> {
    let mut dados = dados.lock().unwrap();
    let id = dados.id();
    let disciplina = json!({ "id": id, "nome": corpo["nome"] });
    dados.disciplinas.push(disciplina.clone());
    Json(disciplina)
}

async fn apagar_disciplina(State(dados): State<Estado>, Path(id): Path<i64>) -> StatusCode {
    let mut dados = dados.lock().unwrap();
    let Some(disciplina) = dados.disciplinas.iter().find(|d| d["id"] == json!(id)) else {
        return StatusCode::NOT_FOUND;
    };
    let nome = disciplina["nome"].clone();
    if dados.associacoes.iter().any(|a| a["nome_disciplina"] == nome) {
        return StatusCode::CONFLICT;
    }
    dados.disciplinas.retain(|d| d["id"] != json!(id));
    StatusCode::OK
}

async fn listar_associacoes(
    State(dados): State<Estado>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let dados = dados.lock().unwrap();
    let selecao: Vec<Value> = dados
        .associacoes
        .iter()
        .filter(|a| {
            params
                .get("user")
                .map_or(true, |u| a["codigo_user"] == json!(u))
                && params
                    .get("disciplina")
                    .map_or(true, |d| a["nome_disciplina"] == json!(d))
        })
        .cloned()
        .collect();
    Json(Value::Array(selecao))
}

async fn criar_associacao(State(dados): State<Estado>, Json(corpo): Json<Value>) -> Json<Value> {
    let mut dados = dados.lock().unwrap();
    let id = dados.id();
    let associacao = json!({
        "id": id,
        "codigo_user": corpo["codigo_user"],
        "nome_disciplina": corpo["nome_disciplina"],
    });
    dados.associacoes.push(associacao.clone());
    Json(associacao)
}

async fn apagar_associacao(State(dados): State<Estado>, Path(id): Path<i64>) -> StatusCode {
    let mut dados = dados.lock().unwrap();
    let antes = dados.associacoes.len();
    dados.associacoes.retain(|a| a["id"] != json!(id));
    if dados.associacoes.len() == antes {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

// --- Atividades ---

async fn listar_atividades(
    State(dados): State<Estado>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let dados = dados.lock().unwrap();
    let selecao: Vec<Value> = dados
        .atividades
        .iter()
        .filter(|a| {
            params
                .get("categoria")
                .map_or(true, |c| a["categoria"] == json!(c))
        })
        .cloned()
        .collect();
    Json(Value::Array(selecao))
}

// --- Fichas ---

async fn listar_fichas(
    State(dados): State<Estado>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let dados = dados.lock().unwrap();
    let selecao: Vec<Value> = dados
        .fichas
        .iter()
        .filter(|f| {
            params
                .get("user")
                .map_or(true, |u| f["codigo_user"] == json!(u))
        })
        .cloned()
        .collect();
    Json(Value::Array(selecao))
}

async fn buscar_ficha(
    State(dados): State<Estado>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    dados
        .lock()
        .unwrap()
        .fichas
        .iter()
        .find(|f| f["id"] == json!(id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn criar_ficha(State(dados): State<Estado>, Json(corpo): Json<Value>) -> Json<Value> {
    let mut dados = dados.lock().unwrap();
    let id = dados.id();
    // Resposta em camelCase, como o endpoint real
    let ficha = json!({
        "id": id,
        "creationDate": corpo["data_criacao"],
        "state": "PENDING",
        "userCode": corpo["codigo_user"],
    });
    dados.fichas.push(json!({
        "id": id,
        "data_criacao": corpo["data_criacao"],
        "estado": "PENDING",
        "codigo_user": corpo["codigo_user"],
    }));
    Json(ficha)
}

// --- Registos ---

/// Forma de wire dos registos: camelCase com os ids embrulhados em listas
/// de um elemento (a variante mais hostil que o cliente tem de normalizar).
fn registo_para_wire(r: &Value) -> Value {
    json!({
        "id": r["id"],
        "date": r["data"],
        "startTime": r["hora_inicio"],
        "endTime": r["hora_fim"],
        "effectiveHours": r["horas_efetivas"],
        "room": r["sala"],
        "subjectName": r["disciplina"],
        "activityId": [r["atividade_id"]],
        "formId": [r["ficha_id"]],
    })
}

async fn listar_registos(
    State(dados): State<Estado>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let dados = dados.lock().unwrap();

    let fichas_do_user: Option<Vec<Value>> = params.get("user").map(|u| {
        dados
            .fichas
            .iter()
            .filter(|f| f["codigo_user"] == json!(u))
            .map(|f| f["id"].clone())
            .collect()
    });

    let selecao: Vec<Value> = dados
        .registos
        .iter()
        .filter(|r| {
            fichas_do_user
                .as_ref()
                .map_or(true, |ids| ids.contains(&r["ficha_id"]))
        })
        .filter(|r| {
            let data = r["data"].as_str().unwrap_or_default();
            params.get("de").map_or(true, |de| data >= de.as_str())
                && params.get("ate").map_or(true, |ate| data <= ate.as_str())
        })
        .map(registo_para_wire)
        .collect();
    Json(Value::Array(selecao))
}

async fn criar_registo(State(dados): State<Estado>, Json(corpo): Json<Value>) -> Json<Value> {
    let mut dados = dados.lock().unwrap();
    let id = dados.id();
    let mut registo = corpo;
    registo["id"] = json!(id);
    dados.registos.push(registo.clone());
    Json(registo_para_wire(&registo))
}

async fn atualizar_registo(
    State(dados): State<Estado>,
    Path(id): Path<i64>,
    Json(corpo): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut dados = dados.lock().unwrap();
    let registo = dados
        .registos
        .iter_mut()
        .find(|r| r["id"] == json!(id))
        .ok_or(StatusCode::NOT_FOUND)?;
    let mut novo = corpo;
    novo["id"] = json!(id);
    *registo = novo;
    Ok(Json(registo_para_wire(registo)))
}

async fn apagar_registo(State(dados): State<Estado>, Path(id): Path<i64>) -> StatusCode {
    let mut dados = dados.lock().unwrap();
    let antes = dados.registos.len();
    dados.registos.retain(|r| r["id"] != json!(id));
    if dados.registos.len() == antes {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

// --- Validações ---

fn decidir_ficha(dados: &mut Dados, corpo: Value, resultado: &str) -> Result<Json<Value>, StatusCode> {
    let ficha_id = corpo["ficha_id"].clone();
    let Some(ficha) = dados.fichas.iter_mut().find(|f| f["id"] == ficha_id) else {
        return Err(StatusCode::NOT_FOUND);
    };
    ficha["estado"] = json!(resultado);

    let id = dados.id();
    let validacao = json!({
        "id": id,
        "ficha_id": corpo["ficha_id"],
        "encargado_id": corpo["encargado_id"],
        "data": corpo["data"],
        "resultado": resultado,
        "observacao": corpo.get("observacao").cloned().unwrap_or(Value::Null),
    });
    dados.validacoes.push(validacao.clone());
    Ok(Json(validacao))
}

async fn aprovar(
    State(dados): State<Estado>,
    Json(corpo): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut dados = dados.lock().unwrap();
    dados.aprovacoes += 1;
    decidir_ficha(&mut dados, corpo, "APPROVED")
}

async fn rejeitar(
    State(dados): State<Estado>,
    Json(corpo): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut dados = dados.lock().unwrap();
    dados.rejeicoes += 1;
    decidir_ficha(&mut dados, corpo, "REJECTED")
}

async fn listar_validacoes(
    State(dados): State<Estado>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let dados = dados.lock().unwrap();
    let selecao: Vec<Value> = dados
        .validacoes
        .iter()
        .filter(|v| {
            params
                .get("encargado")
                .map_or(true, |e| v["encargado_id"].to_string() == *e)
        })
        .cloned()
        .collect();
    Json(Value::Array(selecao))
}
