// src/models/mod.rs
pub mod atividade;
pub mod disciplina;
pub mod ficha;
pub mod notificacao;
pub mod registo;
pub mod user;
pub mod validacao;
