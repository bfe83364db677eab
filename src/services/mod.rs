// src/services/mod.rs
pub mod admin_service;
pub mod notificacao_service;
pub mod registo_service;
pub mod session_service;
pub mod validacao_service;
