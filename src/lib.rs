//! Ganado API Library
//!
//! Core of the livestock management backend: the movement & withdrawal
//! consistency engine plus its HTTP surface.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use services::administrations::AdministrationService;
use services::inventory::InventoryService;
use services::movements::MovementService;
use services::withdrawal::WithdrawalService;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub administrations: AdministrationService,
    pub movements: MovementService,
    pub inventory: InventoryService,
    pub withdrawals: WithdrawalService,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        event_sender: events::EventSender,
    ) -> Self {
        Self {
            administrations: AdministrationService::new(db.clone(), event_sender.clone()),
            movements: MovementService::new(db.clone(), event_sender.clone()),
            inventory: InventoryService::new(db.clone(), event_sender.clone()),
            withdrawals: WithdrawalService::new(db.clone()),
            db,
            config,
            event_sender,
        }
    }
}

/// All v1 engine routes, nested under `/api/v1` by the binary.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/administrations", handlers::administrations::router())
        .nest("/movements", handlers::movements::router())
        .nest("/inventory", handlers::inventory::router())
        .merge(handlers::withdrawals::router())
}
