//! catalog-server — Mumbies catalog service
//!
//! HTTP service that owns the product catalog:
//! - Reconciles the upstream catalog feed into the local store (admin trigger)
//! - Serves catalog browsing endpoints for the storefront
//! - Admin JWT authentication

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod state;
pub mod sync;
