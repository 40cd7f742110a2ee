//! Storefront API Library
//!
//! This library provides the core functionality for the storefront backend:
//! catalogue, cart and checkout workflows, OIDC authentication, order
//! notifications, and their PostgreSQL persistence.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod notifications;
pub mod services;
