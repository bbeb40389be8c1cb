//! Dispidi - mass-dispatch relay for WAHA-compatible WhatsApp HTTP gateways.

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod gateway;
pub mod handlers;
pub mod phone;
pub mod response;
pub mod server;
pub mod webhook;
