pub mod api_router;
pub mod auth;
pub mod config;
pub mod crm;
pub mod i18n;
pub mod shared;
pub mod views;
