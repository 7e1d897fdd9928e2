pub mod backend;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod diagnostics;
pub mod doctor;
pub mod guard;
pub mod overlay;
pub mod resolver;
pub mod session;
pub mod steps;
