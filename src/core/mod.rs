pub mod app;
pub mod builtin_providers;
pub mod chat_stream;
pub mod config;
pub mod credentials;
pub mod file_browser;
pub mod message;
pub mod providers;
pub mod session;
