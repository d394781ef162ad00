pub mod app;
pub mod chat;
pub mod config;
pub mod consts;
pub mod errors;
pub mod harness;
pub mod llm_client;
pub mod locale;
pub mod models;
pub mod probe;
pub mod sse;

#[cfg(test)]
mod test_utils;
