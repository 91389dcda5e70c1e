pub mod cli;
pub mod clients;
pub mod config;
pub mod domain;
pub mod errors;
pub mod extraction;
pub mod freshness;
pub mod services;
pub mod storage;
