pub mod default_config;
pub mod embedding_config;
