#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("{0} environment variable not set")]
    MissingEnv(String),

    #[error("Neither {0} nor {1} environment variable is set")]
    MissingEnvPair(String, String),

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: String, value: String },
}
