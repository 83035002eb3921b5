use async_trait::async_trait;
use fractic_server_error::ServerError;
use ron::from_str;

use crate::{
    data::models::config_model::ConfigModel,
    entities::TasasConfig,
    errors::{InvalidRon, ReadError},
};

#[async_trait]
pub(crate) trait ConfigRonDatasource: Send + Sync {
    fn from_string(&self, s: &str) -> Result<TasasConfig, ServerError>;

    async fn from_file<P>(&self, path: P) -> Result<TasasConfig, ServerError>
    where
        P: AsRef<std::path::Path> + Send;
}

pub(crate) struct ConfigRonDatasourceImpl;

impl ConfigRonDatasourceImpl {
    pub(crate) fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConfigRonDatasource for ConfigRonDatasourceImpl {
    fn from_string(&self, s: &str) -> Result<TasasConfig, ServerError> {
        let model: ConfigModel =
            from_str(s).map_err(|e| InvalidRon::with_debug("TasasConfig", &e))?;
        model.try_into()
    }

    async fn from_file<P>(&self, path: P) -> Result<TasasConfig, ServerError>
    where
        P: AsRef<std::path::Path> + Send,
    {
        self.from_string(
            &tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ReadError::with_debug(&e))?,
        )
    }
}
