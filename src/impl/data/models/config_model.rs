use fractic_server_error::ServerError;

use crate::entities::{
    EngineerAssignment, EngineerRouting, SplitRule, TasasConfig, VisaCategory,
};

#[derive(Debug, serde_derive::Deserialize)]
pub(crate) struct EngineerModel {
    pub(crate) name: String,
    pub(crate) categories: Vec<VisaCategory>,
}

#[derive(Debug, serde_derive::Deserialize)]
pub(crate) struct SplitModel {
    pub(crate) consejo_pct: f64,
    pub(crate) engineer_pct: f64,
}

#[derive(Debug, serde_derive::Deserialize)]
pub(crate) struct ConfigModel {
    pub(crate) engineers: Vec<EngineerModel>,
    #[serde(default)]
    pub(crate) split: Option<SplitModel>,
}

impl TryFrom<ConfigModel> for TasasConfig {
    type Error = ServerError;

    fn try_from(model: ConfigModel) -> Result<TasasConfig, Self::Error> {
        let routing = EngineerRouting::new(
            model
                .engineers
                .into_iter()
                .map(|e| EngineerAssignment {
                    name: e.name,
                    categories: e.categories,
                })
                .collect(),
        )?;
        let split = match model.split {
            Some(s) => SplitRule::new(s.consejo_pct, s.engineer_pct)?,
            None => SplitRule::default(),
        };
        Ok(TasasConfig { routing, split })
    }
}
