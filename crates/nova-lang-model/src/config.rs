use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use nova_modules::{AUTOMATIC_MODULE_NAME, JAVA_BASE};

use crate::error::{ModelError, Result};

/// Knobs for building a [`crate::Universe`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct ModelConfig {
    /// Module used to resolve well-known types (`java.lang.Object`, boxes, `Cloneable`, ...).
    ///
    /// When no module with this name is registered, the unnamed module is used instead.
    pub base_module: String,

    /// Manifest attribute naming an automatic module.
    pub automatic_module_attribute: String,

    /// Named modules read the base module even when their descriptor omits it.
    pub implicit_base_readability: bool,

    /// Derive an automatic module name from the archive file name when an archive has neither
    /// a module descriptor nor the manifest attribute. When disabled such archives join the
    /// unnamed module.
    pub derive_automatic_module_names: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_module: JAVA_BASE.to_string(),
            automatic_module_attribute: AUTOMATIC_MODULE_NAME.to_string(),
            implicit_base_readability: true,
            derive_automatic_module_names: false,
        }
    }
}

impl ModelConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ModelConfig =
            toml::from_str(text).map_err(|err| ModelError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_module.trim().is_empty() {
            return Err(ModelError::Config("`base_module` must not be empty".to_string()));
        }
        if self.automatic_module_attribute.trim().is_empty() {
            return Err(ModelError::Config(
                "`automatic_module_attribute` must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// JSON schema for [`ModelConfig`], for editor tooling.
pub fn json_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(ModelConfig)
}
