//! Environment source: `VPK_EXTRACT_<SECTION>__<KEY>`, e.g. `VPK_EXTRACT_EXTRACT__DELAY_MS=50`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

pub const ENV_PREFIX: &str = "VPK_EXTRACT";

/// Add environment overrides. `extract.patterns` is read as a comma-separated list.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("extract.patterns"),
    ))
}
