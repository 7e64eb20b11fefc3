use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, RatingSettings, RiskSettings};

/// Loads the engine configuration from the `config.toml` file.
///
/// Every section is optional; missing values fall back to the fixed
/// reference constants baked into the `Default` impls.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`.
        .add_source(config::File::with_name("config.toml").required(false))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct.
    let config = builder.try_deserialize::<Config>()?;

    Ok(config)
}
