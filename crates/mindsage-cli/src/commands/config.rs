use super::GlobalOptions;
use anyhow::{Context, Result};

pub fn run(options: &GlobalOptions, init: bool) -> Result<()> {
    let config = options.load_config()?;

    if init {
        let service = options.config_service()?;
        service
            .save(&config)
            .with_context(|| format!("Failed to write {}", service.path().display()))?;
        println!("Wrote {}", service.path().display());
    }

    println!("# effective host: {}", config.host());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
