//! Config command handler

use hotel_probe::SuiteConfig;

use crate::commands::{ConfigArgs, FormatArg};
use crate::error::{CliError, CliResult};

/// Effective configuration with the password masked
pub fn render_config(config: &SuiteConfig, format: FormatArg) -> CliResult<String> {
    let view = config.redacted();
    match format {
        FormatArg::Json => Ok(serde_json::to_string_pretty(&view)?),
        FormatArg::Text => serde_yaml_ng::to_string(&view)
            .map_err(|e| CliError::config(format!("cannot encode configuration: {e}"))),
    }
}

/// Execute the config command
pub fn execute_config(args: &ConfigArgs) -> CliResult<()> {
    let config = SuiteConfig::load(args.config.as_deref())?;
    let rendered = render_config(&config, args.format)?;
    println!("{}", rendered.trim_end());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_never_printed() {
        let config = SuiteConfig::default().with_credentials("admin", "s3cret-pass");
        for format in [FormatArg::Text, FormatArg::Json] {
            let rendered = render_config(&config, format).unwrap();
            assert!(!rendered.contains("s3cret-pass"));
            assert!(rendered.contains("********"));
        }
    }

    #[test]
    fn test_yaml_lists_derived_urls() {
        let config = SuiteConfig::default().with_base_url("https://hotel.test");
        let rendered = render_config(&config, FormatArg::Text).unwrap();
        assert!(rendered.contains("https://hotel.test"));
        assert!(rendered.contains("api_url:"));
        assert!(rendered.contains("rooms_path:"));
    }
}
