//! Command-line configuration.
//!
//! Every global option can also come from the environment.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `XAPI_LOG_LEVEL` | warn | Log level |
//! | `XAPI_VERSION` | nexacro | Namespace preset written on `Root` (`nexacro` or `xplatform`) |
//! | `XAPI_PARSE_TO_TYPES` | true | Convert values to typed values while parsing |
//! | `XAPI_DATASET_LAYOUT` | wrapped | Dataset placement on write (`wrapped` or `flat`) |

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use xapi_core::{DatasetLayout, XapiOptions, XapiVersion};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Parser)]
#[command(name = "xapi")]
#[command(about = "Check, reformat and inspect X-API dataset documents")]
#[command(version)]
pub struct CliConfig {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, env = "XAPI_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Namespace preset written on the Root element (nexacro, xplatform).
    #[arg(long, global = true, env = "XAPI_VERSION", default_value = "nexacro")]
    pub xapi_version: XapiVersion,

    /// Convert values to their declared types while parsing.
    #[arg(
        long,
        global = true,
        env = "XAPI_PARSE_TO_TYPES",
        default_value = "true",
        action = ArgAction::Set
    )]
    pub parse_to_types: bool,

    /// Dataset placement used when writing (wrapped, flat).
    #[arg(long, global = true, env = "XAPI_DATASET_LAYOUT", default_value = "wrapped")]
    pub dataset_layout: DatasetLayout,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Parse a document and print a summary of its contents.
    Check {
        /// Input file; standard input when omitted or "-".
        input: Option<PathBuf>,
    },

    /// Parse a document and write it back in canonical form.
    Format {
        /// Input file; standard input when omitted or "-".
        input: Option<PathBuf>,

        /// Output file; standard output when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a document and print the data model as JSON.
    ToJson {
        /// Input file; standard input when omitted or "-".
        input: Option<PathBuf>,

        /// Output file; standard output when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print compact JSON instead of pretty-printed JSON.
        #[arg(long)]
        compact: bool,
    },
}

impl CliConfig {
    /// Codec options derived from the global flags.
    pub fn options(&self) -> XapiOptions {
        XapiOptions::default()
            .with_version(self.xapi_version.clone())
            .with_parse_to_types(self.parse_to_types)
            .with_dataset_layout(self.dataset_layout)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log level '{}', expected one of: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }

        if let Err(option_errors) = self.options().validate() {
            errors.extend(option_errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::try_parse_from(["xapi", "check"]).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.options(), XapiOptions::default());
        assert!(config.validate().is_ok());
        assert!(matches!(config.command, Command::Check { input: None }));
    }

    #[test]
    fn test_global_flags() {
        let config = CliConfig::try_parse_from([
            "xapi",
            "format",
            "in.xml",
            "--xapi-version",
            "xplatform",
            "--parse-to-types",
            "false",
            "--dataset-layout",
            "flat",
            "-o",
            "out.xml",
        ])
        .unwrap();
        let options = config.options();
        assert_eq!(options.version, XapiVersion::XPLATFORM);
        assert!(!options.parse_to_types);
        assert_eq!(options.dataset_layout, DatasetLayout::Flat);
        match config.command {
            Command::Format { input, output } => {
                assert_eq!(input, Some(PathBuf::from("in.xml")));
                assert_eq!(output, Some(PathBuf::from("out.xml")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_preset() {
        assert!(CliConfig::try_parse_from(["xapi", "--xapi-version", "v5", "check"]).is_err());
        assert!(CliConfig::try_parse_from(["xapi", "--dataset-layout", "nested", "check"]).is_err());
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = CliConfig::try_parse_from(["xapi", "to-json", "--compact"]).unwrap();
        config.log_level = "loud".to_string();
        let errors = config.validate().unwrap_err();
        assert!(errors[0].contains("Invalid log level"));
    }
}
