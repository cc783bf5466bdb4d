//! Command-line arguments for the splash simulator.

use clap::Parser;
use std::path::PathBuf;

use splash_gate::{ConfigError, LateReadinessPolicy, SplashConfig};

/// Splash simulator - runs the launch handoff end to end
#[derive(Parser, Debug, Clone)]
#[command(name = "splash-sim")]
#[command(about = "Play the splash animation, probe the session and report where it navigates")]
pub struct Args {
    /// YAML splash configuration (defaults apply when omitted)
    #[arg(long, env = "SPLASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the minimum display time (ms)
    #[arg(long, env = "SPLASH_MIN_DISPLAY_MS")]
    pub min_display_ms: Option<u64>,

    /// Hold an early terminal event until the minimum display time elapses
    #[arg(long, default_value = "false")]
    pub wait_for_readiness: bool,

    /// Simulate a signed-in identity session for this user id
    #[arg(long, env = "SPLASH_USER_ID")]
    pub user_id: Option<String>,

    /// Phone-login store file
    #[arg(long, env = "SPLASH_PHONE_STORE", default_value = "splash-session.json")]
    pub phone_store: PathBuf,

    /// Write the phone-login flag before launching
    #[arg(long)]
    pub set_phone_login: Option<bool>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Load the YAML config, if any, and apply command-line overrides.
    pub fn splash_config(&self) -> Result<SplashConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => {
                let yaml = std::fs::read_to_string(path).map_err(|e| {
                    ConfigError::Invalid(format!("cannot read {}: {}", path.display(), e))
                })?;
                SplashConfig::from_yaml(&yaml)?
            }
            None => SplashConfig::default(),
        };

        if let Some(ms) = self.min_display_ms {
            config.readiness.min_display_ms = ms;
        }
        if self.wait_for_readiness {
            config.gate.late_readiness = LateReadinessPolicy::WaitForReadiness;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let args = Args::parse_from([
            "splash-sim",
            "--min-display-ms",
            "3000",
            "--wait-for-readiness",
        ]);
        let config = args.splash_config().unwrap();

        assert_eq!(config.readiness.min_display_ms, 3000);
        assert_eq!(config.gate.late_readiness, LateReadinessPolicy::WaitForReadiness);
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["splash-sim"]);
        assert_eq!(args.splash_config().unwrap(), SplashConfig::default());
        assert_eq!(args.set_phone_login, None);
    }
}
