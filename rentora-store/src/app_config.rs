use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// How long a new pending booking stays locked for payment.
    #[serde(default = "default_lock_minutes")]
    pub booking_lock_minutes: i64,
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            booking_lock_minutes: default_lock_minutes(),
        }
    }
}

fn default_lock_minutes() -> i64 { 30 }

/// Upper bound for `booking_lock_minutes`: one week.
pub const MAX_BOOKING_LOCK_MINUTES: i64 = 7 * 24 * 60;

fn default_max_connections() -> u32 { 5 }

fn default_acquire_timeout_secs() -> u64 { 3 }

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Seconds a request waits for a pooled connection before failing.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Developer overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `RENTORA_DATABASE__URL=postgres://...`
            .add_source(config::Environment::with_prefix("RENTORA").separator("__"))
            .build()?;

        let config: Config = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make the service misbehave at runtime
    /// rather than at startup.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let lock = self.business_rules.booking_lock_minutes;
        if !(1..=MAX_BOOKING_LOCK_MINUTES).contains(&lock) {
            return Err(config::ConfigError::Message(format!(
                "business_rules.booking_lock_minutes must be between 1 and {}, got {}",
                MAX_BOOKING_LOCK_MINUTES, lock
            )));
        }
        if self.database.max_connections == 0 {
            return Err(config::ConfigError::Message(
                "database.max_connections must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_rules_default_to_thirty_minute_lock() {
        let raw = config::Config::builder()
            .set_override("server.port", 8080)
            .unwrap()
            .set_override("database.url", "postgres://localhost/rentora")
            .unwrap()
            .set_override("auth.jwt_secret", "secret")
            .unwrap()
            .build()
            .unwrap();

        let cfg: Config = raw.try_deserialize().unwrap();
        assert_eq!(cfg.business_rules.booking_lock_minutes, 30);
        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.database.acquire_timeout_secs, 3);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_lock_window_can_be_overridden() {
        let raw = config::Config::builder()
            .set_override("server.port", 8080)
            .unwrap()
            .set_override("database.url", "postgres://localhost/rentora")
            .unwrap()
            .set_override("auth.jwt_secret", "secret")
            .unwrap()
            .set_override("business_rules.booking_lock_minutes", 45)
            .unwrap()
            .build()
            .unwrap();

        let cfg: Config = raw.try_deserialize().unwrap();
        assert_eq!(cfg.business_rules.booking_lock_minutes, 45);
    }

    #[test]
    fn test_unusable_lock_windows_fail_validation() {
        for minutes in [0_i64, -10, MAX_BOOKING_LOCK_MINUTES + 1, i64::MAX / 1000] {
            let raw = config::Config::builder()
                .set_override("server.port", 8080)
                .unwrap()
                .set_override("database.url", "postgres://localhost/rentora")
                .unwrap()
                .set_override("auth.jwt_secret", "secret")
                .unwrap()
                .set_override("business_rules.booking_lock_minutes", minutes)
                .unwrap()
                .build()
                .unwrap();

            let cfg: Config = raw.try_deserialize().unwrap();
            let err = cfg.validate().unwrap_err();
            assert!(err.to_string().contains("booking_lock_minutes"));
        }
    }
}
