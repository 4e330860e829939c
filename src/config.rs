use std::path::PathBuf;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_LOG_FILE: &str = "email_sending.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub log_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(std::env::var("PORT").ok(), std::env::var("EMAIL_LOG_FILE").ok())
    }

    fn from_vars(port: Option<String>, log_file: Option<String>) -> Self {
        let port = port
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let log_file = log_file
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        Self { port, log_file }
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_vars(None, None);
        assert_eq!(config.port, 5000);
        assert_eq!(config.log_file, PathBuf::from("email_sending.log"));
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn reads_port_and_log_file() {
        let config = Config::from_vars(Some("8080".into()), Some("/var/log/relay.log".into()));
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_file, PathBuf::from("/var/log/relay.log"));
    }

    #[test]
    fn invalid_port_falls_back_to_default() {
        assert_eq!(Config::from_vars(Some("http".into()), None).port, 5000);
        assert_eq!(Config::from_vars(Some("70000".into()), None).port, 5000);
    }
}
