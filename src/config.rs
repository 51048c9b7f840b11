use std::net::IpAddr;

use ipnet::IpNet;

pub const DEFAULT_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub rate_limit: u32,
    pub rate_limit_window_secs: u64,
    pub log_level: String,
    pub smtp: SmtpConfig,
    pub captcha: Option<CaptchaConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// `true` selects implicit TLS (SMTPS, typically port 465); otherwise STARTTLS.
    pub secure: bool,
    pub user: String,
    pub pass: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone)]
pub struct CaptchaConfig {
    pub secret: String,
    pub verify_url: String,
    /// Submissions scoring below this are rejected. 0 accepts providers
    /// that report no score at all.
    pub min_score: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("FORMRELAY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_HOST: {e}"))?;

        let port: u16 = env_or("FORMRELAY_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_PORT: {e}"))?;

        let allowed_origins: Vec<String> = env_or("FORMRELAY_ALLOWED_ORIGINS", "")
            .split(',')
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_body_size: usize = env_or("FORMRELAY_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("FORMRELAY_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid FORMRELAY_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rate_limit: u32 = env_or("FORMRELAY_RATE_LIMIT", "5")
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_RATE_LIMIT: {e}"))?;

        let rate_limit_window_secs: u64 = env_or("FORMRELAY_RATE_LIMIT_WINDOW_SECS", "60")
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_RATE_LIMIT_WINDOW_SECS: {e}"))?;

        let log_level = env_or("FORMRELAY_LOG_LEVEL", "info");

        let smtp_user = env_required("FORMRELAY_SMTP_USER")?;
        let smtp = SmtpConfig {
            host: env_required("FORMRELAY_SMTP_HOST")?,
            port: env_or("FORMRELAY_SMTP_PORT", "587")
                .parse()
                .map_err(|e| format!("Invalid FORMRELAY_SMTP_PORT: {e}"))?,
            secure: env_or("FORMRELAY_SMTP_SECURE", "false") == "true",
            from: env_or("FORMRELAY_SMTP_FROM", &smtp_user),
            user: smtp_user,
            pass: env_required("FORMRELAY_SMTP_PASS")?,
            to: env_required("FORMRELAY_SMTP_TO")?,
        };

        let captcha = match std::env::var("FORMRELAY_CAPTCHA_SECRET").ok() {
            Some(secret) if !secret.is_empty() => Some(CaptchaConfig {
                secret,
                verify_url: env_or("FORMRELAY_CAPTCHA_VERIFY_URL", DEFAULT_VERIFY_URL),
                min_score: env_or("FORMRELAY_CAPTCHA_MIN_SCORE", "0.5")
                    .parse()
                    .map_err(|e| format!("Invalid FORMRELAY_CAPTCHA_MIN_SCORE: {e}"))?,
            }),
            _ => None,
        };

        Ok(Config {
            host,
            port,
            allowed_origins,
            max_body_size,
            trusted_proxies,
            rate_limit,
            rate_limit_window_secs,
            log_level,
            smtp,
            captcha,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
