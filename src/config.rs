use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expire_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub frontend_url: String,
    pub model_url: String,
    pub port: u16,
    pub smtp: SmtpConfig,
}

fn required(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("missing required environment variable {name}"))
}

impl AppConfig {
    /// Reads configuration from the environment. Any missing required
    /// variable is a hard startup failure.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = required("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            expire_days: required("JWT_EXPIRE")?
                .parse::<i64>()
                .context("JWT_EXPIRE must be a number of days")?,
        };
        let frontend_url = required("FRONTEND_URL")?;
        let model_url = strip_trailing_slashes(&required("MODEL_URL")?);
        let port = required("PORT")?
            .parse::<u16>()
            .context("PORT must be a valid port number")?;
        let smtp = SmtpConfig {
            host: required("SMTP_HOST")?,
            email: required("SMTP_EMAIL")?,
            password: required("SMTP_PASSWORD")?,
        };
        Ok(Self {
            database_url,
            jwt,
            frontend_url,
            model_url,
            port,
            smtp,
        })
    }
}

// The model service URL is joined with absolute paths, so a trailing
// slash would produce double slashes in every outbound request.
fn strip_trailing_slashes(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed() {
        assert_eq!(strip_trailing_slashes("http://model:8000/"), "http://model:8000");
        assert_eq!(strip_trailing_slashes("http://model:8000///"), "http://model:8000");
        assert_eq!(strip_trailing_slashes("http://model:8000"), "http://model:8000");
    }
}
