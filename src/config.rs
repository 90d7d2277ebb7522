use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::platform::Platform;

const DEFAULT_TIMEOUT_MS: u64 = 3000;

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub delivery_timeout: Duration,
    pub routes: WebhookRoutes,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".into())
                .parse()
                .unwrap_or(3000),
            delivery_timeout: Duration::from_millis(
                env::var("DELIVERY_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_MS),
            ),
            routes: WebhookRoutes::from_vars(env::vars()),
        }
    }
}

/// Outbound webhook URLs keyed by environment variable name.
///
/// Captured once at start-up. A route suffix `ci` resolves
/// `WEBHOOK_URL_CI` for WeCom and `FEISHU_WEBHOOK_URL_CI` for Feishu; the
/// root route uses the bare names.
#[derive(Debug, Clone, Default)]
pub struct WebhookRoutes {
    urls: HashMap<String, String>,
}

impl WebhookRoutes {
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let urls = vars
            .into_iter()
            .filter(|(key, value)| {
                !value.trim().is_empty()
                    && Platform::ALL
                        .iter()
                        .any(|p| key.starts_with(p.env_prefix()))
            })
            .collect();
        Self { urls }
    }

    /// Configured `(platform, url)` pairs for a route, in platform order.
    pub fn targets(&self, path: Option<&str>) -> Vec<(Platform, String)> {
        let suffix = match path {
            Some(p) if !p.is_empty() => format!("_{}", p.to_uppercase()),
            _ => String::new(),
        };

        Platform::ALL
            .iter()
            .filter_map(|platform| {
                let key = format!("{}{}", platform.env_prefix(), suffix);
                self.urls.get(&key).map(|url| (*platform, url.clone()))
            })
            .collect()
    }
}
