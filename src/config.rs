use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub wallet: WalletDefaults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Where the billing API lives. Every call goes to `{base_url}{api_prefix}{path}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_prefix() -> String {
    "/api/v1".into()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// User selected when the dashboard starts.
    pub default_user_id: String,
    /// Currency used to look up hourly rates on resource cards.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Max refresh events buffered for /ws/refresh subscribers (slow clients may lag).
    #[serde(default = "default_refresh_broadcast_capacity")]
    pub refresh_broadcast_capacity: usize,
}

fn default_currency() -> String {
    "USD".into()
}

fn default_refresh_broadcast_capacity() -> usize {
    16
}

/// Settings for the wallet the sidebar provisions when a user has none.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletDefaults {
    #[serde(default = "default_balance")]
    pub default_balance: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub auto_recharge: bool,
    #[serde(default)]
    pub allow_negative: bool,
}

fn default_balance() -> f64 {
    1000.0
}

impl Default for WalletDefaults {
    fn default() -> Self {
        Self {
            default_balance: default_balance(),
            currency: default_currency(),
            auto_recharge: false,
            allow_negative: false,
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let mut config: AppConfig = toml::from_str(s)?;
        config.dashboard.currency = config.dashboard.currency.to_uppercase();
        config.wallet.currency = config.wallet.currency.to_uppercase();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"),
            "api.base_url must be an http(s) URL, got {:?}",
            self.api.base_url
        );
        anyhow::ensure!(
            self.api.api_prefix.is_empty() || self.api.api_prefix.starts_with('/'),
            "api.api_prefix must start with '/', got {:?}",
            self.api.api_prefix
        );
        anyhow::ensure!(
            self.api.timeout_secs > 0,
            "api.timeout_secs must be > 0, got {}",
            self.api.timeout_secs
        );
        anyhow::ensure!(
            !self.dashboard.default_user_id.trim().is_empty(),
            "dashboard.default_user_id must be non-empty"
        );
        anyhow::ensure!(
            !self.dashboard.currency.is_empty(),
            "dashboard.currency must be non-empty"
        );
        anyhow::ensure!(
            self.dashboard.refresh_broadcast_capacity > 0,
            "dashboard.refresh_broadcast_capacity must be > 0, got {}",
            self.dashboard.refresh_broadcast_capacity
        );
        anyhow::ensure!(
            self.wallet.default_balance.is_finite() && self.wallet.default_balance >= 0.0,
            "wallet.default_balance must be a non-negative number, got {}",
            self.wallet.default_balance
        );
        anyhow::ensure!(
            !self.wallet.currency.is_empty(),
            "wallet.currency must be non-empty"
        );
        Ok(())
    }

    /// Billing API root including the prefix, without a trailing slash.
    pub fn api_root(&self) -> String {
        format!(
            "{}{}",
            self.api.base_url.trim_end_matches('/'),
            self.api.api_prefix.trim_end_matches('/')
        )
    }
}
