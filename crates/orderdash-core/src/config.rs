use chrono_tz::Tz;

use crate::aggregate::DashboardOptions;
use crate::error::CoreError;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Calendar used for day buckets and "today".
    pub timezone: Tz,
    pub dashboard_days: u32,
    pub orders_chart_days: u32,
    pub status_window_days: u32,
    pub recent_limit: usize,
    pub cors_origins: Vec<String>,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timezone_raw = lookup("ORDERDASH_TIMEZONE").unwrap_or_else(|| "UTC".to_string());
        let timezone = timezone_raw
            .trim()
            .parse::<Tz>()
            .map_err(|_| CoreError::InvalidTimezone(timezone_raw.clone()))?;

        Ok(Self {
            port: lookup("ORDERDASH_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|e| CoreError::InvalidConfig(format!("invalid port: {e}")))?,
            timezone,
            dashboard_days: window_days(&lookup, "ORDERDASH_DASHBOARD_DAYS", 7)?,
            orders_chart_days: window_days(&lookup, "ORDERDASH_ORDERS_CHART_DAYS", 14)?,
            status_window_days: window_days(&lookup, "ORDERDASH_STATUS_WINDOW_DAYS", 30)?,
            recent_limit: lookup("ORDERDASH_RECENT_LIMIT")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|e| CoreError::InvalidConfig(format!("invalid recent limit: {e}")))?,
            cors_origins: lookup("ORDERDASH_CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            seed_demo: lookup("ORDERDASH_SEED_DEMO")
                .map(|v| v == "true")
                .unwrap_or(false),
        })
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            window_days: self.dashboard_days,
            status_window_days: self.status_window_days,
            recent_limit: self.recent_limit,
        }
    }
}

fn window_days<F>(lookup: &F, key: &str, default: u32) -> Result<u32, CoreError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<u32>() {
        Ok(0) => Err(CoreError::InvalidConfig(format!("{key} must be at least 1"))),
        Ok(days) => Ok(days),
        Err(e) => Err(CoreError::InvalidConfig(format!("invalid {key}: {e}"))),
    }
}
