use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub swagger: SwaggerConfig,
    pub reports: ReportsConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Tuning for the report store, map clustering and dashboard metrics
#[derive(Debug, Clone, PartialEq)]
pub struct ReportsConfig {
    /// JSON file loaded into the store at startup
    pub seed_file: Option<PathBuf>,
    /// Grid cell edge used by the map clusters
    pub cluster_cell_size_degrees: f64,
    /// Default radius for the nearby-reports lookup
    pub nearby_radius_meters: f64,
    /// Active reports older than this count as overdue
    pub overdue_after_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            // Only error if it's not "file not found" - that's acceptable
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            reports: ReportsConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024; // 1MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "CivicReport API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for CivicReport".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            seed_file: None,
            cluster_cell_size_degrees: Self::DEFAULT_CLUSTER_CELL_SIZE_DEGREES,
            nearby_radius_meters: Self::DEFAULT_NEARBY_RADIUS_METERS,
            overdue_after_days: Self::DEFAULT_OVERDUE_AFTER_DAYS,
        }
    }
}

impl ReportsConfig {
    const DEFAULT_CLUSTER_CELL_SIZE_DEGREES: f64 = 0.01; // roughly 1km
    const DEFAULT_NEARBY_RADIUS_METERS: f64 = 500.0;
    const DEFAULT_OVERDUE_AFTER_DAYS: i64 = 3;

    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let seed_file = lookup("REPORTS_SEED_FILE")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let cluster_cell_size_degrees = lookup("CLUSTER_CELL_SIZE_DEGREES")
            .unwrap_or_else(|| Self::DEFAULT_CLUSTER_CELL_SIZE_DEGREES.to_string())
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .ok_or_else(|| "CLUSTER_CELL_SIZE_DEGREES must be a positive number".to_string())?;

        let nearby_radius_meters = lookup("NEARBY_RADIUS_METERS")
            .unwrap_or_else(|| Self::DEFAULT_NEARBY_RADIUS_METERS.to_string())
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .ok_or_else(|| "NEARBY_RADIUS_METERS must be a positive number".to_string())?;

        let overdue_after_days = lookup("OVERDUE_AFTER_DAYS")
            .unwrap_or_else(|| Self::DEFAULT_OVERDUE_AFTER_DAYS.to_string())
            .parse::<i64>()
            .ok()
            .filter(|v| *v >= 0)
            .ok_or_else(|| "OVERDUE_AFTER_DAYS must be a non-negative number".to_string())?;

        Ok(Self {
            seed_file,
            cluster_cell_size_degrees,
            nearby_radius_meters,
            overdue_after_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_reports_config_defaults() {
        let config = ReportsConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ReportsConfig::default());
        assert_eq!(config.cluster_cell_size_degrees, 0.01);
        assert_eq!(config.nearby_radius_meters, 500.0);
        assert_eq!(config.overdue_after_days, 3);
    }

    #[test]
    fn test_reports_config_overrides() {
        let config = ReportsConfig::from_lookup(lookup(&[
            ("REPORTS_SEED_FILE", "data/seed_reports.json"),
            ("CLUSTER_CELL_SIZE_DEGREES", "0.05"),
            ("NEARBY_RADIUS_METERS", "250"),
            ("OVERDUE_AFTER_DAYS", "7"),
        ]))
        .unwrap();

        assert_eq!(
            config.seed_file,
            Some(PathBuf::from("data/seed_reports.json"))
        );
        assert_eq!(config.cluster_cell_size_degrees, 0.05);
        assert_eq!(config.nearby_radius_meters, 250.0);
        assert_eq!(config.overdue_after_days, 7);
    }

    #[test]
    fn test_reports_config_rejects_invalid_numbers() {
        for (key, value) in [
            ("CLUSTER_CELL_SIZE_DEGREES", "0"),
            ("CLUSTER_CELL_SIZE_DEGREES", "abc"),
            ("NEARBY_RADIUS_METERS", "-10"),
            ("OVERDUE_AFTER_DAYS", "-1"),
        ] {
            assert!(
                ReportsConfig::from_lookup(lookup(&[(key, value)])).is_err(),
                "{}={} should be rejected",
                key,
                value
            );
        }
    }

    #[test]
    fn test_swagger_credentials() {
        let swagger = SwaggerConfig {
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            title: "CivicReport API".to_string(),
            version: "0.1.0".to_string(),
            description: String::new(),
        };
        assert_eq!(swagger.credentials().as_deref(), Some("admin:secret"));

        let open = SwaggerConfig {
            password: None,
            ..swagger
        };
        assert_eq!(open.credentials(), None);
    }
}
