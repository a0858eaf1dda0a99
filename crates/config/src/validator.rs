use crate::*;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("Service name is required")]
    MissingServiceName,

    #[error("Service port must be non-zero")]
    InvalidServicePort,

    #[error("Storage backend is postgres but no postgres section is configured")]
    MissingPostgresConfig,

    #[error("Postgres URL is required and must not contain unresolved placeholders: {0}")]
    InvalidPostgresUrl(String),

    #[error("Queue backend is redis but no redis section is configured")]
    MissingRedisConfig,

    #[error("Redis URL is required and must not contain unresolved placeholders: {0}")]
    InvalidRedisUrl(String),

    #[error("max_attempts must be at least 1")]
    InvalidMaxAttempts,

    #[error("concurrency must be at least 1")]
    InvalidConcurrency,

    #[error("No venues configured")]
    NoVenues,

    #[error("At least one venue must be enabled")]
    NoEnabledVenues,

    #[error("Venue {name}: {message}")]
    InvalidVenue { name: String, message: String },

    #[error("Duplicate venue name '{0}'")]
    DuplicateVenue(String),

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

/// Validate a loaded configuration, collecting every problem rather than
/// failing on the first one.
pub fn validate_config(config: &AppConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_service(&config.service, &mut report);
    validate_storage(&config.storage, &mut report);
    validate_queue(&config.queue, &mut report);
    validate_venues(&config.venues, &mut report);
    validate_logging(&config.logging, &mut report);

    report
}

fn validate_service(service: &ServiceConfig, report: &mut ValidationReport) {
    if service.name.trim().is_empty() {
        report.add_error(ValidationError::MissingServiceName);
    }
    if service.port == 0 {
        report.add_error(ValidationError::InvalidServicePort);
    }
}

fn validate_storage(storage: &StorageConfig, report: &mut ValidationReport) {
    match storage.backend {
        StorageBackend::Memory => {
            if storage.postgres.is_some() {
                report.add_warning(
                    "storage.postgres",
                    "postgres section is ignored when backend is memory",
                );
            }
        }
        StorageBackend::Postgres => match &storage.postgres {
            None => report.add_error(ValidationError::MissingPostgresConfig),
            Some(pg) => {
                if pg.url.trim().is_empty() || has_unresolved_env_vars(&pg.url) {
                    report.add_error(ValidationError::InvalidPostgresUrl(pg.url.clone()));
                }
            }
        },
    }
}

fn validate_queue(queue: &QueueConfig, report: &mut ValidationReport) {
    if queue.max_attempts == 0 {
        report.add_error(ValidationError::InvalidMaxAttempts);
    }
    if queue.concurrency == 0 {
        report.add_error(ValidationError::InvalidConcurrency);
    }
    match queue.backend {
        QueueBackend::Memory => {
            if queue.redis.is_some() {
                report.add_warning(
                    "queue.redis",
                    "redis section is ignored when backend is memory",
                );
            }
        }
        QueueBackend::Redis => match &queue.redis {
            None => report.add_error(ValidationError::MissingRedisConfig),
            Some(redis) => {
                if redis.url.trim().is_empty() || has_unresolved_env_vars(&redis.url) {
                    report.add_error(ValidationError::InvalidRedisUrl(redis.url.clone()));
                }
            }
        },
    }
}

fn validate_venues(venues: &[VenueConfig], report: &mut ValidationReport) {
    if venues.is_empty() {
        report.add_error(ValidationError::NoVenues);
        return;
    }
    if !venues.iter().any(|v| v.enabled) {
        report.add_error(ValidationError::NoEnabledVenues);
    }

    let mut seen = std::collections::HashSet::new();
    for venue in venues {
        if !seen.insert(venue.name.as_str()) {
            report.add_error(ValidationError::DuplicateVenue(venue.name.clone()));
        }
        if venue.name.trim().is_empty() {
            report.add_error(ValidationError::InvalidVenue {
                name: venue.name.clone(),
                message: "name must not be empty".to_string(),
            });
        }
        let [lo, hi] = venue.price_band;
        if !(lo > 0.0 && hi >= lo) {
            report.add_error(ValidationError::InvalidVenue {
                name: venue.name.clone(),
                message: format!("price_band [{}, {}] must satisfy 0 < lo <= hi", lo, hi),
            });
        }
        if !(0.0..1.0).contains(&venue.fee) {
            report.add_error(ValidationError::InvalidVenue {
                name: venue.name.clone(),
                message: format!("fee {} must be in [0, 1)", venue.fee),
            });
        }
    }
}

fn validate_logging(logging: &LoggingConfig, report: &mut ValidationReport) {
    match logging.format.to_lowercase().as_str() {
        "pretty" | "json" | "compact" => {}
        other => report.add_error(ValidationError::InvalidLogFormat(other.to_string())),
    }
    if logging.metrics_port.is_none() {
        report.add_default("logging.metrics_port", "disabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::generate_default_config;

    #[test]
    fn test_default_config_passes() {
        let report = validate_config(&generate_default_config());
        assert!(report.is_valid());
    }

    #[test]
    fn test_postgres_backend_requires_section() {
        let mut config = generate_default_config();
        config.storage.backend = StorageBackend::Postgres;
        let report = validate_config(&config);
        assert!(!report.is_valid());
        assert!(matches!(
            report.errors[0],
            ValidationError::MissingPostgresConfig
        ));
    }

    #[test]
    fn test_unresolved_redis_url_rejected() {
        let mut config = generate_default_config();
        config.queue.backend = QueueBackend::Redis;
        config.queue.redis = Some(RedisConfig {
            url: "${REDIS_URL}".to_string(),
            queue_key: "dexflow:orders".to_string(),
        });
        let report = validate_config(&config);
        assert!(!report.is_valid());
    }

    #[test]
    fn test_bad_venue_band_and_fee() {
        let mut config = generate_default_config();
        config.venues[0].price_band = [1.1, 0.9];
        config.venues[1].fee = 1.5;
        let report = validate_config(&config);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_duplicate_venue_names() {
        let mut config = generate_default_config();
        config.venues[1].name = config.venues[0].name.clone();
        let report = validate_config(&config);
        assert!(report
            .errors
            .iter()
            .any(|e| matches!(e, ValidationError::DuplicateVenue(_))));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = generate_default_config();
        config.queue.concurrency = 0;
        let report = validate_config(&config);
        assert!(!report.is_valid());
    }
}
