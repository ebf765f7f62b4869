//! `/health` endpoint.

use std::time::Instant;

use serde::Serialize;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `"ok"` when the database answers, `"degraded"` otherwise.
    pub status: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    /// `"ok"`, or the reason the database could not be reached.
    pub database: String,
}

impl HealthResponse {
    /// Whether every dependency is healthy.
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Build a health response from the result of a database ping.
pub fn health_check<E: std::fmt::Display>(
    start_time: Instant,
    database: Result<(), E>,
) -> HealthResponse {
    let (status, database) = match database {
        Ok(()) => ("ok", "ok".to_string()),
        Err(e) => ("degraded", e.to_string()),
    };
    HealthResponse {
        status: status.into(),
        uptime_secs: start_time.elapsed().as_secs(),
        database,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_ok() {
        let resp = health_check::<String>(Instant::now(), Ok(()));
        assert!(resp.is_ok());
        assert_eq!(resp.database, "ok");
        assert!(resp.uptime_secs < 2);
    }

    #[test]
    fn uptime_increases() {
        let start = Instant::now()
            .checked_sub(std::time::Duration::from_secs(60))
            .unwrap();
        let resp = health_check::<String>(start, Ok(()));
        assert!(resp.uptime_secs >= 59);
    }

    #[test]
    fn database_failure_is_degraded() {
        let resp = health_check(Instant::now(), Err("pool timed out"));
        assert!(!resp.is_ok());
        assert_eq!(resp.status, "degraded");
        assert_eq!(resp.database, "pool timed out");
    }

    #[test]
    fn serialization() {
        let resp = health_check::<String>(Instant::now(), Ok(()));
        let parsed = serde_json::to_value(&resp).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["database"], "ok");
        assert!(parsed["uptime_secs"].is_number());
    }
}
