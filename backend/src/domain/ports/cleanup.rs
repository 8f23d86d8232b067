//! Driving port for the manager-triggered storage cleanup sweep.

use async_trait::async_trait;
use serde_json::json;

use crate::domain::Error;

/// Request to sweep aged photo objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupRequest {
    /// Objects strictly older than this many days become candidates.
    pub days_old: i64,
}

/// Outcome of a completed sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Number of objects deleted.
    pub deleted: usize,
}

/// Reject sweep horizons shorter than one day.
pub fn validate_days_old(days_old: i64) -> Result<(), Error> {
    if days_old < 1 {
        return Err(
            Error::invalid_request("daysOld must be at least 1").with_details(json!({
                "field": "daysOld",
                "value": days_old,
                "code": "invalid_days_old",
            })),
        );
    }
    Ok(())
}

/// Driving port for the cleanup sweep.
#[async_trait]
pub trait CleanupSweep: Send + Sync {
    /// Delete unreferenced photo objects older than the requested horizon.
    async fn sweep(&self, request: CleanupRequest) -> Result<SweepOutcome, Error>;
}

/// Fixture sweep for handler tests without storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCleanupSweep;

#[async_trait]
impl CleanupSweep for FixtureCleanupSweep {
    async fn sweep(&self, request: CleanupRequest) -> Result<SweepOutcome, Error> {
        validate_days_old(request.days_old)?;
        Ok(SweepOutcome { deleted: 0 })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for sweep validation.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn horizons_below_one_day_fail(#[case] days_old: i64) {
        let err = validate_days_old(days_old).expect_err("short horizon fails");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(1)]
    #[case(30)]
    fn valid_horizons_pass(#[case] days_old: i64) {
        validate_days_old(days_old).expect("valid horizon passes");
    }
}
