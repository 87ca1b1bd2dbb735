//! Driver career profile

use serde::Serialize;

use crate::reference::{CareerStats, ReferenceData};
use crate::{PaddockError, Result};

/// Driver profile payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub struct DriverProfile {
    pub name: String,
    pub date_of_birth: Option<String>,
    pub nationality: Option<String>,
    pub career_stats: CareerStats,
}

/// Look a driver up by full name or driverRef and count their career statistics.
pub fn driver_profile(reference: &ReferenceData, name: &str) -> Result<DriverProfile> {
    let driver = reference
        .find_driver(name)
        .ok_or_else(|| PaddockError::DriverNotFound { name: name.to_string() })?;

    Ok(DriverProfile {
        name: driver.full_name(),
        date_of_birth: driver.dob.clone(),
        nationality: driver.nationality.clone(),
        career_stats: reference.career_stats(driver.driver_id),
    })
}
