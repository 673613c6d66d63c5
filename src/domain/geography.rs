//! Administrative geography: regions contain zones, zones contain woredas.
//!
//! The hierarchy is admin-managed reference data. Entities claiming a
//! chain are validated for strict containment at create time; orders
//! additionally switch between structured references and free-text
//! location depending on their country.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::COVERED_COUNTRY;
use crate::domain::role::GeoRef;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Region {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Zone {
    pub id: Uuid,
    pub name: String,
    pub region_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Woreda {
    pub id: Uuid,
    pub name: String,
    pub zone_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Free-text location for orders placed outside the covered country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ManualLocation {
    pub region: String,
    pub zone: String,
    pub woreda: String,
}

/// Where an order is located, after the country switch has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderLocation {
    /// Inside the covered country: structured references, chain still to
    /// be validated against the store.
    Covered(GeoRef),
    /// Abroad: manual text only.
    Foreign(ManualLocation),
}

impl OrderLocation {
    /// Apply the country rule to raw request fields.
    ///
    /// Inside the covered country the full structured chain is required
    /// and manual text is rejected; outside it is the other way around.
    /// The two field families are never allowed to mix.
    pub fn resolve(
        country: &str,
        region_id: Option<Uuid>,
        zone_id: Option<Uuid>,
        woreda_id: Option<Uuid>,
        manual_region: Option<String>,
        manual_zone: Option<String>,
        manual_woreda: Option<String>,
    ) -> AppResult<Self> {
        let has_manual =
            manual_region.is_some() || manual_zone.is_some() || manual_woreda.is_some();
        let has_structured = region_id.is_some() || zone_id.is_some() || woreda_id.is_some();

        if country.trim().eq_ignore_ascii_case(COVERED_COUNTRY) {
            if has_manual {
                return Err(AppError::validation(format!(
                    "Orders inside {COVERED_COUNTRY} must use structured geography, not manual location text"
                )));
            }
            match (region_id, zone_id, woreda_id) {
                (Some(region_id), Some(zone_id), Some(woreda_id)) => Ok(OrderLocation::Covered(
                    GeoRef::new(Some(region_id), Some(zone_id), Some(woreda_id)),
                )),
                _ => Err(AppError::validation(format!(
                    "Orders inside {COVERED_COUNTRY} require region, zone and woreda references"
                ))),
            }
        } else {
            if has_structured {
                return Err(AppError::validation(
                    "Orders outside the covered country must not reference structured geography",
                ));
            }
            match (manual_region, manual_zone, manual_woreda) {
                (Some(region), Some(zone), Some(woreda))
                    if !region.trim().is_empty()
                        && !zone.trim().is_empty()
                        && !woreda.trim().is_empty() =>
                {
                    Ok(OrderLocation::Foreign(ManualLocation { region, zone, woreda }))
                }
                _ => Err(AppError::validation(
                    "Orders outside the covered country require manual location text",
                )),
            }
        }
    }

    /// Structured part, if any. Foreign orders scope to nothing.
    pub fn geo_ref(&self) -> GeoRef {
        match self {
            OrderLocation::Covered(geo) => *geo,
            OrderLocation::Foreign(_) => GeoRef::default(),
        }
    }

    pub fn manual(&self) -> Option<&ManualLocation> {
        match self {
            OrderLocation::Covered(_) => None,
            OrderLocation::Foreign(manual) => Some(manual),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (Uuid, Uuid, Uuid) {
        (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn covered_country_takes_full_structured_chain() {
        let (r, z, w) = ids();
        let location =
            OrderLocation::resolve("Ethiopia", Some(r), Some(z), Some(w), None, None, None)
                .unwrap();
        assert_eq!(
            location,
            OrderLocation::Covered(GeoRef::new(Some(r), Some(z), Some(w)))
        );
    }

    #[test]
    fn covered_country_rejects_manual_text() {
        let (r, z, w) = ids();
        let err = OrderLocation::resolve(
            "Ethiopia",
            Some(r),
            Some(z),
            Some(w),
            Some("Oromia".into()),
            None,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("manual"));
    }

    #[test]
    fn covered_country_rejects_partial_chain() {
        let (r, z, _) = ids();
        assert!(
            OrderLocation::resolve("Ethiopia", Some(r), Some(z), None, None, None, None).is_err()
        );
    }

    #[test]
    fn country_match_ignores_case_and_whitespace() {
        let (r, z, w) = ids();
        assert!(
            OrderLocation::resolve(" ethiopia ", Some(r), Some(z), Some(w), None, None, None)
                .is_ok()
        );
    }

    #[test]
    fn foreign_country_takes_manual_text() {
        let location = OrderLocation::resolve(
            "Kenya",
            None,
            None,
            None,
            Some("Nairobi".into()),
            Some("Westlands".into()),
            Some("Parklands".into()),
        )
        .unwrap();
        assert!(location.manual().is_some());
        assert!(location.geo_ref().is_empty());
    }

    #[test]
    fn foreign_country_rejects_structured_references() {
        let (r, _, _) = ids();
        assert!(OrderLocation::resolve(
            "Kenya",
            Some(r),
            None,
            None,
            Some("Nairobi".into()),
            Some("Westlands".into()),
            Some("Parklands".into()),
        )
        .is_err());
    }

    #[test]
    fn foreign_country_rejects_blank_manual_fields() {
        assert!(OrderLocation::resolve(
            "Kenya",
            None,
            None,
            None,
            Some("  ".into()),
            Some("Westlands".into()),
            Some("Parklands".into()),
        )
        .is_err());
    }
}
