//! Admin aggregation reports and dashboard statistics.
//!
//! Grouped counts always list every variant of the grouped enum, in the
//! enum's declaration order, with zero where nothing matched. Consumers can
//! therefore rely on the partition summing to the reported total.

use std::str::FromStr;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use super::{
    FieldError, FieldErrorCode, ListingId, ListingStatus, PropertyType, Role, UserId,
};
use crate::domain::search::present;

/// The supported report kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Users,
    Properties,
    Activity,
}

impl FromStr for ReportKind {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "users" => Ok(Self::Users),
            "properties" => Ok(Self::Properties),
            "activity" => Ok(Self::Activity),
            other => Err(FieldError::new(
                "type",
                FieldErrorCode::InvalidReportType,
                "invalid report type",
            )
            .with_value(other)),
        }
    }
}

/// Optional creation-time window. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

fn parse_instant(
    field: &'static str,
    raw: &str,
    end_of_day: bool,
) -> Result<DateTime<Utc>, FieldError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    let invalid = || {
        FieldError::new(
            field,
            FieldErrorCode::InvalidDate,
            format!("{field} must be an RFC 3339 timestamp or YYYY-MM-DD date"),
        )
        .with_value(raw)
    };
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
    if end_of_day {
        // Inclusive bound: one nanosecond before the next midnight.
        let next = date.checked_add_days(Days::new(1)).ok_or_else(invalid)?;
        let midnight = next.and_time(NaiveTime::MIN).and_utc();
        Ok(midnight - chrono::Duration::nanoseconds(1))
    } else {
        Ok(date.and_time(NaiveTime::MIN).and_utc())
    }
}

impl DateRange {
    /// Parse optional `startDate` and `endDate` parameters.
    ///
    /// A bare `endDate` calendar date covers the whole day.
    pub fn parse(start: Option<String>, end: Option<String>) -> Result<Self, FieldError> {
        let start = present(start)
            .map(|raw| parse_instant("startDate", &raw, false))
            .transpose()?;
        let end = present(end)
            .map(|raw| parse_instant("endDate", &raw, true))
            .transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(FieldError::new(
                    "startDate",
                    FieldErrorCode::InvalidRange,
                    "startDate must not be after endDate",
                )
                .with_value(start.to_rfc3339()));
            }
        }
        Ok(Self { start, end })
    }

    /// Whether `at` lies inside the window.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }
}

/// Count of users holding one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleCount {
    pub role: Role,
    pub count: u64,
}

/// Count of listings of one property type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub count: u64,
}

/// Count of listings in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ListingStatus,
    pub count: u64,
}

fn count_of<K: PartialEq>(counts: &[(K, u64)], key: &K) -> u64 {
    counts
        .iter()
        .filter(|(candidate, _)| candidate == key)
        .map(|(_, count)| count)
        .sum()
}

/// Expand sparse `(role, count)` rows into one entry per role.
pub fn role_counts(counts: &[(Role, u64)]) -> Vec<RoleCount> {
    Role::ALL
        .into_iter()
        .map(|role| RoleCount {
            role,
            count: count_of(counts, &role),
        })
        .collect()
}

/// Expand sparse `(type, count)` rows into one entry per property type.
pub fn type_counts(counts: &[(PropertyType, u64)]) -> Vec<TypeCount> {
    PropertyType::ALL
        .iter()
        .copied()
        .map(|property_type| TypeCount {
            property_type,
            count: count_of(counts, &property_type),
        })
        .collect()
}

/// Expand sparse `(status, count)` rows into one entry per status.
pub fn status_counts(counts: &[(ListingStatus, u64)]) -> Vec<StatusCount> {
    ListingStatus::ALL
        .iter()
        .copied()
        .map(|status| StatusCount {
            status,
            count: count_of(counts, &status),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersReport {
    pub total_users: u64,
    pub users_by_role: Vec<RoleCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertiesReport {
    pub total_properties: u64,
    pub properties_by_type: Vec<TypeCount>,
    pub properties_by_status: Vec<StatusCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityReport {
    pub new_users: u64,
    pub new_properties: u64,
    pub new_favorites: u64,
}

/// A generated report. Serialises as the shape of the chosen kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Users(UsersReport),
    Properties(PropertiesReport),
    Activity(ActivityReport),
}

/// Headline counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_users: u64,
    pub total_properties: u64,
    pub active_properties: u64,
    pub total_favorites: u64,
}

/// Compact user row for dashboard listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Compact listing row for dashboard listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentListing {
    pub id: ListingId,
    pub title: String,
    pub price: bigdecimal::BigDecimal,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub owner_id: UserId,
}

/// Everything the admin dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub overview: DashboardOverview,
    pub users_by_role: Vec<RoleCount>,
    pub properties_by_type: Vec<TypeCount>,
    pub recent_users: Vec<RecentUser>,
    pub recent_properties: Vec<RecentListing>,
}

/// Number of recent rows the dashboard shows per entity.
pub const DASHBOARD_RECENT: u32 = 5;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("users", ReportKind::Users)]
    #[case("properties", ReportKind::Properties)]
    #[case("activity", ReportKind::Activity)]
    fn report_kinds_parse(#[case] raw: &str, #[case] expected: ReportKind) {
        assert_eq!(raw.parse::<ReportKind>(), Ok(expected));
    }

    #[rstest]
    fn unknown_report_kind_is_flagged() {
        let error = "revenue"
            .parse::<ReportKind>()
            .expect_err("revenue is not a report");
        assert_eq!(error.code(), FieldErrorCode::InvalidReportType);
        assert_eq!(error.to_string(), "invalid report type");
    }

    #[rstest]
    fn bare_end_date_covers_the_whole_day() {
        let range = DateRange::parse(Some("2024-03-01".into()), Some("2024-03-31".into()))
            .expect("valid range");
        let late = Utc
            .with_ymd_and_hms(2024, 3, 31, 23, 59, 59)
            .single()
            .expect("timestamp");
        let after = Utc
            .with_ymd_and_hms(2024, 4, 1, 0, 0, 0)
            .single()
            .expect("timestamp");
        assert!(range.contains(late));
        assert!(!range.contains(after));
    }

    #[rstest]
    #[case(Some("2024-03-01"), None)]
    #[case(None, Some("2024-03-01T10:00:00Z"))]
    #[case(None, None)]
    fn half_open_ranges_are_valid(#[case] start: Option<&str>, #[case] end: Option<&str>) {
        let range = DateRange::parse(start.map(Into::into), end.map(Into::into));
        assert!(range.is_ok());
    }

    #[rstest]
    #[case(Some("yesterday"), None, "startDate", FieldErrorCode::InvalidDate)]
    #[case(None, Some("2024-13-01"), "endDate", FieldErrorCode::InvalidDate)]
    #[case(Some("2024-05-01"), Some("2024-04-01"), "startDate", FieldErrorCode::InvalidRange)]
    fn bad_ranges_are_rejected(
        #[case] start: Option<&str>,
        #[case] end: Option<&str>,
        #[case] field: &str,
        #[case] code: FieldErrorCode,
    ) {
        let error = DateRange::parse(start.map(Into::into), end.map(Into::into))
            .expect_err("range should be rejected");
        assert_eq!(error.field(), field);
        assert_eq!(error.code(), code);
    }

    #[rstest]
    fn role_counts_fill_missing_roles_with_zero() {
        let counts = role_counts(&[(Role::Seller, 2), (Role::Buyer, 5)]);
        assert_eq!(
            counts,
            vec![
                RoleCount { role: Role::Buyer, count: 5 },
                RoleCount { role: Role::Seller, count: 2 },
                RoleCount { role: Role::Agent, count: 0 },
                RoleCount { role: Role::Admin, count: 0 },
            ]
        );
        assert_eq!(counts.iter().map(|c| c.count).sum::<u64>(), 7);
    }

    #[rstest]
    fn report_serialises_as_its_kind_shape() {
        let report = Report::Properties(PropertiesReport {
            total_properties: 1,
            properties_by_type: type_counts(&[(PropertyType::Land, 1)]),
            properties_by_status: status_counts(&[(ListingStatus::Active, 1)]),
        });
        let value = serde_json::to_value(&report).expect("serialise");
        assert_eq!(value["totalProperties"], 1);
        assert_eq!(value["propertiesByType"][2]["type"], "LAND");
        assert_eq!(value["propertiesByStatus"][0]["status"], "ACTIVE");
    }
}
