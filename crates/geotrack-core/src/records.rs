//! Records returned by the auxiliary backend endpoints: health, query
//! generation, sheet import, reports, brand history, auth and leads.
//!
//! These shapes carry no client-side invariants, so their field names follow
//! the wire format and they deserialize directly from response bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::query::Query;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub providers_available: Vec<String>,
}

/// Queries proposed by the backend's generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedQueries {
    pub queries: Vec<Query>,
    /// `"fallback"` when the backend used templates instead of an LLM.
    pub generated_by: Option<String>,
}

impl GeneratedQueries {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.generated_by.as_deref() == Some("fallback")
    }
}

/// Prompts imported from a Google Sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetImport {
    pub prompts: Vec<Query>,
    pub total_count: u32,
    pub question_column: Option<String>,
    pub category_column: Option<String>,
    pub all_columns: Vec<String>,
    pub cached: bool,
    pub sheet_title: String,
    pub sheet_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetValidation {
    pub valid: bool,
    #[serde(default)]
    pub sheet_id: Option<String>,
    #[serde(default)]
    pub sheet_title: Option<String>,
    #[serde(default)]
    pub total_prompts: Option<u32>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// AI-written narrative report for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityReport {
    pub report: String,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub tokens_used: Option<u64>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub saved: bool,
    #[serde(default)]
    pub from_cache: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// A tracked brand with its lifetime run totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandRecord {
    pub id: i64,
    pub brand_name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub total_runs: u32,
    #[serde(default)]
    pub total_queries: u32,
    #[serde(default)]
    pub avg_visibility: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_run_at: Option<String>,
}

/// One historical run of a tracked brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandRun {
    pub id: i64,
    pub brand_id: i64,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub providers: Vec<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub total_queries: u32,
    #[serde(default)]
    pub visibility_pct: Option<f64>,
    #[serde(default)]
    pub avg_sentiment: Option<f64>,
    #[serde(default)]
    pub avg_trust: Option<f64>,
    #[serde(default)]
    pub competitor_summary: BTreeMap<String, f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandDetail {
    pub brand: BrandRecord,
    #[serde(default)]
    pub history: Vec<BrandRun>,
}

/// Summary row of a previous run, across all brands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunHistoryEntry {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub run_ts: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub providers: Vec<String>,
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub total_queries: u32,
    #[serde(default)]
    pub brand_mentions: u32,
    #[serde(default)]
    pub visibility_pct: Option<f64>,
    #[serde(default)]
    pub avg_sentiment: Option<f64>,
    #[serde(default)]
    pub avg_trust: Option<f64>,
    #[serde(default)]
    pub avg_latency_ms: Option<f64>,
    #[serde(default)]
    pub company_id: Option<String>,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub can_access_admin: bool,
    #[serde(default)]
    pub can_view_leads: bool,
    #[serde(default)]
    pub can_view_emails: bool,
    #[serde(default)]
    pub can_update_leads: bool,
    #[serde(default)]
    pub can_delete_leads: bool,
    #[serde(default)]
    pub can_view_stats: bool,
    #[serde(default)]
    pub can_manage_users: bool,
}

/// The user a bearer token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: Permissions,
}

impl AuthUser {
    /// Whether the admin surface should be shown to this user.
    #[must_use]
    pub fn has_admin_access(&self) -> bool {
        self.permissions.can_access_admin
            || matches!(self.role.as_deref(), Some("admin" | "demo"))
    }
}

/// Pipeline stage of a lead captured from the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Converted,
    Lost,
}

impl LeadStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Converted => "converted",
            LeadStatus::Lost => "lost",
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(LeadStatus::New),
            "contacted" => Ok(LeadStatus::Contacted),
            "qualified" => Ok(LeadStatus::Qualified),
            "converted" => Ok(LeadStatus::Converted),
            "lost" => Ok(LeadStatus::Lost),
            other => Err(format!(
                "unknown lead status '{other}'; expected new, contacted, qualified, converted or lost"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub company: String,
    pub email: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    pub status: String,
    #[serde(default)]
    pub email_sent: i64,
    #[serde(default)]
    pub email_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadStats {
    pub total: u64,
    #[serde(default)]
    pub by_status: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_service: BTreeMap<String, u64>,
    #[serde(default)]
    pub recent_7_days: u64,
    #[serde(default)]
    pub emails_sent: u64,
    #[serde(default)]
    pub email_success_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_access_from_role_or_permission() {
        let mut user = AuthUser {
            email: "ops@example.com".to_string(),
            name: None,
            company: None,
            role: Some("user".to_string()),
            permissions: Permissions::default(),
        };
        assert!(!user.has_admin_access());

        user.role = Some("demo".to_string());
        assert!(user.has_admin_access());

        user.role = None;
        user.permissions.can_access_admin = true;
        assert!(user.has_admin_access());
    }

    #[test]
    fn lead_status_round_trips_through_str() {
        for status in [
            LeadStatus::New,
            LeadStatus::Contacted,
            LeadStatus::Qualified,
            LeadStatus::Converted,
            LeadStatus::Lost,
        ] {
            assert_eq!(status.as_str().parse::<LeadStatus>().unwrap(), status);
        }
        assert!("archived".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn auth_user_tolerates_missing_permissions() {
        let user: AuthUser =
            serde_json::from_str(r#"{"email":"a@b.c","role":"admin"}"#).unwrap();
        assert_eq!(user.permissions, Permissions::default());
        assert!(user.has_admin_access());
    }

    #[test]
    fn generated_queries_fallback_flag() {
        let generated = GeneratedQueries {
            queries: vec![],
            generated_by: Some("fallback".to_string()),
        };
        assert!(generated.is_fallback());
    }
}
