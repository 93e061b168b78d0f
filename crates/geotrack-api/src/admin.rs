//! Brand history, auth verification, and the admin leads surface.

use geotrack_core::{AuthUser, BrandDetail, BrandRecord, BrandRun, Lead, LeadStats, LeadStatus};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{
    BrandHistoryResponse, BrandListResponse, BrandSearchResponse, LeadListResponse,
    LeadUpdatePayload, MessageResponse, VerifyResponse,
};

impl ApiClient {
    /// `GET /api/brands?limit=&company_id=`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`], [`ApiError::Status`] or [`ApiError::Deserialize`]
    ///   as for any request.
    pub async fn list_brands(
        &self,
        company_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<BrandRecord>, ApiError> {
        let limit = limit.to_string();
        let mut query = vec![("limit", limit.as_str())];
        if let Some(company_id) = company_id {
            query.push(("company_id", company_id));
        }
        let url = self.endpoint(&["api", "brands"], &query);
        let raw: BrandListResponse<BrandRecord> = self.get_json(url, "list_brands").await?;
        Ok(raw.brands)
    }

    /// `GET /api/brands/{id}`: a brand and its run history.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotFound`] if the brand does not exist.
    /// - [`ApiError::Http`], [`ApiError::Status`] or [`ApiError::Deserialize`]
    ///   as for any request.
    pub async fn brand(&self, brand_id: i64) -> Result<BrandDetail, ApiError> {
        let id = brand_id.to_string();
        let url = self.endpoint(&["api", "brands", &id], &[]);
        self.get_json(url, &format!("brand(id={brand_id})")).await
    }

    /// `GET /api/brands/{id}/history?limit=`.
    ///
    /// # Errors
    ///
    /// As for [`ApiClient::brand`].
    pub async fn brand_history(
        &self,
        brand_id: i64,
        limit: u32,
    ) -> Result<Vec<BrandRun>, ApiError> {
        let id = brand_id.to_string();
        let limit = limit.to_string();
        let url = self.endpoint(&["api", "brands", &id, "history"], &[("limit", &limit)]);
        let raw: BrandHistoryResponse<BrandRun> = self
            .get_json(url, &format!("brand_history(id={brand_id})"))
            .await?;
        Ok(raw.history)
    }

    /// `GET /api/brands/search/{name}`. Unknown brands are `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Any error other than 404.
    pub async fn find_brand(
        &self,
        brand_name: &str,
        company_id: Option<&str>,
    ) -> Result<Option<BrandRecord>, ApiError> {
        let query: Vec<(&str, &str)> = company_id.map(|c| ("company_id", c)).into_iter().collect();
        let url = self.endpoint(&["api", "brands", "search", brand_name], &query);
        match self
            .get_json::<BrandSearchResponse<BrandRecord>>(url, "find_brand")
            .await
        {
            Ok(raw) => Ok(raw.brand),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// `DELETE /api/brands/{id}`. Returns the backend's message.
    ///
    /// # Errors
    ///
    /// As for [`ApiClient::brand`].
    pub async fn delete_brand(&self, brand_id: i64) -> Result<String, ApiError> {
        let id = brand_id.to_string();
        let url = self.endpoint(&["api", "brands", &id], &[]);
        let raw: MessageResponse = self
            .delete_json(url, &format!("delete_brand(id={brand_id})"))
            .await?;
        Ok(raw.message.unwrap_or_else(|| format!("Brand {brand_id} deleted")))
    }

    /// `GET /api/auth/verify`: resolves the bearer token to a user.
    ///
    /// An invalid or expired token is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Status`] or [`ApiError::Deserialize`] for anything other
    ///   than a clean accept or reject.
    pub async fn verify_token(&self) -> Result<Option<AuthUser>, ApiError> {
        if !self.has_token() {
            return Ok(None);
        }
        let url = self.endpoint(&["api", "auth", "verify"], &[]);
        match self
            .get_json::<VerifyResponse<AuthUser>>(url, "verify_token")
            .await
        {
            Ok(raw) if raw.valid == Some(false) => Ok(None),
            Ok(raw) => Ok(raw.user),
            Err(ApiError::Unauthorized { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// `GET /api/admin/leads?status=`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] without a token carrying lead access.
    /// - [`ApiError::Http`], [`ApiError::Status`] or [`ApiError::Deserialize`]
    ///   as for any request.
    pub async fn list_leads(&self, status: Option<LeadStatus>) -> Result<Vec<Lead>, ApiError> {
        let query: Vec<(&str, &str)> = status
            .map(|s| ("status", s.as_str()))
            .into_iter()
            .collect();
        let url = self.endpoint(&["api", "admin", "leads"], &query);
        let raw: LeadListResponse<Lead> = self.get_json(url, "list_leads").await?;
        Ok(raw.leads)
    }

    /// `GET /api/admin/leads/stats`.
    ///
    /// # Errors
    ///
    /// As for [`ApiClient::list_leads`].
    pub async fn lead_stats(&self) -> Result<LeadStats, ApiError> {
        let url = self.endpoint(&["api", "admin", "leads", "stats"], &[]);
        self.get_json(url, "lead_stats").await
    }

    /// `PATCH /api/admin/leads/{id}`: moves a lead to `status`. `Some` replaces
    /// its notes (a blank string clears them); `None` leaves them untouched.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotFound`] if the lead does not exist.
    /// - Otherwise as for [`ApiClient::list_leads`].
    pub async fn update_lead(
        &self,
        lead_id: i64,
        status: LeadStatus,
        notes: Option<&str>,
    ) -> Result<(), ApiError> {
        let id = lead_id.to_string();
        let url = self.endpoint(&["api", "admin", "leads", &id], &[]);
        let payload = LeadUpdatePayload {
            status: status.as_str(),
            notes: notes.map(str::trim),
        };
        let _: serde::de::IgnoredAny = self
            .patch_json(url, &payload, &format!("update_lead(id={lead_id})"))
            .await?;
        tracing::info!(lead_id, status = %status, "lead updated");
        Ok(())
    }
}
