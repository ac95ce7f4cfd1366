//! Thin coordination layer over the merchant/margin repositories: maps the
//! unique-index violation to `AlreadyExists` and strips `info` for the
//! public search surface.

use uuid::Uuid;

use crate::models::{
    CreateMerchantRequest, Merchant, MerchantFilter, MerchantMargin, MerchantMarginFilter, MerchantSummary,
    UpdateMerchantFields, UpsertMerchantMarginRequest,
};
use crate::repository::{MerchantMarginRepository, MerchantRepository};
use crate::utils::response::AppError;

pub struct MerchantEngine {
    merchants: MerchantRepository,
    margins: MerchantMarginRepository,
}

impl MerchantEngine {
    pub fn new(merchants: MerchantRepository, margins: MerchantMarginRepository) -> Self {
        Self { merchants, margins }
    }

    pub async fn create_merchant(&self, req: CreateMerchantRequest) -> Result<Merchant, AppError> {
        self.merchants.create(&req).await
    }

    pub async fn get_merchant(&self, id: Uuid) -> Result<Merchant, AppError> {
        self.merchants.get(id).await
    }

    pub async fn update_merchant(&self, id: Uuid, fields: UpdateMerchantFields) -> Result<Merchant, AppError> {
        self.merchants.update(id, &fields).await
    }

    /// `SearchMerchants`: the public listing, `info` stripped.
    pub async fn search_merchants(&self, filter: MerchantFilter) -> Result<Vec<MerchantSummary>, AppError> {
        let rows = self.merchants.search(&filter).await?;
        Ok(rows.into_iter().map(MerchantSummary::from).collect())
    }

    /// `SearchMerchantsInfo`: the internal/admin listing, restricted to
    /// merchants that actually carry an `info` document.
    pub async fn search_merchants_info(&self, filter: MerchantFilter) -> Result<Vec<Merchant>, AppError> {
        let rows = self.merchants.search(&filter).await?;
        Ok(rows.into_iter().filter(|m| m.info.is_some()).collect())
    }

    pub async fn upsert_margin(&self, req: UpsertMerchantMarginRequest) -> Result<MerchantMargin, AppError> {
        self.margins.upsert(&req).await
    }

    pub async fn get_margin(&self, id: Uuid) -> Result<MerchantMargin, AppError> {
        self.margins.get(id).await
    }

    pub async fn search_margins(&self, filter: MerchantMarginFilter) -> Result<Vec<MerchantMargin>, AppError> {
        self.margins.search(&filter).await
    }
}
