//! Thin wrapper over the SDCE reference-quote repository — no bookkeeping,
//! just an upsert-by-ticker document store.

use crate::models::{CreateSdceQuoteRequest, SdceQuote};
use crate::repository::SdceQuoteRepository;
use crate::utils::response::AppError;

pub struct SdceEngine {
    repo: SdceQuoteRepository,
}

impl SdceEngine {
    pub fn new(repo: SdceQuoteRepository) -> Self {
        Self { repo }
    }

    pub async fn upsert(&self, req: CreateSdceQuoteRequest) -> Result<SdceQuote, AppError> {
        self.repo.upsert(&req).await
    }

    pub async fn get(&self, ticker: &str) -> Result<SdceQuote, AppError> {
        self.repo.get(ticker).await
    }

    pub async fn list(&self) -> Result<Vec<SdceQuote>, AppError> {
        self.repo.list().await
    }
}
