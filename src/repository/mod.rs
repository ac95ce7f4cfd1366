pub mod currency_order_repo;
pub mod merchant_margin_repo;
pub mod merchant_repo;
pub mod otc_order_repo;
pub mod quote_repo;
pub mod sdce_quote_repo;

pub use currency_order_repo::CurrencyOrderRepository;
pub use merchant_margin_repo::MerchantMarginRepository;
pub use merchant_repo::MerchantRepository;
pub use otc_order_repo::OtcOrderRepository;
pub use quote_repo::QuoteRepository;
pub use sdce_quote_repo::SdceQuoteRepository;
