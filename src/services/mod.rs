pub mod account_client;
pub mod currency_order_engine;
pub mod expiry_worker;
pub mod merchant_engine;
pub mod order_engine;
pub mod quote_engine;
pub mod sdce_engine;
pub mod state_machine;

pub use account_client::AccountClient;
pub use currency_order_engine::CurrencyOrderEngine;
pub use expiry_worker::ExpiryWorker;
pub use merchant_engine::MerchantEngine;
pub use order_engine::OrderEngine;
pub use quote_engine::QuoteEngine;
pub use sdce_engine::SdceEngine;
