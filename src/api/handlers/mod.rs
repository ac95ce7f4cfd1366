pub mod currency_order;
pub mod merchant;
pub mod merchant_margin;
pub mod otc_order;
pub mod quote;
pub mod sdce_quote;
