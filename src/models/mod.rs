pub mod currency_order;
pub mod instrument;
pub mod member;
pub mod merchant;
pub mod merchant_margin;
pub mod otc_order;
pub mod quote;
pub mod sdce_quote;

pub use currency_order::*;
pub use instrument::*;
pub use member::*;
pub use merchant::*;
pub use merchant_margin::*;
pub use otc_order::*;
pub use quote::*;
pub use sdce_quote::*;
