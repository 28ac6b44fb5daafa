//! APIs and models related to MYBank trades.

mod api;
mod model;

pub use api::TradeApi;
pub use model::*;
