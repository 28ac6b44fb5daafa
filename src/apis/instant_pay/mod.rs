//! APIs and models related to LianLian instant payments.

mod api;
mod model;

pub use api::{generate_order_number, InstantPayApi};
pub use model::*;
