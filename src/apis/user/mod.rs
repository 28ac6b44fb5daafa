//! APIs and models related to MYBank member accounts.

mod api;
mod model;

pub use api::UserApi;
pub use model::*;
