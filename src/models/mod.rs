pub mod dto;
pub mod error;
pub mod ico;
pub mod spot_price;
pub mod ticker;
pub use error::{Error, ExternalError};
pub use ico::{IcoRecord, IcoSeed, NormalizedIco};
pub use spot_price::{Asset, SpotPrice, SpotPrices};
pub use ticker::{Ticker, TickerPayload};
