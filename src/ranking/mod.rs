pub mod roi;
pub mod search;
pub mod sort;
pub mod view;

pub use roi::Currency;
pub use search::search;
pub use sort::{handle_sort, SortContext, SortKey};
pub use view::{Filters, RankingKind, RankingView};
