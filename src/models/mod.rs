pub mod basket;
pub mod breadth;
pub mod grid;
pub mod index_snapshot;
pub mod intraday;
pub mod movers;
pub mod quote;
pub mod sector;

pub use basket::QuoteBasket;
pub use breadth::BreadthSummary;
pub use grid::{Grid, GridCell};
pub use index_snapshot::IndexSnapshot;
pub use intraday::{IndexSeries, IntradayPoint};
pub use movers::Movers;
pub use quote::{Freshness, Quote};
pub use sector::{SectorAggregate, SectorCatalog};
