mod migrate;
mod query;

pub use migrate::Migrate;
pub use query::Query;
