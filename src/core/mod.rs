pub mod dataset;
pub mod derivation;
pub mod filter_state;
pub mod loader;
pub mod types;

pub use dataset::Dataset;
pub use derivation::{DerivationEngine, GenderCount, ScatterEntry, ScatterSubset};
pub use filter_state::FilterState;
pub use loader::{LoadReport, MalformedRowPolicy, TabularLoadOptions, load_tabular};
pub use types::{CountryGroup, DEFAULT_COUNTRY_GROUP, Extent, Gender, LeaderId, LeaderRecord};
