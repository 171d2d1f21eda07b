pub mod loader;
pub mod provider;
pub mod slug;

pub use loader::{
    CityTableLoader, CityTableLoaderError, MetricsLoader, MetricsLoaderError, TaxTableLoader,
    TaxTableLoaderError,
};
pub use provider::{DataSources, ProviderError, ReferenceDataProvider, ReferenceSnapshot};
