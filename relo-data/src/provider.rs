use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use relo_core::models::{CityCostRecord, MarketMetrics, TaxTable};
use thiserror::Error;
use tracing::info;

use crate::loader::{
    CityTableLoader, CityTableLoaderError, MetricsLoader, MetricsLoaderError, TaxTableLoader,
    TaxTableLoaderError,
};
use crate::slug;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unknown city: {0}")]
    CityNotFound(String),

    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    TaxTable(#[from] TaxTableLoaderError),

    #[error(transparent)]
    CityTable(#[from] CityTableLoaderError),

    #[error(transparent)]
    Metrics(#[from] MetricsLoaderError),

    #[error("Provider has no file sources to reload from")]
    NoSources,
}

/// Filesystem locations of the reference tables.
#[derive(Debug, Clone)]
pub struct DataSources {
    pub tax_table: PathBuf,
    pub cities: PathBuf,
    pub metrics: Option<PathBuf>,
}

/// One immutable view of the reference tables.
///
/// A snapshot never changes after it is built. Reloads publish a whole
/// new snapshot; readers holding this one keep a consistent view until
/// they drop it.
#[derive(Debug, Clone)]
pub struct ReferenceSnapshot {
    pub tax: TaxTable,
    /// City records keyed by canonical slug.
    pub cities: HashMap<String, CityCostRecord>,
    pub metrics: Option<MarketMetrics>,
    /// Monotonic counter, 1 on first load.
    pub version: u64,
}

impl ReferenceSnapshot {
    /// Look up a city record. The query is normalized first, so
    /// `" New York_NY "` finds the record stored under `new-york-ny`.
    pub fn city(&self, query: &str) -> Result<&CityCostRecord, ProviderError> {
        let normalized = slug::normalize(query);
        self.cities
            .get(&normalized)
            .ok_or_else(|| ProviderError::CityNotFound(normalized))
    }
}

/// Shared, reloadable access to the reference tables.
///
/// Readers call [`snapshot`](Self::snapshot) and use the returned `Arc`
/// for as long as they need a consistent view. A concurrent reload swaps
/// the current snapshot without invalidating snapshots already handed
/// out.
pub struct ReferenceDataProvider {
    sources: Option<DataSources>,
    current: RwLock<Arc<ReferenceSnapshot>>,
    /// Serializes reloads so two concurrent calls cannot both read
    /// version N and publish the same N + 1.
    reload_lock: Mutex<()>,
}

impl ReferenceDataProvider {
    /// Build a provider from files on disk.
    pub fn load(sources: DataSources) -> Result<Self, ProviderError> {
        let snapshot = build_snapshot(&sources, 1)?;
        info!(
            version = snapshot.version,
            cities = snapshot.cities.len(),
            "Loaded reference data"
        );
        Ok(Self {
            sources: Some(sources),
            current: RwLock::new(Arc::new(snapshot)),
            reload_lock: Mutex::new(()),
        })
    }

    /// Build a provider from tables already in memory. There are no
    /// files behind it, so [`reload`](Self::reload) is unavailable; use
    /// [`install`](Self::install) to publish replacement tables.
    pub fn in_memory(
        tax: TaxTable,
        cities: Vec<CityCostRecord>,
        metrics: Option<MarketMetrics>,
    ) -> Self {
        let snapshot = snapshot_from_parts(tax, cities, metrics, 1);
        Self {
            sources: None,
            current: RwLock::new(Arc::new(snapshot)),
            reload_lock: Mutex::new(()),
        }
    }

    /// The current snapshot. Cheap; clones an `Arc`.
    pub fn snapshot(&self) -> Arc<ReferenceSnapshot> {
        Arc::clone(
            &self
                .current
                .read()
                .expect("reference snapshot lock poisoned"),
        )
    }

    /// Re-read the source files and publish them as the next snapshot
    /// version. The new snapshot is built entirely before the swap, so
    /// a parse failure leaves the current one in place.
    pub fn reload(&self) -> Result<u64, ProviderError> {
        let _reload = self.reload_lock.lock().expect("reload lock poisoned");
        let sources = self.sources.as_ref().ok_or(ProviderError::NoSources)?;
        let version = self.snapshot().version + 1;
        let snapshot = build_snapshot(sources, version)?;
        info!(
            version,
            cities = snapshot.cities.len(),
            "Reloaded reference data"
        );
        self.swap(snapshot);
        Ok(version)
    }

    /// Publish replacement tables as the next snapshot version.
    pub fn install(
        &self,
        tax: TaxTable,
        cities: Vec<CityCostRecord>,
        metrics: Option<MarketMetrics>,
    ) -> u64 {
        let _reload = self.reload_lock.lock().expect("reload lock poisoned");
        let version = self.snapshot().version + 1;
        self.swap(snapshot_from_parts(tax, cities, metrics, version));
        version
    }

    fn swap(&self, snapshot: ReferenceSnapshot) {
        let mut current = self
            .current
            .write()
            .expect("reference snapshot lock poisoned");
        *current = Arc::new(snapshot);
    }
}

fn build_snapshot(
    sources: &DataSources,
    version: u64,
) -> Result<ReferenceSnapshot, ProviderError> {
    let tax = TaxTableLoader::parse(open(&sources.tax_table)?)?;
    let cities = CityTableLoader::parse(open(&sources.cities)?)?;
    let metrics = match &sources.metrics {
        Some(path) => Some(MetricsLoader::parse(open(path)?)?),
        None => None,
    };
    Ok(snapshot_from_parts(tax, cities, metrics, version))
}

fn snapshot_from_parts(
    tax: TaxTable,
    cities: Vec<CityCostRecord>,
    metrics: Option<MarketMetrics>,
    version: u64,
) -> ReferenceSnapshot {
    let cities = cities
        .into_iter()
        .map(|record| (record.slug.clone(), record))
        .collect();
    ReferenceSnapshot {
        tax,
        cities,
        metrics,
        version,
    }
}

fn open(path: &Path) -> Result<BufReader<File>, ProviderError> {
    let file = File::open(path).map_err(|source| ProviderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;

    const MINI_TAX_JSON: &str = r#"{
      "federal": {
        "brackets_single": [{ "up_to": null, "rate": 0.10 }],
        "brackets_married": [{ "up_to": null, "rate": 0.10 }],
        "standard_deduction_single": 15000,
        "standard_deduction_married": 30000
      },
      "states": { "TX": { "kind": "no_tax" } },
      "payroll": {
        "social_security_rate": 0.062,
        "social_security_cap": 176100,
        "medicare_rate": 0.0145,
        "additional_medicare_rate": 0.009,
        "additional_medicare_threshold": 200000
      },
      "defaults": {
        "retirement_rate": 0.05,
        "retirement_cap": 23500,
        "monthly_insurance": 150,
        "rsu_supplemental_rate": 0.22,
        "car_insurance_monthly": 175,
        "state_fallback_rate": 0.05
      }
    }"#;

    fn tax_table() -> TaxTable {
        TaxTableLoader::parse(MINI_TAX_JSON.as_bytes()).expect("Failed to parse tax table")
    }

    fn city(slug: &str, avg_rent: Decimal) -> CityCostRecord {
        CityCostRecord {
            city: "Test City".to_string(),
            state: "TX".to_string(),
            slug: slug.to_string(),
            avg_rent,
            avg_house_price: dec!(400000),
            col_index: dec!(100),
            median_income: dec!(70000),
            itemized: None,
        }
    }

    fn provider() -> ReferenceDataProvider {
        ReferenceDataProvider::in_memory(tax_table(), vec![city("austin-tx", dec!(1800))], None)
    }

    #[test]
    fn test_in_memory_provider_serves_a_snapshot() {
        let provider = provider();

        let snapshot = provider.snapshot();

        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.metrics, None);
        let record = snapshot.city("austin-tx").expect("City should exist");
        assert_eq!(record.avg_rent, dec!(1800));
    }

    #[test]
    fn test_city_lookup_normalizes_the_query() {
        let snapshot = provider().snapshot();

        let record = snapshot.city(" Austin_TX ").expect("City should exist");

        assert_eq!(record.slug, "austin-tx");
    }

    #[test]
    fn test_unknown_city_is_not_found() {
        let snapshot = provider().snapshot();

        let err = snapshot.city("Nowhere, ZZ").expect_err("Should not resolve");

        let ProviderError::CityNotFound(query) = err else {
            panic!("Expected CityNotFound, got: {:?}", err);
        };
        assert_eq!(query, "nowhere-zz");
    }

    #[test]
    fn test_install_publishes_a_new_snapshot_without_touching_old_ones() {
        let provider = provider();
        let before = provider.snapshot();

        let version = provider.install(tax_table(), vec![city("austin-tx", dec!(2100))], None);

        assert_eq!(version, 2);
        let after = provider.snapshot();
        assert_eq!(after.version, 2);
        assert_eq!(
            after.city("austin-tx").expect("City should exist").avg_rent,
            dec!(2100)
        );
        assert_eq!(before.version, 1);
        assert_eq!(
            before.city("austin-tx").expect("City should exist").avg_rent,
            dec!(1800)
        );
    }

    #[test]
    fn test_reload_without_sources_is_an_error() {
        let provider = provider();

        let err = provider.reload().expect_err("No sources to reload");

        let ProviderError::NoSources = err else {
            panic!("Expected NoSources, got: {:?}", err);
        };
    }
}
