use std::collections::HashSet;
use std::io::Read;

use relo_core::models::{CityCostRecord, ItemizedCosts, MarketMetrics, StateTaxRule, TaxBracket, TaxTable};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::slug;

/// Errors that can occur when loading the jurisdiction tax table.
#[derive(Debug, Error, PartialEq)]
pub enum TaxTableLoaderError {
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("Invalid {table}: bracket {index} does not ascend")]
    UnsortedBrackets { table: String, index: usize },

    #[error("Invalid {table}: bracket {index} has no ceiling but is not last")]
    OpenBracketNotLast { table: String, index: usize },

    #[error("Invalid {table}: the last bracket must be open-ended")]
    MissingOpenTail { table: String },

    #[error("Invalid {table}: bracket {index} has a negative rate")]
    NegativeRate { table: String, index: usize },

    #[error("Invalid {field}: must not be negative")]
    NegativeField { field: String },

    #[error("Invalid default retirement rate: {0} is not a fraction")]
    InvalidRetirementRate(Decimal),
}

impl From<serde_json::Error> for TaxTableLoaderError {
    fn from(err: serde_json::Error) -> Self {
        TaxTableLoaderError::JsonParse(err.to_string())
    }
}

/// Loader for the jurisdiction tax table from JSON.
///
/// Parsing also verifies the structural invariants the calculators
/// assume: every bracket list ascends and closes with exactly one
/// open-ended bracket, and no rate or amount is negative. Rejecting a
/// bad table here means the bracket walk never has to re-check it.
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parse and validate a tax table from a JSON reader.
    pub fn parse<R: Read>(reader: R) -> Result<TaxTable, TaxTableLoaderError> {
        let table: TaxTable = serde_json::from_reader(reader)?;
        validate_table(&table)?;
        Ok(table)
    }
}

fn validate_table(table: &TaxTable) -> Result<(), TaxTableLoaderError> {
    check_brackets("federal single brackets", &table.federal.brackets_single)?;
    check_brackets("federal married brackets", &table.federal.brackets_married)?;
    check_non_negative(
        "federal single standard deduction",
        table.federal.standard_deduction_single,
    )?;
    check_non_negative(
        "federal married standard deduction",
        table.federal.standard_deduction_married,
    )?;

    for (state, rule) in &table.states {
        match rule {
            StateTaxRule::NoTax => {}
            StateTaxRule::Flat { rate } => {
                check_non_negative(format!("state {state} flat rate"), *rate)?;
            }
            StateTaxRule::Progressive { brackets, surtax } => {
                check_brackets(&format!("state {state} brackets"), brackets)?;
                if let Some(surtax) = surtax {
                    check_non_negative(format!("state {state} surtax"), *surtax)?;
                }
            }
            StateTaxRule::BracketTable {
                brackets,
                brackets_married,
            } => {
                check_brackets(&format!("state {state} brackets"), brackets)?;
                if let Some(married) = brackets_married {
                    check_brackets(&format!("state {state} married brackets"), married)?;
                }
            }
        }
    }

    check_non_negative("social security rate", table.payroll.social_security_rate)?;
    check_non_negative("social security cap", table.payroll.social_security_cap)?;
    check_non_negative("medicare rate", table.payroll.medicare_rate)?;
    check_non_negative(
        "additional medicare rate",
        table.payroll.additional_medicare_rate,
    )?;
    check_non_negative(
        "additional medicare threshold",
        table.payroll.additional_medicare_threshold,
    )?;

    for (alias, rate) in &table.local_taxes {
        check_non_negative(format!("local tax rate for '{alias}'"), *rate)?;
    }

    let defaults = &table.defaults;
    if defaults.retirement_rate < Decimal::ZERO || defaults.retirement_rate > Decimal::ONE {
        return Err(TaxTableLoaderError::InvalidRetirementRate(
            defaults.retirement_rate,
        ));
    }
    check_non_negative("default retirement cap", defaults.retirement_cap)?;
    check_non_negative("default monthly insurance", defaults.monthly_insurance)?;
    check_non_negative("default RSU withholding rate", defaults.rsu_supplemental_rate)?;
    check_non_negative("default car insurance", defaults.car_insurance_monthly)?;
    check_non_negative("state fallback rate", defaults.state_fallback_rate)?;

    Ok(())
}

fn check_brackets(
    table: &str,
    brackets: &[TaxBracket],
) -> Result<(), TaxTableLoaderError> {
    if brackets.is_empty() {
        return Err(TaxTableLoaderError::MissingOpenTail {
            table: table.to_string(),
        });
    }
    let last = brackets.len() - 1;
    let mut previous: Option<Decimal> = None;

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO {
            return Err(TaxTableLoaderError::NegativeRate {
                table: table.to_string(),
                index,
            });
        }
        match bracket.up_to {
            Some(ceiling) => {
                if index == last {
                    return Err(TaxTableLoaderError::MissingOpenTail {
                        table: table.to_string(),
                    });
                }
                if previous.is_some_and(|previous| ceiling <= previous) {
                    return Err(TaxTableLoaderError::UnsortedBrackets {
                        table: table.to_string(),
                        index,
                    });
                }
                previous = Some(ceiling);
            }
            None => {
                if index != last {
                    return Err(TaxTableLoaderError::OpenBracketNotLast {
                        table: table.to_string(),
                        index,
                    });
                }
            }
        }
    }

    Ok(())
}

fn check_non_negative(
    field: impl Into<String>,
    value: Decimal,
) -> Result<(), TaxTableLoaderError> {
    if value < Decimal::ZERO {
        return Err(TaxTableLoaderError::NegativeField {
            field: field.into(),
        });
    }
    Ok(())
}

/// Errors that can occur when loading the city cost table.
#[derive(Debug, Error, PartialEq)]
pub enum CityTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Duplicate city slug: {0}")]
    DuplicateSlug(String),

    #[error("City slug '{0}' is not in canonical city-st form")]
    NonCanonicalSlug(String),

    #[error("City '{slug}': negative {field}")]
    NegativeAmount { slug: String, field: &'static str },

    #[error("City '{slug}': cost-of-living index must be positive")]
    InvalidColIndex { slug: String },
}

impl From<csv::Error> for CityTableLoaderError {
    fn from(err: csv::Error) -> Self {
        CityTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single row from the city cost CSV file.
///
/// The four itemized columns are optional as a block: when every one is
/// empty the city falls back to index-scaled shares, when any is present
/// the missing ones load as zero.
#[derive(Debug, Clone, Deserialize, PartialEq)]
struct CityRow {
    city: String,
    state: String,
    slug: String,
    avg_rent: Decimal,
    avg_house_price: Decimal,
    col_index: Decimal,
    median_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal", default)]
    groceries: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal", default)]
    transport: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal", default)]
    utilities: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal", default)]
    misc: Option<Decimal>,
}

impl CityRow {
    fn into_record(self) -> CityCostRecord {
        let itemized = match (self.groceries, self.transport, self.utilities, self.misc) {
            (None, None, None, None) => None,
            (groceries, transport, utilities, misc) => Some(ItemizedCosts {
                groceries: groceries.unwrap_or_default(),
                transport: transport.unwrap_or_default(),
                utilities: utilities.unwrap_or_default(),
                misc: misc.unwrap_or_default(),
            }),
        };
        CityCostRecord {
            city: self.city,
            state: self.state,
            slug: self.slug,
            avg_rent: self.avg_rent,
            avg_house_price: self.avg_house_price,
            col_index: self.col_index,
            median_income: self.median_income,
            itemized,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for city cost records from CSV files.
pub struct CityTableLoader;

impl CityTableLoader {
    /// Parse city cost records from a CSV reader.
    ///
    /// Slugs must be unique and in canonical form; costs must not be
    /// negative and the cost-of-living index must be positive.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<CityCostRecord>, CityTableLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();
        let mut seen = HashSet::new();

        for result in csv_reader.deserialize() {
            let row: CityRow = result?;
            let record = row.into_record();
            validate_city(&record)?;
            if !seen.insert(record.slug.clone()) {
                return Err(CityTableLoaderError::DuplicateSlug(record.slug));
            }
            records.push(record);
        }

        Ok(records)
    }
}

fn validate_city(record: &CityCostRecord) -> Result<(), CityTableLoaderError> {
    if !slug::is_canonical_city_slug(&record.slug) {
        return Err(CityTableLoaderError::NonCanonicalSlug(record.slug.clone()));
    }
    if record.col_index <= Decimal::ZERO {
        return Err(CityTableLoaderError::InvalidColIndex {
            slug: record.slug.clone(),
        });
    }

    let mut amounts = vec![
        ("avg_rent", record.avg_rent),
        ("avg_house_price", record.avg_house_price),
        ("median_income", record.median_income),
    ];
    if let Some(itemized) = &record.itemized {
        amounts.push(("groceries", itemized.groceries));
        amounts.push(("transport", itemized.transport));
        amounts.push(("utilities", itemized.utilities));
        amounts.push(("misc", itemized.misc));
    }
    for (field, value) in amounts {
        if value < Decimal::ZERO {
            return Err(CityTableLoaderError::NegativeAmount {
                slug: record.slug.clone(),
                field,
            });
        }
    }

    Ok(())
}

/// Errors that can occur when loading market metrics.
#[derive(Debug, Error, PartialEq)]
pub enum MetricsLoaderError {
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("Negative local tax rate for '{0}'")]
    NegativeRate(String),

    #[error("Negative car insurance for '{0}'")]
    NegativeInsurance(String),

    #[error("Negative benchmark: {0}")]
    NegativeBenchmark(&'static str),
}

impl From<serde_json::Error> for MetricsLoaderError {
    fn from(err: serde_json::Error) -> Self {
        MetricsLoaderError::JsonParse(err.to_string())
    }
}

/// Loader for the curated market metrics from JSON.
pub struct MetricsLoader;

impl MetricsLoader {
    /// Parse market metrics from a JSON reader.
    pub fn parse<R: Read>(reader: R) -> Result<MarketMetrics, MetricsLoaderError> {
        let metrics: MarketMetrics = serde_json::from_reader(reader)?;

        for (key, rate) in &metrics.local_income_taxes {
            if *rate < Decimal::ZERO {
                return Err(MetricsLoaderError::NegativeRate(key.clone()));
            }
        }
        for (key, amount) in &metrics.state_car_insurance_monthly {
            if *amount < Decimal::ZERO {
                return Err(MetricsLoaderError::NegativeInsurance(key.clone()));
            }
        }
        let benchmarks = &metrics.benchmarks;
        if benchmarks.average_401k_match_rate < Decimal::ZERO {
            return Err(MetricsLoaderError::NegativeBenchmark("average 401k match rate"));
        }
        if benchmarks.average_employer_hsa < Decimal::ZERO {
            return Err(MetricsLoaderError::NegativeBenchmark("average employer HSA"));
        }
        if benchmarks.typical_commute_minutes < Decimal::ZERO {
            return Err(MetricsLoaderError::NegativeBenchmark("typical commute minutes"));
        }

        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_TAX_JSON: &str = r#"{
      "federal": {
        "brackets_single": [
          { "up_to": 10000, "rate": 0.10 },
          { "up_to": null, "rate": 0.20 }
        ],
        "brackets_married": [
          { "up_to": 20000, "rate": 0.10 },
          { "up_to": null, "rate": 0.20 }
        ],
        "standard_deduction_single": 15000,
        "standard_deduction_married": 30000
      },
      "states": {
        "TX": { "kind": "no_tax" },
        "CO": { "kind": "flat", "rate": 0.044 },
        "NY": {
          "kind": "progressive",
          "brackets": [
            { "up_to": 80650, "rate": 0.055 },
            { "up_to": null, "rate": 0.0685 }
          ],
          "surtax": 0.009
        },
        "CA": {
          "kind": "bracket_table",
          "brackets": [
            { "up_to": 10756, "rate": 0.01 },
            { "up_to": null, "rate": 0.093 }
          ],
          "brackets_married": [
            { "up_to": 21512, "rate": 0.01 },
            { "up_to": null, "rate": 0.093 }
          ]
        }
      },
      "payroll": {
        "social_security_rate": 0.062,
        "social_security_cap": 176100,
        "medicare_rate": 0.0145,
        "additional_medicare_rate": 0.009,
        "additional_medicare_threshold": 200000
      },
      "local_taxes": { "nyc": 0.03876 },
      "defaults": {
        "retirement_rate": 0.05,
        "retirement_cap": 23500,
        "monthly_insurance": 150,
        "rsu_supplemental_rate": 0.22,
        "car_insurance_monthly": 175,
        "state_fallback_rate": 0.05
      }
    }"#;

    const TEST_CITIES_CSV: &str = "\
city,state,slug,avg_rent,avg_house_price,col_index,median_income,groceries,transport,utilities,misc
Austin,TX,austin-tx,1800,450000,100,78000,,,,
New York,NY,new-york-ny,3500,785000,187,85000,620,310,180,840
Columbus,OH,columbus-oh,1300,320000,92,68000,540,,210,
";

    const TEST_METRICS_JSON: &str = r#"{
      "metadata": { "source": "Curated market dataset", "last_updated": "2025-01-15" },
      "local_income_taxes": { "NYC": 0.03876, "philadelphia": 0.0375 },
      "state_car_insurance_monthly": { "MI": 280, "default": 150 },
      "benchmarks": {
        "average_401k_match_rate": 0.04,
        "average_employer_hsa": 750,
        "typical_commute_minutes": 27
      }
    }"#;

    fn bracket(up_to: Option<Decimal>, rate: Decimal) -> TaxBracket {
        TaxBracket { up_to, rate }
    }

    fn parsed_table() -> TaxTable {
        TaxTableLoader::parse(TEST_TAX_JSON.as_bytes()).expect("Failed to parse tax table")
    }

    // =========================================================================
    // Tax table loader
    // =========================================================================

    #[test]
    fn test_parse_tax_table() {
        let table = parsed_table();

        assert_eq!(table.federal.brackets_single.len(), 2);
        assert_eq!(table.federal.brackets_single[0].up_to, Some(dec!(10000)));
        assert_eq!(table.federal.brackets_single[1].up_to, None);
        assert_eq!(table.federal.standard_deduction_married, dec!(30000));
        assert_eq!(table.payroll.social_security_cap, dec!(176100));
        assert_eq!(table.local_taxes.get("nyc"), Some(&dec!(0.03876)));
        assert_eq!(table.defaults.retirement_cap, dec!(23500));
        assert_eq!(table.states.len(), 4);
    }

    #[test]
    fn test_parse_state_rule_variants() {
        let table = parsed_table();

        assert_eq!(table.states.get("TX"), Some(&StateTaxRule::NoTax));
        assert_eq!(
            table.states.get("CO"),
            Some(&StateTaxRule::Flat { rate: dec!(0.044) })
        );

        let Some(StateTaxRule::Progressive { brackets, surtax }) = table.states.get("NY") else {
            panic!("Expected NY to be progressive");
        };
        assert_eq!(brackets.len(), 2);
        assert_eq!(*surtax, Some(dec!(0.009)));

        let Some(StateTaxRule::BracketTable {
            brackets,
            brackets_married,
        }) = table.states.get("CA")
        else {
            panic!("Expected CA to be a bracket table");
        };
        assert_eq!(brackets[0].up_to, Some(dec!(10756)));
        assert_eq!(
            brackets_married.as_ref().map(|married| married.len()),
            Some(2)
        );
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let result = TaxTableLoader::parse("{ not json".as_bytes());

        let err = result.expect_err("Should fail for malformed JSON");
        let TaxTableLoaderError::JsonParse(_) = err else {
            panic!("Expected JsonParse error, got: {:?}", err);
        };
    }

    #[test]
    fn test_parse_rejects_negative_rate() {
        let json = TEST_TAX_JSON.replace("\"rate\": 0.10", "\"rate\": -0.10");

        let result = TaxTableLoader::parse(json.as_bytes());

        assert_eq!(
            result,
            Err(TaxTableLoaderError::NegativeRate {
                table: "federal single brackets".to_string(),
                index: 0,
            })
        );
    }

    #[test]
    fn test_validate_rejects_unsorted_brackets() {
        let mut table = parsed_table();
        table.federal.brackets_single = vec![
            bracket(Some(dec!(200)), dec!(0.10)),
            bracket(Some(dec!(100)), dec!(0.20)),
            bracket(None, dec!(0.30)),
        ];

        let result = validate_table(&table);

        assert_eq!(
            result,
            Err(TaxTableLoaderError::UnsortedBrackets {
                table: "federal single brackets".to_string(),
                index: 1,
            })
        );
    }

    #[test]
    fn test_validate_rejects_open_bracket_in_the_middle() {
        let mut table = parsed_table();
        table.federal.brackets_married = vec![
            bracket(None, dec!(0.10)),
            bracket(None, dec!(0.20)),
        ];

        let result = validate_table(&table);

        assert_eq!(
            result,
            Err(TaxTableLoaderError::OpenBracketNotLast {
                table: "federal married brackets".to_string(),
                index: 0,
            })
        );
    }

    #[test]
    fn test_validate_rejects_bounded_last_bracket() {
        let mut table = parsed_table();
        table.states.insert(
            "UT".to_string(),
            StateTaxRule::Progressive {
                brackets: vec![
                    bracket(Some(dec!(10000)), dec!(0.03)),
                    bracket(Some(dec!(50000)), dec!(0.05)),
                ],
                surtax: None,
            },
        );

        let result = validate_table(&table);

        assert_eq!(
            result,
            Err(TaxTableLoaderError::MissingOpenTail {
                table: "state UT brackets".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_rejects_empty_bracket_list() {
        let mut table = parsed_table();
        table.federal.brackets_single = vec![];

        let result = validate_table(&table);

        assert_eq!(
            result,
            Err(TaxTableLoaderError::MissingOpenTail {
                table: "federal single brackets".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_rejects_negative_standard_deduction() {
        let mut table = parsed_table();
        table.federal.standard_deduction_single = dec!(-1);

        let result = validate_table(&table);

        assert_eq!(
            result,
            Err(TaxTableLoaderError::NegativeField {
                field: "federal single standard deduction".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range_retirement_default() {
        let mut table = parsed_table();
        table.defaults.retirement_rate = dec!(1.2);

        let result = validate_table(&table);

        assert_eq!(
            result,
            Err(TaxTableLoaderError::InvalidRetirementRate(dec!(1.2)))
        );
    }

    // =========================================================================
    // City table loader
    // =========================================================================

    #[test]
    fn test_parse_city_table() {
        let records =
            CityTableLoader::parse(TEST_CITIES_CSV.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].slug, "austin-tx");
        assert_eq!(records[0].avg_rent, dec!(1800));
        assert_eq!(records[0].itemized, None);
        assert_eq!(
            records[1].itemized,
            Some(ItemizedCosts {
                groceries: dec!(620),
                transport: dec!(310),
                utilities: dec!(180),
                misc: dec!(840),
            })
        );
    }

    #[test]
    fn test_partially_itemized_row_fills_with_zero() {
        let records =
            CityTableLoader::parse(TEST_CITIES_CSV.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records[2].itemized,
            Some(ItemizedCosts {
                groceries: dec!(540),
                transport: dec!(0),
                utilities: dec!(210),
                misc: dec!(0),
            })
        );
    }

    #[test]
    fn test_missing_itemized_columns_mean_fallback() {
        let csv = "city,state,slug,avg_rent,avg_house_price,col_index,median_income\n\
                   Austin,TX,austin-tx,1800,450000,100,78000";

        let records = CityTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].itemized, None);
    }

    #[test]
    fn test_rejects_duplicate_slug() {
        let csv = "city,state,slug,avg_rent,avg_house_price,col_index,median_income\n\
                   Austin,TX,austin-tx,1800,450000,100,78000\n\
                   Austin Again,TX,austin-tx,1900,460000,101,79000";

        let result = CityTableLoader::parse(csv.as_bytes());

        assert_eq!(
            result,
            Err(CityTableLoaderError::DuplicateSlug("austin-tx".to_string()))
        );
    }

    #[test]
    fn test_rejects_non_canonical_slug() {
        let csv = "city,state,slug,avg_rent,avg_house_price,col_index,median_income\n\
                   Austin,TX,Austin_TX,1800,450000,100,78000";

        let result = CityTableLoader::parse(csv.as_bytes());

        assert_eq!(
            result,
            Err(CityTableLoaderError::NonCanonicalSlug("Austin_TX".to_string()))
        );
    }

    #[test]
    fn test_rejects_negative_rent() {
        let csv = "city,state,slug,avg_rent,avg_house_price,col_index,median_income\n\
                   Austin,TX,austin-tx,-5,450000,100,78000";

        let result = CityTableLoader::parse(csv.as_bytes());

        assert_eq!(
            result,
            Err(CityTableLoaderError::NegativeAmount {
                slug: "austin-tx".to_string(),
                field: "avg_rent",
            })
        );
    }

    #[test]
    fn test_rejects_zero_col_index() {
        let csv = "city,state,slug,avg_rent,avg_house_price,col_index,median_income\n\
                   Austin,TX,austin-tx,1800,450000,0,78000";

        let result = CityTableLoader::parse(csv.as_bytes());

        assert_eq!(
            result,
            Err(CityTableLoaderError::InvalidColIndex {
                slug: "austin-tx".to_string(),
            })
        );
    }

    #[test]
    fn test_rejects_bad_decimal() {
        let csv = "city,state,slug,avg_rent,avg_house_price,col_index,median_income\n\
                   Austin,TX,austin-tx,abc,450000,100,78000";

        let result = CityTableLoader::parse(csv.as_bytes());

        let err = result.expect_err("Should fail for invalid decimal");
        let CityTableLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.to_lowercase().contains("invalid"),
            "Expected 'invalid' in error, got: {}",
            msg
        );
    }

    // =========================================================================
    // Metrics loader
    // =========================================================================

    #[test]
    fn test_parse_metrics() {
        let metrics =
            MetricsLoader::parse(TEST_METRICS_JSON.as_bytes()).expect("Failed to parse metrics");

        assert_eq!(metrics.metadata.source, "Curated market dataset");
        assert_eq!(metrics.local_income_taxes.get("NYC"), Some(&dec!(0.03876)));
        assert_eq!(
            metrics.state_car_insurance_monthly.get("default"),
            Some(&dec!(150))
        );
        assert_eq!(metrics.benchmarks.average_401k_match_rate, dec!(0.04));
    }

    #[test]
    fn test_rejects_negative_local_rate() {
        let json = TEST_METRICS_JSON.replace("\"NYC\": 0.03876", "\"NYC\": -0.01");

        let result = MetricsLoader::parse(json.as_bytes());

        assert_eq!(
            result,
            Err(MetricsLoaderError::NegativeRate("NYC".to_string()))
        );
    }

    #[test]
    fn test_rejects_negative_benchmark() {
        let json = TEST_METRICS_JSON.replace(
            "\"average_employer_hsa\": 750",
            "\"average_employer_hsa\": -750",
        );

        let result = MetricsLoader::parse(json.as_bytes());

        assert_eq!(
            result,
            Err(MetricsLoaderError::NegativeBenchmark("average employer HSA"))
        );
    }
}
