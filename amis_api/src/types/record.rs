//! One row of the market price table.

use std::str::FromStr;

/// Placeholder written for prices and supply volumes the site leaves blank.
pub const MISSING_VALUE: &str = "N/A";

/// A named column of the market price table.
///
/// Each column is read from a fixed cell position of the source row. The
/// fourth cell is never read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Commodity,
    Classification,
    Grade,
    Market,
    Wholesale,
    Retail,
    SupplyVolume,
    County,
    Date,
}

impl Column {
    /// All columns in default output order.
    pub const ALL: [Column; 9] = [
        Column::Commodity,
        Column::Classification,
        Column::Grade,
        Column::Market,
        Column::Wholesale,
        Column::Retail,
        Column::SupplyVolume,
        Column::County,
        Column::Date,
    ];

    /// Column name as used in the CSV header and the column list.
    pub fn name(&self) -> &'static str {
        match self {
            Column::Commodity => "commodity",
            Column::Classification => "classification",
            Column::Grade => "grade",
            Column::Market => "market",
            Column::Wholesale => "wholesale",
            Column::Retail => "retail",
            Column::SupplyVolume => "supply_volume",
            Column::County => "county",
            Column::Date => "date",
        }
    }

    /// 1-based position of the source cell among the row's children.
    pub fn cell_position(&self) -> usize {
        match self {
            Column::Commodity => 1,
            Column::Classification => 2,
            Column::Grade => 3,
            Column::Market => 5,
            Column::Wholesale => 6,
            Column::Retail => 7,
            Column::SupplyVolume => 8,
            Column::County => 9,
            Column::Date => 10,
        }
    }

    /// Names of all columns in default order.
    pub fn default_names() -> Vec<String> {
        Column::ALL.iter().map(|c| c.name().to_string()).collect()
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Column {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or(())
    }
}

/// A market price row, keyed by the nine known columns.
///
/// Absent cells are `None`, except `supply_volume`, which falls back to
/// [`MISSING_VALUE`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketRecord {
    pub commodity: Option<String>,
    pub classification: Option<String>,
    pub grade: Option<String>,
    pub market: Option<String>,
    /// Normalized wholesale price, already stripped of its unit.
    pub wholesale: Option<String>,
    /// Normalized retail price, already stripped of its unit.
    pub retail: Option<String>,
    pub supply_volume: String,
    pub county: Option<String>,
    pub date: Option<String>,
}

impl Default for MarketRecord {
    fn default() -> Self {
        Self {
            commodity: None,
            classification: None,
            grade: None,
            market: None,
            wholesale: None,
            retail: None,
            supply_volume: MISSING_VALUE.to_string(),
            county: None,
            date: None,
        }
    }
}

impl MarketRecord {
    /// Value of a known column.
    pub fn get(&self, column: Column) -> Option<&str> {
        match column {
            Column::Commodity => self.commodity.as_deref(),
            Column::Classification => self.classification.as_deref(),
            Column::Grade => self.grade.as_deref(),
            Column::Market => self.market.as_deref(),
            Column::Wholesale => self.wholesale.as_deref(),
            Column::Retail => self.retail.as_deref(),
            Column::SupplyVolume => Some(self.supply_volume.as_str()),
            Column::County => self.county.as_deref(),
            Column::Date => self.date.as_deref(),
        }
    }

    /// Value of a column given by name. Unknown names yield `None`.
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        name.parse::<Column>().ok().and_then(|c| self.get(c))
    }

    /// Values for `columns`, in order.
    pub fn project<'a, S: AsRef<str>>(&'a self, columns: &[S]) -> Vec<Option<&'a str>> {
        columns
            .iter()
            .map(|name| self.get_by_name(name.as_ref()))
            .collect()
    }

    /// Rows without a commodity name are spacer or header rows.
    pub fn has_commodity(&self) -> bool {
        self.commodity.as_deref().is_some_and(|c| !c.is_empty())
    }
}
