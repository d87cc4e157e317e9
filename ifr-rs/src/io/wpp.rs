//! United Nations World Population Prospects tables.
//!
//! The reader understands the CSV export of the first sheet of "Population by
//! Age Groups - Both Sexes" (WPP2019_POP_F07_1). Each row is a region at a
//! reference date, with one column per 5-year age group and values in
//! thousands, using spaces as thousands separators.
use crate::prelude::{Age, AgeBracket, InputError, Pyramid, Real};
use csv::{ReaderBuilder, StringRecord};
use log::*;
use std::{fs::File, io::Read, path::Path};

pub const TYPE_COLUMN: &str = "Type";
pub const DATE_COLUMN: &str = "Reference date (as of 1 July)";
pub const REGION_COLUMN: &str = "Region, subregion, country or area *";

/// Row types holding population data. Other rows (labels, separators,
/// development groups) are dropped.
pub const KEPT_TYPES: [&str; 3] = ["Country/Area", "World", "Region"];

/// Age groups of the WPP tables: 0-4, 5-9, ..., 95-99 and 100+.
pub fn wpp_brackets(maxage: Age) -> Vec<AgeBracket> {
    let mut out: Vec<AgeBracket> = (0..20)
        .filter_map(|i| AgeBracket::new(5 * i, 5 * i + 4).ok())
        .collect();
    out.extend(AgeBracket::new(100, maxage).ok());
    return out;
}

/// Reads population pyramids from a WPP table.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WppReader {
    year: u32,
    maxage: Age,
}

impl WppReader {
    pub fn new(year: u32, maxage: Age) -> Self {
        WppReader { year, maxage }
    }

    /// Read every region at the reference year, in file order.
    pub fn read<R: Read>(&self, reader: R) -> Result<Vec<(String, Pyramid)>, InputError> {
        let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = rdr.headers()?.clone();
        let column = |name: &str| -> Result<usize, InputError> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| InputError::MissingColumn(name.to_string()))
        };

        let type_idx = column(TYPE_COLUMN)?;
        let date_idx = column(DATE_COLUMN)?;
        let region_idx = column(REGION_COLUMN)?;
        let brackets = wpp_brackets(self.maxage);
        let mut age_columns = Vec::with_capacity(brackets.len());
        for b in &brackets {
            age_columns.push((*b, column(&b.label(self.maxage))?));
        }

        let mut out = vec![];
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            let row = i + 2;
            let kind = record.get(type_idx).unwrap_or("").trim();
            if !KEPT_TYPES.contains(&kind) {
                trace!("row {}: skipping '{}' row", row, kind);
                continue;
            }
            let year = parse_number(&record, row, date_idx, DATE_COLUMN)?;
            if year as u32 != self.year {
                continue;
            }

            let region = record.get(region_idx).unwrap_or("").trim().to_string();
            let mut counts = Vec::with_capacity(age_columns.len());
            for (b, idx) in &age_columns {
                let label = b.label(self.maxage);
                counts.push((*b, 1000.0 * parse_number(&record, row, *idx, &label)?));
            }
            let pyramid = Pyramid::new(counts, self.maxage)?;
            debug!("{}: {} people", region, pyramid.total());
            out.push((region, pyramid));
        }
        info!("read {} pyramids for year {}", out.len(), self.year);
        return Ok(out);
    }

    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Vec<(String, Pyramid)>, InputError> {
        self.read(File::open(path)?)
    }
}

/// Parse a numeric cell, ignoring any embedded whitespace.
fn parse_number(
    record: &StringRecord,
    row: usize,
    idx: usize,
    column: &str,
) -> Result<Real, InputError> {
    let raw = record.get(idx).unwrap_or("");
    let clean: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    clean.parse::<Real>().map_err(|_| InputError::Number {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bracket::br, MAXAGE};
    use assert_approx_eq::assert_approx_eq;

    fn header() -> String {
        let mut h = format!(
            "Index,Variant,\"{}\",Notes,Country code,{},\"{}\"",
            REGION_COLUMN, TYPE_COLUMN, DATE_COLUMN
        );
        for b in wpp_brackets(MAXAGE) {
            h.push(',');
            h.push_str(&b.label(MAXAGE));
        }
        return h;
    }

    fn row(idx: usize, region: &str, kind: &str, year: u32, value: &str) -> String {
        let mut r = format!("{},Estimates,{},,900,{},{}", idx, region, kind, year);
        for _ in 0..21 {
            r.push_str(&format!(",\"{}\"", value));
        }
        return r;
    }

    #[test]
    fn brackets() {
        let b = wpp_brackets(MAXAGE);
        assert_eq!(b.len(), 21);
        assert_eq!(b[0], br(0, 4));
        assert_eq!(b[20], br(100, 100));
        assert_eq!(b[20].label(MAXAGE), "100+");
    }

    #[test]
    fn read_table() {
        let csv = vec![
            header(),
            row(1, "WORLD", "World", 2015, "1 000"),
            row(2, "WORLD", "World", 2020, "1 000"),
            row(3, "UN development groups", "Label/Separator", 2020, "..."),
            row(4, "More developed regions", "Development Group", 2020, "5"),
            row(5, "France", "Country/Area", 2020, " 2 345.5 "),
        ]
        .join("\n");
        let pyramids = WppReader::new(2020, MAXAGE).read(csv.as_bytes()).unwrap();
        assert_eq!(pyramids.len(), 2);
        assert_eq!(pyramids[0].0, "WORLD");
        assert_approx_eq!(pyramids[0].1.total(), 21.0 * 1_000_000.0);
        assert_eq!(pyramids[1].0, "France");
        assert_approx_eq!(pyramids[1].1.count(&br(20, 24)).unwrap(), 2_345_500.0);
    }

    #[test]
    fn malformed_tables() {
        let bad_cell = vec![header(), row(1, "WORLD", "World", 2020, "n/a")].join("\n");
        match WppReader::new(2020, MAXAGE).read(bad_cell.as_bytes()) {
            Err(InputError::Number { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "0-4");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let no_type = "Region, subregion, country or area *,0-4\nWORLD,1";
        assert!(matches!(
            WppReader::new(2020, MAXAGE).read(no_type.as_bytes()),
            Err(InputError::MissingColumn(_))
        ));
    }
}
