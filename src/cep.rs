use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thousands::Separable;

use crate::error::BenchError;
use crate::hash_table::{Keyed, OpenTable};

const CODE_LEN: usize = 5;
const CITY_LEN: usize = 99;
const STATE_LEN: usize = 2;

/// A postal code record, keyed by the first five digits of the code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cep {
    pub code: String,
    pub city: String,
    pub state: String,
}

impl Cep {
    pub fn new(code: &str, city: &str, state: &str) -> Self {
        Self {
            code: truncate(code, CODE_LEN),
            city: truncate(city, CITY_LEN),
            state: truncate(state, STATE_LEN),
        }
    }
}

impl Keyed for Cep {
    fn key(&self) -> &str {
        &self.code
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// One `CEP,CIDADE,ESTADO` row, borrowed as raw bytes so that Latin-1
/// exports load without a decoding error.
#[derive(Debug, Deserialize)]
struct CepRow<'a>(&'a [u8], &'a [u8], &'a [u8]);

impl CepRow<'_> {
    fn to_cep(&self) -> Cep {
        Cep::new(
            &String::from_utf8_lossy(self.0),
            &String::from_utf8_lossy(self.1),
            &String::from_utf8_lossy(self.2),
        )
    }
}

/// Inserts up to `max_records` rows from `reader` into `table`.
///
/// The first line is a header. Rows that do not carry three fields are
/// skipped; bytes that are not UTF-8 are replaced, not rejected. Only read
/// errors abort the load. Returns the number of records inserted.
pub fn load_csv<R: Read>(
    reader: R,
    table: &mut OpenTable<Cep>,
    max_records: usize,
) -> Result<usize, BenchError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut count = 0;
    let mut skipped = 0;
    let mut record = csv::ByteRecord::new();
    while count < max_records && rdr.read_byte_record(&mut record)? {
        match record.deserialize::<CepRow>(None) {
            Ok(row) => {
                table.insert(row.to_cep());
                count += 1;
            }
            Err(e) => {
                skipped += 1;
                let line = record.position().map(|p| p.line());
                tracing::debug!(?line, "skipping row: {e}");
            }
        }
    }

    tracing::debug!(
        loaded = %count.separate_with_commas(),
        skipped,
        capacity = table.capacity(),
        "csv loaded"
    );
    Ok(count)
}

pub fn load_csv_path(
    path: &Path,
    table: &mut OpenTable<Cep>,
    max_records: usize,
) -> Result<usize, BenchError> {
    let file = File::open(path).map_err(|source| BenchError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_csv(file, table, max_records)
}
