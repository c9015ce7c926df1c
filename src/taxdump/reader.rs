//! Reading NCBI taxdump tables.

use crate::error::{Result, TreeError};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// NCBI taxonomy identifier.
pub type TaxId = u64;

/// Name class of the preferred display name in `names.dmp`.
const SCIENTIFIC_NAME: &str = "scientific name";

/// Field separator in `.dmp` files.
const FIELD_SEPARATOR: &str = "\t|\t";

/// Row terminator in `.dmp` files.
const ROW_TERMINATOR: &str = "\t|";

// =#========================================================================#=
// TAXON RECORD
// =#========================================================================#=
/// One taxon of a [Taxdump].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonRecord {
    /// Parent taxid; equal to the own taxid for the root
    pub parent: TaxId,
    /// Taxonomic rank, e.g. `"species"`
    pub rank: String,
    /// Scientific name, empty if no names were read
    pub name: String,
    /// Taxids naming this taxon as parent
    pub children: BTreeSet<TaxId>,
}

// =#========================================================================#=
// TAXDUMP
// =#========================================================================#=
/// Mapping from taxid to [TaxonRecord], as given by NCBI `nodes.dmp`
/// and (optionally) `names.dmp`.
///
/// # Example
/// ```
/// use phylgebra::taxdump::Taxdump;
///
/// let nodes = vec![
///     vec!["1", "1", "no rank"],
///     vec!["2", "1", "superkingdom"],
///     vec!["3", "1", "superkingdom"],
/// ];
/// let names = vec![vec!["2", "Bacteria", "", "scientific name"]];
///
/// let taxdump = Taxdump::from_rows(nodes).unwrap().with_names(names).unwrap();
/// assert_eq!(taxdump.root(), Some(1));
/// assert_eq!(taxdump.get(2).unwrap().name, "Bacteria");
/// assert_eq!(taxdump.get(3).unwrap().name, "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Taxdump {
    records: BTreeMap<TaxId, TaxonRecord>,
    root: Option<TaxId>,
}

impl Taxdump {
    /// Builds the mapping from rows of `nodes.dmp`.
    ///
    /// Each row holds at least (taxid, parent taxid, rank); further fields
    /// are ignored. The root is the taxon that is its own parent. All names
    /// are empty; see [with_names](Self::with_names).
    ///
    /// # Errors
    /// [TreeError::MalformedInput] if a row is too short, holds an invalid or
    /// repeated taxid, names a parent missing from the table, or if there is
    /// more than one root.
    pub fn from_rows<I, R, S>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut records = BTreeMap::new();
        for (line, row) in rows.into_iter().enumerate() {
            let fields = row.as_ref();
            if fields.len() < 3 {
                return Err(short_row("nodes", line, 3));
            }
            let taxid = parse_taxid(fields[0].as_ref(), line)?;
            let record = TaxonRecord {
                parent: parse_taxid(fields[1].as_ref(), line)?,
                rank: fields[2].as_ref().to_string(),
                name: String::new(),
                children: BTreeSet::new(),
            };
            if records.insert(taxid, record).is_some() {
                return Err(TreeError::malformed_input(format!("Taxid {} listed twice", taxid)));
            }
        }

        let mut root = None;
        let links: Vec<(TaxId, TaxId)> = records.iter().map(|(&id, r)| (id, r.parent)).collect();
        for (taxid, parent) in links {
            if taxid == parent {
                if let Some(other) = root.replace(taxid) {
                    return Err(TreeError::malformed_input(format!(
                        "Taxids {} and {} are both their own parent",
                        other, taxid
                    )));
                }
                continue;
            }
            match records.get_mut(&parent) {
                Some(record) => {
                    record.children.insert(taxid);
                }
                None => {
                    return Err(TreeError::malformed_input(format!(
                        "Parent {} of taxid {} is missing",
                        parent, taxid
                    )));
                }
            }
        }

        debug!("Read {} taxa from nodes table", records.len());
        Ok(Taxdump { records, root })
    }

    /// Attaches scientific names from rows of `names.dmp`.
    ///
    /// Each row holds (taxid, name, unique name, name class); only rows of
    /// class `scientific name` are used. Rows for taxids not in the table
    /// are skipped.
    ///
    /// # Errors
    /// [TreeError::MalformedInput] if a row is too short or has an invalid taxid.
    pub fn with_names<I, R, S>(mut self, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut named = 0;
        for (line, row) in rows.into_iter().enumerate() {
            let fields = row.as_ref();
            if fields.len() < 4 {
                return Err(short_row("names", line, 4));
            }
            if fields[3].as_ref() != SCIENTIFIC_NAME {
                continue;
            }
            let taxid = parse_taxid(fields[0].as_ref(), line)?;
            match self.records.get_mut(&taxid) {
                Some(record) => {
                    record.name = fields[1].as_ref().to_string();
                    named += 1;
                }
                None => warn!("Skipping name of unknown taxid {} (row {})", taxid, line + 1),
            }
        }

        debug!("Attached {} scientific names", named);
        Ok(self)
    }

    /// Returns the record of `taxid`, if present.
    pub fn get(&self, taxid: TaxId) -> Option<&TaxonRecord> {
        self.records.get(&taxid)
    }

    /// Returns the taxid of the root (the taxon that is its own parent).
    pub fn root(&self) -> Option<TaxId> {
        self.root
    }

    /// Returns the number of taxa.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no taxa.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns an iterator over all taxa, by increasing taxid.
    pub fn iter(&self) -> impl Iterator<Item = (TaxId, &TaxonRecord)> {
        self.records.iter().map(|(&id, record)| (id, record))
    }
}

/// Reads NCBI taxdump files into a [Taxdump].
///
/// # Arguments
/// * `nodes_path` - Path to `nodes.dmp`
/// * `names_path` - Optional path to `names.dmp`
///
/// # Errors
/// * [TreeError::Io] if a file cannot be read
/// * [TreeError::MalformedInput] as for [Taxdump::from_rows] and [Taxdump::with_names]
pub fn read_taxdump<P: AsRef<Path>>(nodes_path: P, names_path: Option<P>) -> Result<Taxdump> {
    let taxdump = Taxdump::from_rows(read_dmp(nodes_path.as_ref())?)?;
    match names_path {
        Some(path) => taxdump.with_names(read_dmp(path.as_ref())?),
        None => Ok(taxdump),
    }
}

/// Splits each non-empty line of a `.dmp` file into its fields.
fn read_dmp(path: &Path) -> Result<Vec<Vec<String>>> {
    let reader = BufReader::new(File::open(path)?);
    let mut rows = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(split_dmp_line(&line));
    }
    Ok(rows)
}

/// Splits a line like `"2\t|\t1\t|\tsuperkingdom\t|"` into its fields.
fn split_dmp_line(line: &str) -> Vec<String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let line = line.strip_suffix(ROW_TERMINATOR).unwrap_or(line);
    line.split(FIELD_SEPARATOR).map(|f| f.trim().to_string()).collect()
}

fn parse_taxid(field: &str, line: usize) -> Result<TaxId> {
    field.trim().parse().map_err(|_| {
        TreeError::malformed_input(format!("Invalid taxid '{}' in row {}", field, line + 1))
    })
}

fn short_row(table: &str, line: usize, expected: usize) -> TreeError {
    TreeError::malformed_input(format!(
        "Row {} of {} table has fewer than {} fields",
        line + 1,
        table,
        expected
    ))
}
