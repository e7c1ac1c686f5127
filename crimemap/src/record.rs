//! Incident records and the CSV loader.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use crimemap_types::GeoPoint;
use serde::{Deserialize, Serialize};

use crate::error::CrimeMapError;
use crate::selection::ALL_AREAS;

/// Names of the incident table columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Administrative area of the incident.
    pub area: String,
    /// Latitude in degrees.
    pub latitude: String,
    /// Longitude in degrees.
    pub longitude: String,
    /// Optional column used as the marker popup text.
    pub label: Option<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            area: "alcaldia_hecho".to_string(),
            latitude: "latitud".to_string(),
            longitude: "longitud".to_string(),
            label: Some("delito".to_string()),
        }
    }
}

/// A single incident row.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentRecord {
    area: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    label: Option<String>,
    fields: Vec<String>,
}

impl IncidentRecord {
    /// Creates a record with no label and no extra fields.
    pub fn new(area: Option<&str>, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        Self {
            area: area.map(str::to_string),
            latitude,
            longitude,
            label: None,
            fields: vec![],
        }
    }

    /// Sets the marker label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Administrative area, if recorded.
    pub fn area(&self) -> Option<&str> {
        self.area.as_deref()
    }

    /// Raw latitude value, if it parsed as a finite number.
    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    /// Raw longitude value, if it parsed as a finite number.
    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    /// Map position of the record.
    ///
    /// Returns `None` unless both coordinates are present and within the valid degree ranges.
    /// Records without a position never appear on the map.
    pub fn position(&self) -> Option<GeoPoint> {
        GeoPoint::try_latlon(self.latitude?, self.longitude?)
    }

    /// Marker label, if the label column exists and is not empty for this row.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// All values of the row in column order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// Incident table loaded once per session.
#[derive(Debug, Clone, Default)]
pub struct IncidentSet {
    columns: Vec<String>,
    records: Vec<IncidentRecord>,
}

impl IncidentSet {
    /// Creates a set from already parsed records.
    pub fn from_records(records: Vec<IncidentRecord>) -> Self {
        Self {
            columns: vec![],
            records,
        }
    }

    /// Loads the table from a CSV file.
    pub fn from_path(path: impl AsRef<Path>, mapping: &ColumnMapping) -> Result<Self, CrimeMapError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let set = Self::from_reader(file, mapping)?;
        log::info!(
            "Loaded {} incident records from {}",
            set.len(),
            path.display()
        );

        Ok(set)
    }

    /// Reads a CSV document with a header row.
    ///
    /// The area, latitude and longitude columns must exist. Their values may be empty in any
    /// row. A missing label column only disables marker labels.
    ///
    /// Header names and coordinate cells are trimmed. Area and label values are kept verbatim,
    /// so area filtering compares the exact cell text.
    pub fn from_reader(reader: impl Read, mapping: &ColumnMapping) -> Result<Self, CrimeMapError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let find = |name: &str| {
            columns
                .iter()
                .position(|column| column == name)
                .ok_or_else(|| CrimeMapError::MissingColumn(name.to_string()))
        };

        let area_idx = find(&mapping.area)?;
        let lat_idx = find(&mapping.latitude)?;
        let lon_idx = find(&mapping.longitude)?;
        let label_idx = match &mapping.label {
            Some(label) => {
                let idx = find(label).ok();
                if idx.is_none() {
                    log::warn!("Label column '{label}' not found, markers will have no popups");
                }
                idx
            }
            None => None,
        };

        let mut records = vec![];
        for row in reader.records() {
            let row = row?;
            let text = |idx: usize| row.get(idx).filter(|v| !v.is_empty()).map(str::to_string);
            let number = |idx: usize| {
                row.get(idx)
                    .and_then(|v| v.trim().parse::<f64>().ok())
                    .filter(|v| v.is_finite())
            };

            records.push(IncidentRecord {
                area: text(area_idx),
                latitude: number(lat_idx),
                longitude: number(lon_idx),
                label: label_idx.and_then(text),
                fields: row.iter().map(str::to_string).collect(),
            });
        }

        Ok(Self { columns, records })
    }

    /// Column names in file order. Empty for sets built with [`IncidentSet::from_records`].
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All records in file order.
    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Options of the area selector: [`ALL_AREAS`] followed by every distinct non-empty area
    /// value in sorted order.
    pub fn area_options(&self) -> Vec<String> {
        let areas: BTreeSet<&str> = self.records.iter().filter_map(|r| r.area()).collect();

        std::iter::once(ALL_AREAS)
            .chain(areas)
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const CSV: &str = "\
folio,alcaldia_hecho,delito,latitud,longitud
1,IZTAPALAPA,ROBO A TRANSEUNTE,19.35,-99.06
2,COYOACAN,FRAUDE,,-99.16
3,IZTAPALAPA,,19.36,nan
4,,ROBO DE VEHICULO,19.40,-99.13
5, BENITO JUAREZ ,AMENAZAS, 19.38 ,-99.16
";

    fn load() -> IncidentSet {
        IncidentSet::from_reader(CSV.as_bytes(), &ColumnMapping::default()).expect("valid csv")
    }

    #[test]
    fn reads_all_rows() {
        let set = load();
        assert_eq!(set.len(), 5);
        assert_eq!(
            set.columns(),
            ["folio", "alcaldia_hecho", "delito", "latitud", "longitud"]
        );
        assert_eq!(set.records()[0].fields()[0], "1");
    }

    #[test]
    fn empty_and_invalid_cells_become_none() {
        let set = load();
        let records = set.records();

        assert_eq!(records[1].latitude(), None);
        assert!(records[1].position().is_none());

        assert_eq!(records[2].longitude(), None);
        assert_eq!(records[2].label(), None);

        assert_eq!(records[3].area(), None);
        assert!(records[3].position().is_some());
    }

    #[test]
    fn coordinates_are_trimmed_but_areas_are_not() {
        let set = load();
        assert_eq!(set.records()[4].area(), Some(" BENITO JUAREZ "));
        let position = set.records()[4].position().expect("valid position");
        assert_abs_diff_eq!(position.lat(), 19.38);
        assert_abs_diff_eq!(position.lon(), -99.16);
    }

    #[test]
    fn area_options_are_sorted_and_unique() {
        let options = load().area_options();
        assert_eq!(
            options,
            ["ALL", " BENITO JUAREZ ", "COYOACAN", "IZTAPALAPA"]
        );
    }

    #[test]
    fn area_filter_compares_exact_cell_text() {
        let set = load();
        let trimmed = crate::pipeline::filter(
            set.records(),
            &crate::selection::AreaFilter::Area("BENITO JUAREZ".to_string()),
        );
        assert!(trimmed.is_empty());

        let verbatim = crate::pipeline::filter(
            set.records(),
            &crate::selection::AreaFilter::from_choice(" BENITO JUAREZ "),
        );
        assert_eq!(verbatim.len(), 1);
    }

    #[test]
    fn headers_are_trimmed() {
        let csv = " alcaldia_hecho , latitud ,longitud\nTLALPAN,19.28,-99.16\n";
        let set = IncidentSet::from_reader(csv.as_bytes(), &ColumnMapping::default())
            .expect("trimmed headers match");
        assert_eq!(set.columns(), ["alcaldia_hecho", "latitud", "longitud"]);
        assert_eq!(set.records()[0].area(), Some("TLALPAN"));
    }

    #[test]
    fn missing_coordinate_column_is_fatal() {
        let csv = "alcaldia_hecho,longitud\nIZTAPALAPA,-99.0\n";
        let err = IncidentSet::from_reader(csv.as_bytes(), &ColumnMapping::default())
            .expect_err("latitude column is missing");
        assert!(matches!(err, CrimeMapError::MissingColumn(name) if name == "latitud"));
    }

    #[test]
    fn missing_label_column_is_not_fatal() {
        let csv = "alcaldia_hecho,latitud,longitud\nIZTAPALAPA,19.3,-99.0\n";
        let set = IncidentSet::from_reader(csv.as_bytes(), &ColumnMapping::default())
            .expect("label column is optional");
        assert_eq!(set.records()[0].label(), None);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let csv = "alcaldia_hecho,latitud,longitud\nIZTAPALAPA,19.3\n";
        let err = IncidentSet::from_reader(csv.as_bytes(), &ColumnMapping::default())
            .expect_err("row is too short");
        assert!(matches!(err, CrimeMapError::Csv(_)));
    }

    #[test]
    fn out_of_range_coordinates_have_no_position() {
        let record = IncidentRecord::new(Some("A"), Some(190.0), Some(-99.0));
        assert_eq!(record.latitude(), Some(190.0));
        assert!(record.position().is_none());
    }
}
