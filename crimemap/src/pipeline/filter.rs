//! Area filter stage.

use crate::record::IncidentRecord;
use crate::selection::AreaFilter;

/// Keeps the records whose area equals the selected one.
///
/// [`AreaFilter::All`] keeps everything. Records with no area never match a named area. An
/// area that matches nothing yields an empty subset, which every later stage accepts.
pub fn filter<'a>(records: &'a [IncidentRecord], area: &AreaFilter) -> Vec<&'a IncidentRecord> {
    match area {
        AreaFilter::All => records.iter().collect(),
        AreaFilter::Area(name) => records
            .iter()
            .filter(|record| record.area() == Some(name.as_str()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<IncidentRecord> {
        vec![
            IncidentRecord::new(Some("A"), Some(19.4), Some(-99.1)),
            IncidentRecord::new(Some("B"), None, Some(-99.0)),
            IncidentRecord::new(None, Some(19.3), Some(-99.2)),
            IncidentRecord::new(Some("A"), Some(19.5), Some(-99.3)),
            IncidentRecord::new(Some("ALL"), Some(19.6), Some(-99.4)),
        ]
    }

    #[test]
    fn all_keeps_everything() {
        let records = records();
        let filtered = filter(&records, &AreaFilter::All);
        assert_eq!(filtered.len(), records.len());
        assert!(filtered.iter().zip(&records).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn named_area_keeps_only_matches() {
        let records = records();
        let filtered = filter(&records, &AreaFilter::Area("A".into()));
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|record| record.area() == Some("A")));
    }

    #[test]
    fn absent_area_gives_empty_subset() {
        let records = records();
        assert!(filter(&records, &AreaFilter::Area("Z".into())).is_empty());
    }

    #[test]
    fn literal_all_area_is_not_the_sentinel() {
        let records = records();
        let filtered = filter(&records, &AreaFilter::Area("ALL".into()));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].area(), Some("ALL"));
    }

    #[test]
    fn comparison_is_exact() {
        let records = records();
        assert!(filter(&records, &AreaFilter::Area("a".into())).is_empty());
    }
}
