//! Filter, sample and compose stages chained into one pure function.

mod filter;
mod sample;

pub use filter::filter;
pub use sample::{sample, sample_with_seed, SAMPLE_SEED};

use crate::boundary::BoundaryCollection;
use crate::map::{compose_map, MapArtifact};
use crate::options::ViewOptions;
use crate::record::IncidentSet;
use crate::selection::ViewSelection;

/// Runs one full render cycle: filter by area, sample down to the cap, compose the map.
///
/// Pure: no I/O and no state, so the same inputs always produce the same artifact. Call it
/// again with a new [`ViewSelection`] on every user interaction.
pub fn render_view<'a>(
    records: &'a IncidentSet,
    boundaries: &'a BoundaryCollection,
    selection: &ViewSelection,
    options: &ViewOptions,
) -> MapArtifact<'a> {
    let filtered = filter(records.records(), &selection.area);
    log::debug!(
        "Area filter '{}' kept {} of {} records",
        selection.area,
        filtered.len(),
        records.len()
    );

    let sampled = sample_with_seed(filtered, selection.sample_cap.get(), options.sample_seed);

    compose_map(
        boundaries,
        &sampled,
        selection.layers,
        selection.area.area(),
        options,
    )
}

#[cfg(test)]
mod tests {
    use crimemap_types::GeoPoint;

    use super::*;
    use crate::boundary::{Boundary, Polygon};
    use crate::record::IncidentRecord;
    use crate::selection::{AreaFilter, LayerSet, SampleCap};

    fn boundaries() -> BoundaryCollection {
        let ring = vec![
            GeoPoint::latlon(19.0, -99.5),
            GeoPoint::latlon(19.0, -98.5),
            GeoPoint::latlon(19.8, -98.5),
            GeoPoint::latlon(19.0, -99.5),
        ];
        BoundaryCollection::new(vec![Boundary::new(
            Some("A"),
            vec![Polygon::new(ring, vec![])],
        )])
    }

    #[test]
    fn example_from_two_records() {
        let records = IncidentSet::from_records(vec![
            IncidentRecord::new(Some("A"), Some(19.4), Some(-99.1)),
            IncidentRecord::new(Some("B"), None, Some(-99.0)),
        ]);

        let filtered = filter(records.records(), &AreaFilter::Area("A".into()));
        assert_eq!(filtered, [&records.records()[0]]);

        let sampled = sample(filtered.clone(), 100);
        assert_eq!(sampled, filtered);

        let boundaries = boundaries();
        let selection = ViewSelection {
            area: AreaFilter::Area("A".into()),
            layers: LayerSet {
                points: true,
                heatmap: false,
            },
            sample_cap: SampleCap::clamped(100),
        };
        let map = render_view(&records, &boundaries, &selection, &ViewOptions::default());
        assert_eq!(map.marker_count(), 1);
        assert!(map.heatmap.is_none());
    }

    #[test]
    fn sample_cap_bounds_markers() {
        let records = IncidentSet::from_records(
            (0..1500)
                .map(|i| {
                    IncidentRecord::new(
                        Some("A"),
                        Some(19.0 + f64::from(i) * 0.0005),
                        Some(-99.0),
                    )
                })
                .collect(),
        );
        let boundaries = boundaries();
        let selection = ViewSelection {
            area: AreaFilter::All,
            layers: LayerSet::BOTH,
            sample_cap: SampleCap::clamped(300),
        };

        let map = render_view(&records, &boundaries, &selection, &ViewOptions::default());
        assert_eq!(map.marker_count(), 300);
        assert_eq!(
            map.heatmap.as_ref().map(|layer| layer.total_weight()),
            Some(300)
        );
    }

    #[test]
    fn render_view_is_deterministic() {
        let records = IncidentSet::from_records(
            (0..1000)
                .map(|i| IncidentRecord::new(None, Some(19.0 + f64::from(i) * 0.001), Some(-99.0)))
                .collect(),
        );
        let boundaries = boundaries();
        let selection = ViewSelection {
            layers: LayerSet::BOTH,
            sample_cap: SampleCap::clamped(100),
            ..Default::default()
        };
        let options = ViewOptions::default();

        let first = render_view(&records, &boundaries, &selection, &options);
        let second = render_view(&records, &boundaries, &selection, &options);
        assert_eq!(first.markers, second.markers);
        assert_eq!(first.heatmap, second.heatmap);
        assert_eq!(first.view, second.view);
    }

    #[test]
    fn unmatched_area_renders_boundaries_only() {
        let records = IncidentSet::from_records(vec![IncidentRecord::new(
            Some("A"),
            Some(19.4),
            Some(-99.1),
        )]);
        let boundaries = boundaries();
        let selection = ViewSelection {
            area: AreaFilter::Area("NOWHERE".into()),
            layers: LayerSet::BOTH,
            ..Default::default()
        };

        let map = render_view(&records, &boundaries, &selection, &ViewOptions::default());
        assert_eq!(map.boundaries.len(), 1);
        assert_eq!(map.marker_count(), 0);
        assert_eq!(map.density_cell_count(), 0);
    }
}
