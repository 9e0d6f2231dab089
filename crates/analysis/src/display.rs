use geodata::GeoFeature;
use serde::Serialize;

use crate::centroid::resolve_centroid;
use crate::properties::{MISSING_TEXT, numeric_property, text_property};

/// A flattened, presentation-ready popup payload for one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRecord {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub area_ha: Option<f64>,
    pub company: String,
    pub country: String,
    pub maps_url: String,
}

impl DisplayRecord {
    /// The area figure as popup text, with the missing-data sentinel.
    pub fn area_label(&self) -> String {
        match self.area_ha {
            Some(area) => area.to_string(),
            None => MISSING_TEXT.to_string(),
        }
    }
}

/// Builds `https://www.google.com/maps?q={lat},{lon}` for a coordinate.
/// Latitude comes first in the query. Pure string formatting; opening the
/// link is the presentation layer's business.
pub fn external_map_link(lon_deg: f64, lat_deg: f64) -> String {
    format!("https://www.google.com/maps?q={lat_deg},{lon_deg}")
}

/// Bundles one hit-tested feature into a [`DisplayRecord`].
///
/// Returns `None` when the feature has no geometry, no outer ring, or no
/// resolvable centroid; the caller skips the interaction in that case
/// instead of showing a popup. The input is never mutated.
pub fn bundle_for_display(feature: &GeoFeature) -> Option<DisplayRecord> {
    let ring = feature.geometry.as_ref()?.outer_ring()?;
    let centroid = resolve_centroid(ring)?;

    Some(DisplayRecord {
        lon_deg: centroid.lon_deg,
        lat_deg: centroid.lat_deg,
        area_ha: numeric_property(&feature.properties, "area_ha"),
        company: text_property(&feature.properties, "company"),
        country: text_property(&feature.properties, "country"),
        maps_url: external_map_link(centroid.lon_deg, centroid.lat_deg),
    })
}

#[cfg(test)]
mod tests {
    use super::{bundle_for_display, external_map_link};
    use geodata::{GeoFeature, GeoPoint, Geometry};
    use pretty_assertions::assert_eq;
    use serde_json::{Map, Value, json};

    fn square_polygon() -> Geometry {
        Geometry::Polygon(vec![vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 2.0),
            GeoPoint::new(2.0, 2.0),
            GeoPoint::new(2.0, 0.0),
        ]])
    }

    fn feature(geometry: Option<Geometry>, props: &[(&str, Value)]) -> GeoFeature {
        let properties: Map<String, Value> = props
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        GeoFeature {
            id: None,
            properties,
            geometry,
        }
    }

    #[test]
    fn bundles_centroid_and_attributes() {
        let f = feature(Some(square_polygon()), &[("area_ha", json!(12.345))]);
        let record = bundle_for_display(&f).expect("record");
        assert_eq!(record.lon_deg, 1.0);
        assert_eq!(record.lat_deg, 1.0);
        assert_eq!(record.area_ha, Some(12.345));
        assert_eq!(record.company, "N/A");
        assert_eq!(record.country, "N/A");
        assert_eq!(record.maps_url, "https://www.google.com/maps?q=1,1");
    }

    #[test]
    fn absent_geometry_bundles_to_none() {
        let f = feature(None, &[("area_ha", json!(1.0))]);
        assert_eq!(bundle_for_display(&f), None);
    }

    #[test]
    fn point_geometry_bundles_to_none() {
        let f = feature(Some(Geometry::Point(GeoPoint::new(1.0, 2.0))), &[]);
        assert_eq!(bundle_for_display(&f), None);
    }

    #[test]
    fn unresolvable_centroid_bundles_to_none() {
        let f = feature(
            Some(Geometry::Polygon(vec![vec![GeoPoint::new(
                f64::NAN,
                f64::NAN,
            )]])),
            &[],
        );
        assert_eq!(bundle_for_display(&f), None);
    }

    #[test]
    fn area_label_uses_sentinel() {
        let mut record = bundle_for_display(&feature(Some(square_polygon()), &[]))
            .expect("record");
        assert_eq!(record.area_label(), "N/A");
        record.area_ha = Some(15.5);
        assert_eq!(record.area_label(), "15.5");
    }

    #[test]
    fn map_link_puts_latitude_first() {
        assert_eq!(
            external_map_link(117.9903, -2.5489),
            "https://www.google.com/maps?q=-2.5489,117.9903"
        );
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let f = feature(Some(square_polygon()), &[("company", json!("PT X"))]);
        let record = bundle_for_display(&f).expect("record");
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["lonDeg"], json!(1.0));
        assert_eq!(value["areaHa"], json!(null));
        assert_eq!(value["company"], json!("PT X"));
        assert_eq!(value["mapsUrl"], json!("https://www.google.com/maps?q=1,1"));
    }
}
