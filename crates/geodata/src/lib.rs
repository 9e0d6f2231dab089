use serde_json::{Map, Value};

/// One coordinate pair in degrees.
///
/// Decoding is lenient: a component that is missing or non-numeric comes
/// back as `f64::NAN` rather than failing the whole document. Downstream
/// consumers filter on [`GeoPoint::is_finite`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn is_finite(&self) -> bool {
        self.lon_deg.is_finite() && self.lat_deg.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    LineString(Vec<GeoPoint>),
    MultiLineString(Vec<Vec<GeoPoint>>),
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
}

impl Geometry {
    /// The first ring of a polygonal geometry.
    ///
    /// `Polygon` yields its first ring, `MultiPolygon` the first ring of its
    /// first polygon. Every other variant has no outer ring.
    pub fn outer_ring(&self) -> Option<&[GeoPoint]> {
        match self {
            Geometry::Polygon(rings) => rings.first().map(|r| r.as_slice()),
            Geometry::MultiPolygon(polys) => polys
                .first()
                .and_then(|rings| rings.first())
                .map(|r| r.as_slice()),
            _ => None,
        }
    }
}

/// One concession or point record.
///
/// `geometry` is `None` when the source carried a GeoJSON `null` geometry or
/// a geometry object too malformed to use; such features still count toward
/// collection-level statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: Option<Geometry>,
}

/// An ordered feature collection; immutable after decode and replaced
/// wholesale on re-fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<GeoFeature>,
}

#[derive(Debug)]
pub enum GeoJsonError {
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            GeoJsonError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for GeoJsonError {}

impl FeatureCollection {
    pub fn from_geojson_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| GeoJsonError::InvalidFeature {
                index: 0,
                reason: format!("JSON parse error: {e}"),
            })?;
        Self::from_geojson_value(value)
    }

    /// Decodes a FeatureCollection document.
    ///
    /// Strictness policy: the document must structurally be a
    /// `FeatureCollection` of `Feature` objects, anything else is an error.
    /// Below that level the decode degrades instead of failing: unknown or
    /// `null` geometry becomes `geometry: None`, junk coordinate components
    /// become `NAN`, and missing properties become an empty map.
    pub fn from_geojson_value(value: Value) -> Result<Self, GeoJsonError> {
        let obj = value
            .as_object()
            .ok_or(GeoJsonError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(GeoJsonError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(GeoJsonError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(GeoJsonError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            let feat_obj = feat_val.as_object().ok_or(GeoJsonError::InvalidFeature {
                index,
                reason: "feature must be an object".to_string(),
            })?;

            let feat_type = feat_obj.get("type").and_then(|v| v.as_str()).ok_or(
                GeoJsonError::InvalidFeature {
                    index,
                    reason: "feature missing type".to_string(),
                },
            )?;
            if feat_type != "Feature" {
                return Err(GeoJsonError::InvalidFeature {
                    index,
                    reason: format!("unexpected feature type: {feat_type}"),
                });
            }

            let id = match feat_obj.get("id") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            };

            let properties = feat_obj
                .get("properties")
                .and_then(|v| v.as_object())
                .cloned()
                .unwrap_or_default();

            let geometry = feat_obj.get("geometry").and_then(parse_geometry);

            features.push(GeoFeature {
                id,
                properties,
                geometry,
            });
        }

        Ok(Self { features })
    }
}

fn parse_geometry(value: &Value) -> Option<Geometry> {
    let obj = value.as_object()?;
    let ty = obj.get("type").and_then(|v| v.as_str())?;
    let coords = obj.get("coordinates")?;

    match ty {
        "Point" => Some(Geometry::Point(parse_position(coords))),
        "MultiPoint" => Some(Geometry::MultiPoint(parse_positions(coords)?)),
        "LineString" => Some(Geometry::LineString(parse_positions(coords)?)),
        "MultiLineString" => Some(Geometry::MultiLineString(parse_lines(coords)?)),
        "Polygon" => Some(Geometry::Polygon(parse_lines(coords)?)),
        "MultiPolygon" => Some(Geometry::MultiPolygon(parse_multi_polygon(coords)?)),
        _ => None,
    }
}

fn parse_position(value: &Value) -> GeoPoint {
    let lon = position_component(value, 0);
    let lat = position_component(value, 1);
    GeoPoint::new(lon, lat)
}

fn position_component(value: &Value, index: usize) -> f64 {
    value
        .as_array()
        .and_then(|arr| arr.get(index))
        .and_then(|v| v.as_f64())
        .unwrap_or(f64::NAN)
}

fn parse_positions(coords: &Value) -> Option<Vec<GeoPoint>> {
    let arr = coords.as_array()?;
    Some(arr.iter().map(parse_position).collect())
}

fn parse_lines(coords: &Value) -> Option<Vec<Vec<GeoPoint>>> {
    let arr = coords.as_array()?;
    let mut out = Vec::with_capacity(arr.len());
    for line in arr {
        out.push(parse_positions(line)?);
    }
    Some(out)
}

fn parse_multi_polygon(coords: &Value) -> Option<Vec<Vec<Vec<GeoPoint>>>> {
    let polys = coords.as_array()?;
    let mut out = Vec::with_capacity(polys.len());
    for poly in polys {
        out.push(parse_lines(poly)?);
    }
    Some(out)
}
