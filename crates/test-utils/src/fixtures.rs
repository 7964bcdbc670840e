//! Sample SPC products for tests.
//!
//! The outlook builders produce files shaped like the `.lyr.geojson`
//! archives: one feature per risk polygon with `LABEL`, `LABEL2`, `stroke`
//! and `fill` properties.

use serde_json::{json, Value};

/// One outlook polygon: `(LABEL, LABEL2, stroke, fill)`.
pub type OutlookRow<'a> = (&'a str, &'a str, &'a str, &'a str);

/// Day 1 categorical outlook with thunder, marginal and slight risk.
pub const CATEGORICAL_ROWS: [OutlookRow<'static>; 3] = [
    ("TSTM", "General Thunderstorms Risk", "#55BB55", "#C1E9C1"),
    ("MRGL", "Marginal Risk", "#005500", "#66A366"),
    ("SLGT", "Slight Risk", "#DDAA00", "#FFE066"),
];

/// Probabilistic hail outlook whose file also carries the significant polygon.
pub const HAIL_ROWS: [OutlookRow<'static>; 3] = [
    ("0.05", "5% Hail Risk", "#70380f", "#9d4e15"),
    ("0.15", "15% Hail Risk", "#DDAA00", "#FFE066"),
    ("SIGN", "10% Significant Hail Risk", "#000000", "#888888"),
];

/// Significant hail layer, published as its own file.
pub const SIGHAIL_ROWS: [OutlookRow<'static>; 1] =
    [("SIGN", "10% Significant Hail Risk", "#000000", "#888888")];

/// Day 1 fire weather dry thunderstorm outlook.
pub const DRYT_ROWS: [OutlookRow<'static>; 2] = [
    ("IDRT", "Isolated Dry Thunderstorms", "#8B4726", "#C5A393"),
    ("SDRT", "Scattered Dry Thunderstorms", "#FF0000", "#FF8080"),
];

/// Build an outlook feature collection, one square polygon per row.
pub fn outlook_geojson(rows: &[OutlookRow<'_>]) -> String {
    let features: Vec<Value> = rows
        .iter()
        .enumerate()
        .map(|(i, (label, label2, stroke, fill))| {
            let west = -100.0 + i as f64;
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[
                        [west, 35.0], [west + 1.0, 35.0], [west + 1.0, 36.0],
                        [west, 36.0], [west, 35.0]
                    ]]]
                },
                "properties": {
                    "DN": i + 2,
                    "VALID": "202004121630",
                    "EXPIRE": "202004131200",
                    "ISSUE": "202004121617",
                    "LABEL": label,
                    "LABEL2": label2,
                    "stroke": stroke,
                    "fill": fill
                }
            })
        })
        .collect();

    json!({ "type": "FeatureCollection", "features": features }).to_string()
}

/// Mesoscale discussion 0412 of 2023 as served by the SPC text archive.
pub const MD_0412_TEXT: &str = "\
   Mesoscale Discussion 0412
   NWS Storm Prediction Center Norman OK
   0345 PM CDT Tue Apr 18 2023

   Areas affected...Portions of central Oklahoma

   Concerning...Severe potential...Watch likely

   Valid 182045Z - 182215Z

   Probability of Watch Issuance...80 percent

   SUMMARY...Supercells capable of large hail and a couple tornadoes are
   expected to develop along the dryline over the next hour or two.

   ..Forecaster.. 04/18/2023

   ...Please see www.spc.noaa.gov for graphic product...

   ATTN...WFO...OUN...

   LAT...LON   35239650 36239650 36239750 35230289
               35239650

   MOST PROBABLE PEAK TORNADO INTENSITY...85-115 MPH
";

/// Same discussion with the coordinate block removed.
pub const MD_WITHOUT_COORDINATES: &str = "\
   Mesoscale Discussion 0412
   NWS Storm Prediction Center Norman OK

   SUMMARY...Supercells expected along the dryline.
";

/// Same discussion with the header line removed.
pub const MD_WITHOUT_NUMBER: &str = "\
   NWS Storm Prediction Center Norman OK

   LAT...LON   35239650 36239650 36239750 35239650
";
