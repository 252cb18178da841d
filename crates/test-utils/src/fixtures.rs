//! Common test fixtures.

/// Bounding boxes as (min_x, min_y, max_x, max_y).
pub mod bbox {
    /// Paris area used by the default run configuration
    pub const PARIS: (f64, f64, f64, f64) = (2.0, 48.6, 2.7, 49.1);

    /// Unit square
    pub const UNIT: (f64, f64, f64, f64) = (0.0, 0.0, 1.0, 1.0);

    /// Inverted bbox (min > max)
    pub const INVALID: (f64, f64, f64, f64) = (10.0, 10.0, 5.0, 5.0);
}

/// Origins as (lon, lat).
pub mod origin {
    /// Notre-Dame parvis, Paris
    pub const NOTRE_DAME: (f64, f64) = (2.34880, 48.85330);
}

/// Google Distance Matrix API response bodies.
pub mod distance_matrix {
    /// A route was found, 1834 seconds.
    pub const OK: &str = r#"{
  "destination_addresses": ["Rue de Rivoli, Paris, France"],
  "origin_addresses": ["Parvis Notre-Dame, Paris, France"],
  "rows": [
    {
      "elements": [
        {
          "distance": { "text": "14.2 km", "value": 14213 },
          "duration": { "text": "31 mins", "value": 1834 },
          "status": "OK"
        }
      ]
    }
  ],
  "status": "OK"
}"#;

    /// Request succeeded but no route exists.
    pub const ZERO_RESULTS: &str = r#"{
  "destination_addresses": [""],
  "origin_addresses": ["Parvis Notre-Dame, Paris, France"],
  "rows": [ { "elements": [ { "status": "ZERO_RESULTS" } ] } ],
  "status": "OK"
}"#;

    /// Destination could not be geocoded.
    pub const NOT_FOUND: &str = r#"{
  "destination_addresses": [],
  "origin_addresses": [],
  "rows": [ { "elements": [ { "status": "NOT_FOUND" } ] } ],
  "status": "OK"
}"#;

    /// Daily quota exhausted.
    pub const OVER_QUERY_LIMIT: &str = r#"{
  "destination_addresses": [],
  "origin_addresses": [],
  "rows": [],
  "status": "OVER_QUERY_LIMIT",
  "error_message": "You have exceeded your daily request quota for this API."
}"#;

    /// Key rejected.
    pub const REQUEST_DENIED: &str = r#"{
  "destination_addresses": [],
  "origin_addresses": [],
  "rows": [],
  "status": "REQUEST_DENIED",
  "error_message": "The provided API key is invalid."
}"#;

    /// Transient server-side failure.
    pub const UNKNOWN_ERROR: &str = r#"{
  "destination_addresses": [],
  "origin_addresses": [],
  "rows": [],
  "status": "UNKNOWN_ERROR"
}"#;
}

/// A complete sample table with one failed sample.
pub const SAMPLE_TABLE: &str = "#Origin: 0.000000,0.000000
#Start time: 2024-05-01 09:12:44.000000
#longitude,latitude,time in seconds
0.000000,0.000000,60
0.000000,1.000000,120
#0.500000,0.500000,ZERO_RESULTS
1.000000,0.000000,120
1.000000,1.000000,180
#End time: 2024-05-01 09:13:02.000000
";
