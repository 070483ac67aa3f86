//! # Nearest-Station Resolver
//!
//! Maps a query coordinate onto the catalog station with the smallest
//! great-circle separation. For a query `q` and station `s`,
//!
//! ```text
//! score = sin(latq)·sin(lats) + cos(latq)·cos(lats)·cos(lonq − lons)
//! ```
//!
//! is the cosine of the angular separation between the two points, so the
//! nearest station is the one maximizing the score. The station half of
//! every product is precomputed in the catalog; only the query's four trig
//! scalars are computed here. Full scan — the catalog is hundreds of
//! stations, not millions.
//!
//! Out-of-range or non-finite coordinates resolve to `None` (the
//! "no station" sentinel), never an error: the caller treats an
//! unresolvable point as a legitimate all-null prediction. There is no
//! maximum-distance cutoff; a query in the middle of an ocean still
//! returns its nearest catalog station.

use crate::store::Station;

/// Find the catalog station nearest to `(lat, lon)`.
///
/// Returns `None` for coordinates outside `[-90, 90]` × `[-180, 180]`,
/// for non-finite inputs, and for an empty catalog. Ties on the score are
/// broken toward the earliest catalog entry; since the catalog is loaded
/// ordered by station id, the lowest id wins.
pub fn nearest_station<'a>(stations: &'a [Station], lat: f64, lon: f64) -> Option<&'a Station> {
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }

    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();

    let mut best: Option<(&Station, f64)> = None;
    for station in stations {
        let score = sin_lat * station.sin_lat
            + cos_lat * station.cos_lat * (cos_lon * station.cos_lon + sin_lon * station.sin_lon);
        if best.map_or(true, |(_, b)| score > b) {
            best = Some((station, score));
        }
    }
    best.map(|(station, _)| station)
}
