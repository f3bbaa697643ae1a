//! Cluster layer: markers grouped by screen-space proximity per zoom level.

use std::collections::HashMap;

use serde::Serialize;
use tracing::trace;

use map_common::point::haversine_km;
use map_common::{BoundingRegion, BoundsAccumulator};
use projection::mercator::lat_lon_to_pixel;

use crate::config::{ClusterConfig, MarkerStyle};
use crate::marker::Marker;

/// Discrete marker layer that clusters at query time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterLayer {
    pub markers: Vec<Marker>,
    /// Merge distance in pixels.
    pub cluster_radius: f64,
    /// At or past this zoom every marker stands alone.
    pub decluster_zoom: u8,
    pub zoom_to_bounds_on_click: bool,
    pub marker_style: MarkerStyle,
}

/// A group of markers as displayed at one zoom level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    /// Mean position of the members.
    pub lat: f64,
    pub lon: f64,
    /// Number of member markers.
    pub count: usize,
    /// Sum of member intensities.
    pub total_intensity: f64,
    /// Box around the members, framed when the cluster is clicked.
    pub region: BoundingRegion,
    /// Indices into [`ClusterLayer::markers`].
    pub members: Vec<usize>,
}

impl Cluster {
    fn seed(index: usize, marker: &Marker) -> Self {
        Self {
            lat: marker.lat,
            lon: marker.lon,
            count: 1,
            total_intensity: marker.intensity,
            region: BoundingRegion::from_point(marker.lat, marker.lon),
            members: vec![index],
        }
    }

    fn absorb(&mut self, index: usize, marker: &Marker) {
        let n = self.count as f64;
        self.lat = (self.lat * n + marker.lat) / (n + 1.0);
        self.lon = (self.lon * n + marker.lon) / (n + 1.0);
        self.count += 1;
        self.total_intensity += marker.intensity;
        self.region = self
            .region
            .union(&BoundingRegion::from_point(marker.lat, marker.lon));
        self.members.push(index);
    }

    pub fn is_singleton(&self) -> bool {
        self.count == 1
    }

    /// Diagonal of the member box in kilometres.
    pub fn span_km(&self) -> f64 {
        haversine_km(
            self.region.min_lat,
            self.region.min_lon,
            self.region.max_lat,
            self.region.max_lon,
        )
    }
}

impl ClusterLayer {
    pub fn new(markers: Vec<Marker>, config: &ClusterConfig) -> Self {
        Self {
            markers,
            cluster_radius: config.max_cluster_radius,
            decluster_zoom: config.disable_clustering_at_zoom,
            zoom_to_bounds_on_click: config.zoom_to_bounds_on_click,
            marker_style: config.marker.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Whether markers are grouped at `zoom`.
    pub fn clusters_at_zoom(&self, zoom: u8) -> bool {
        zoom < self.decluster_zoom && self.cluster_radius > 0.0
    }

    /// Group markers for display at `zoom`.
    ///
    /// Markers are visited in order; each joins the nearest existing cluster
    /// whose center lies within `cluster_radius` pixels, otherwise it starts
    /// a new one. Candidate clusters are found through a grid with cells one
    /// radius wide, keyed by each cluster's current center. A marker with no
    /// screen position stands alone. At or past `decluster_zoom` each marker
    /// is its own cluster.
    pub fn clusters_at(&self, zoom: u8) -> Vec<Cluster> {
        if !self.clusters_at_zoom(zoom) {
            return self
                .markers
                .iter()
                .enumerate()
                .map(|(i, m)| Cluster::seed(i, m))
                .collect();
        }

        let zoom_f = zoom as f64;
        let cell = self.cluster_radius;
        let cell_of = |(x, y): (f64, f64)| ((x / cell).floor() as i64, (y / cell).floor() as i64);

        let mut clusters: Vec<Cluster> = Vec::new();
        // Pixel position and grid cell of each cluster's current center,
        // None for clusters kept out of the grid
        let mut centers: Vec<Option<((f64, f64), (i64, i64))>> = Vec::new();
        let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();

        for (index, marker) in self.markers.iter().enumerate() {
            let (px, py) = lat_lon_to_pixel(marker.lat, marker.lon, zoom_f);
            if !px.is_finite() || !py.is_finite() {
                trace!(index, "Marker without a screen position stays unclustered");
                clusters.push(Cluster::seed(index, marker));
                centers.push(None);
                continue;
            }
            let key = cell_of((px, py));

            let mut nearest: Option<(usize, f64)> = None;
            for gx in key.0 - 1..=key.0 + 1 {
                for gy in key.1 - 1..=key.1 + 1 {
                    let Some(candidates) = grid.get(&(gx, gy)) else {
                        continue;
                    };
                    for &c in candidates {
                        let Some(((cx, cy), _)) = centers[c] else {
                            continue;
                        };
                        let d = ((cx - px).powi(2) + (cy - py).powi(2)).sqrt();
                        if d <= self.cluster_radius && nearest.map_or(true, |(_, best)| d < best) {
                            nearest = Some((c, d));
                        }
                    }
                }
            }

            match nearest {
                Some((c, _)) => {
                    clusters[c].absorb(index, marker);
                    let center = lat_lon_to_pixel(clusters[c].lat, clusters[c].lon, zoom_f);
                    let moved_to = cell_of(center);
                    if let Some((_, filed_in)) = centers[c] {
                        // The mean can drift into a neighbouring cell
                        if filed_in != moved_to {
                            if let Some(old) = grid.get_mut(&filed_in) {
                                old.retain(|&other| other != c);
                            }
                            grid.entry(moved_to).or_default().push(c);
                        }
                    }
                    centers[c] = Some((center, moved_to));
                }
                None => {
                    grid.entry(key).or_default().push(clusters.len());
                    clusters.push(Cluster::seed(index, marker));
                    centers.push(Some(((px, py), key)));
                }
            }
        }

        trace!(
            zoom,
            markers = self.markers.len(),
            clusters = clusters.len(),
            widest_km = clusters.iter().map(Cluster::span_km).fold(0.0, f64::max),
            "Clustered markers"
        );

        clusters
    }

    /// Region to frame when `cluster` is clicked, if click-to-zoom is on.
    pub fn click_target(&self, cluster: &Cluster) -> Option<BoundingRegion> {
        self.zoom_to_bounds_on_click.then_some(cluster.region)
    }

    /// Box around every marker.
    pub fn region(&self) -> Option<BoundingRegion> {
        let mut acc = BoundsAccumulator::new();
        for marker in &self.markers {
            acc.push(marker.lat, marker.lon);
        }
        acc.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use map_common::GeoPoint;
    use projection::mercator::pixel_to_lat_lon;
    use test_utils::assert_coords_approx_eq;

    fn layer(points: &[(f64, f64)]) -> ClusterLayer {
        let markers = points
            .iter()
            .map(|&(lat, lon)| Marker::from_point(&GeoPoint::new(lat, lon)))
            .collect();
        ClusterLayer::new(markers, &ClusterConfig::default())
    }

    #[test]
    fn test_empty_layer_has_no_clusters() {
        let l = layer(&[]);
        assert!(l.clusters_at(10).is_empty());
        assert!(l.region().is_none());
    }

    #[test]
    fn test_nearby_points_merge_at_low_zoom() {
        let l = layer(&[(26.20, -81.50), (26.21, -81.51), (26.22, -81.49)]);
        let clusters = l.clusters_at(8);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].count, 3);
        assert_eq!(clusters[0].members, vec![0, 1, 2]);
    }

    #[test]
    fn test_far_points_stay_apart() {
        // Roughly 1.5 degrees apart: hundreds of pixels at zoom 8
        let l = layer(&[(26.0, -81.0), (27.5, -82.5)]);
        assert_eq!(l.clusters_at(8).len(), 2);
    }

    #[test]
    fn test_decluster_zoom() {
        let l = layer(&[(26.2, -81.5), (26.2, -81.5)]);
        assert_eq!(l.clusters_at(15).len(), 1);
        let at_threshold = l.clusters_at(16);
        assert_eq!(at_threshold.len(), 2);
        assert!(at_threshold.iter().all(Cluster::is_singleton));
    }

    #[test]
    fn test_cluster_region_and_click_target() {
        let l = layer(&[(26.20, -81.50), (26.25, -81.55)]);
        let clusters = l.clusters_at(8);
        assert_eq!(clusters.len(), 1);

        let region = l.click_target(&clusters[0]).unwrap();
        assert_eq!(region.min_lat, 26.20);
        assert_eq!(region.max_lat, 26.25);
        assert_eq!(region.min_lon, -81.55);
        assert_eq!(region.max_lon, -81.50);
    }

    #[test]
    fn test_mean_center() {
        let l = layer(&[(26.0, -81.0), (26.1, -81.1)]);
        let c = &l.clusters_at(6)[0];
        assert_coords_approx_eq!((c.lat, c.lon), (26.05, -81.05), 1e-12);
    }

    #[test]
    fn test_span_km() {
        let stacked = layer(&[(26.2, -81.5), (26.2, -81.5)]);
        assert_eq!(stacked.clusters_at(8)[0].span_km(), 0.0);

        let spread = layer(&[(26.20, -81.50), (26.25, -81.55)]);
        let span = spread.clusters_at(8)[0].span_km();
        assert!(span > 7.0 && span < 8.0, "span = {}", span);
    }

    #[test]
    fn test_center_drifting_into_next_cell_still_collects() {
        // One row of markers at zoom 8, x offsets from the 200th grid line.
        // After four markers the mean sits one cell to the right of where
        // the cluster started, within reach of the fifth.
        let row_y = lat_lon_to_pixel(26.2, -81.5, 8.0).1;
        let boundary = 200.0 * 80.0;
        let points: Vec<(f64, f64)> = [1.0, 80.5, 120.0, 146.0, 166.0]
            .iter()
            .map(|dx| pixel_to_lat_lon(boundary + dx, row_y, 8.0))
            .collect();

        let l = layer(&points);
        let clusters = l.clusters_at(8);
        assert_eq!(clusters.len(), 1, "clusters: {:?}", clusters);
        assert_eq!(clusters[0].members, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_cells_follow_a_long_chain() {
        // Each marker 79 px right of the running mean, so it always joins.
        // The mean crosses two grid lines before the last markers arrive
        // three cells from the first.
        let row_y = lat_lon_to_pixel(26.2, -81.5, 8.0).1;
        let start = 300.0 * 80.0 + 1.0;
        let mut xs = vec![start];
        for _ in 0..13 {
            let mean = xs.iter().sum::<f64>() / xs.len() as f64;
            xs.push(mean + 79.0);
        }
        assert!(xs[13] >= start + 239.0);

        let points: Vec<(f64, f64)> = xs.iter().map(|&x| pixel_to_lat_lon(x, row_y, 8.0)).collect();
        let clusters = layer(&points).clusters_at(8);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].count, 14);
    }

    #[test]
    fn test_marker_without_screen_position_stands_alone() {
        let l = layer(&[(26.20, -81.50), (f64::NAN, -81.50), (26.21, -81.51)]);
        let clusters = l.clusters_at(8);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec![0, 2]);
        assert!(clusters[1].is_singleton());
        assert_eq!(clusters[1].members, vec![1]);

        let covered: usize = clusters.iter().map(|c| c.count).sum();
        assert_eq!(covered, l.len());
    }
}
