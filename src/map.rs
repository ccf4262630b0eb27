//! Map fragment rendering.
//!
//! Produces a self-contained HTML fragment showing an OpenStreetMap view
//! centered on a coordinate pair with a single marker, via the Leaflet
//! assets on unpkg. The fragment is embeddable as-is inside the HTML
//! report body; it performs no lookups and needs no server-side state.

/// Default zoom level for the embedded map.
const MAP_ZOOM: u8 = 13;

/// Render a self-contained map fragment for the given coordinates.
pub fn render_map(latitude: f64, longitude: f64) -> String {
    format!(
        r#"<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<div id="evidence-map" style="width: 100%; height: 480px;"></div>
<script>
    var map = L.map('evidence-map').setView([{lat}, {lon}], {zoom});
    L.tileLayer('https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
        maxZoom: 19,
        attribution: '&copy; OpenStreetMap contributors'
    }}).addTo(map);
    L.marker([{lat}, {lon}]).addTo(map);
</script>"#,
        lat = latitude,
        lon = longitude,
        zoom = MAP_ZOOM
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_contains_coordinates_and_marker() {
        let html = render_map(37.4, -122.1);
        assert!(html.contains("[37.4, -122.1]"));
        assert!(html.contains("L.marker"));
        assert!(html.contains("evidence-map"));
    }

    #[test]
    fn test_fragment_is_deterministic() {
        assert_eq!(render_map(51.5, -0.1), render_map(51.5, -0.1));
    }
}
