//! Integration tests for the viewport engine: the geometric properties a
//! renderer relies on under continuous pan/zoom interaction.

use cartoview::constants::{EQUATORIAL_PERIMETER, TILE_SIZE};
use cartoview::{
    GeoCoordinate, IntervalInt, Point, TilePyramid, TiledZoomLevel, Viewport, ViewportState,
    WebMercator,
};
use std::sync::Arc;

const VIEWPORT_SIZE: Point = Point { x: 800.0, y: 600.0 };

fn make_viewport(center: GeoCoordinate, zoom: u32, bearing: f64) -> Viewport {
    let _ = env_logger::builder().is_test(true).try_init();
    let pyramid = TilePyramid::new(EQUATORIAL_PERIMETER, TILE_SIZE);
    let state = ViewportState::new(center, TiledZoomLevel::new(pyramid, zoom), bearing).unwrap();
    let mut viewport = Viewport::new(state, VIEWPORT_SIZE);
    viewport.set_projection(Arc::new(WebMercator)).unwrap();
    while viewport.poll_event().is_some() {}
    viewport
}

#[test]
fn resolution_halves_with_each_zoom_level() {
    let pyramid = TilePyramid::new(EQUATORIAL_PERIMETER, TILE_SIZE);
    for zoom in 0..=20 {
        let coarse = TiledZoomLevel::new(pyramid, zoom).resolution();
        let fine = TiledZoomLevel::new(pyramid, zoom + 1).resolution();
        assert!(
            (coarse - 2.0 * fine).abs() < 1e-9,
            "zoom {zoom}: {coarse} vs {fine}"
        );
    }
}

#[test]
fn screen_round_trip_inside_central_part() {
    let viewport = make_viewport(GeoCoordinate::new(2.3522, 48.8566), 6, 0.0);

    for &(x, y) in &[
        (400.0, 300.0),
        (10.0, 10.0),
        (790.0, 590.0),
        (123.4, 456.7),
        (0.5, 299.5),
    ] {
        let screen = Point::new(x, y);
        let coordinate = viewport.screen_to_coordinate(screen, false).unwrap();
        let back = viewport.coordinate_to_screen(coordinate, false).unwrap();
        assert!(
            back.distance_to(&screen) < 1e-6,
            "({x}, {y}) came back as ({}, {})",
            back.x,
            back.y
        );
    }
}

#[test]
fn screen_round_trip_with_bearing() {
    let viewport = make_viewport(GeoCoordinate::new(-30.0, 10.0), 7, 37.5);

    for &(x, y) in &[(400.0, 300.0), (50.0, 550.0), (700.0, 100.0)] {
        let screen = Point::new(x, y);
        let projected = viewport.screen_to_projected_coordinate(screen, false).unwrap();
        let back = viewport.projected_to_screen(projected, false).unwrap();
        assert!(back.distance_to(&screen) < 1e-6);
    }
}

#[test]
fn stable_zoom_keeps_anchor_fixed() {
    let mut viewport = make_viewport(GeoCoordinate::new(11.576, 48.137), 5, 0.0);
    let anchor = Point::new(250.0, 120.0);

    let geo_before = viewport.screen_to_coordinate(anchor, false).unwrap();
    viewport.stable_zoom(anchor, 9).unwrap();
    let screen_after = viewport.coordinate_to_screen(geo_before, false).unwrap();
    assert!(
        screen_after.distance_to(&anchor) < 1.0,
        "anchor drifted to ({}, {})",
        screen_after.x,
        screen_after.y
    );

    // zooming back out through the same anchor keeps the point fixed too
    viewport.stable_zoom(anchor, 3).unwrap();
    let screen_out = viewport.coordinate_to_screen(geo_before, false).unwrap();
    assert!(screen_out.distance_to(&anchor) < 1.0);
}

#[test]
fn stable_zoom_is_exact_under_bearing() {
    let mut viewport = make_viewport(GeoCoordinate::new(-74.006, 40.713), 8, -60.0);
    let anchor = Point::new(620.0, 450.0);

    let geo_before = viewport.screen_to_coordinate(anchor, false).unwrap();
    viewport.stable_zoom(anchor, 11).unwrap();
    let screen_after = viewport.coordinate_to_screen(geo_before, false).unwrap();
    assert!(screen_after.distance_to(&anchor) < 1.0);
}

#[test]
fn panning_a_full_map_width_wraps_back() {
    let mut viewport = make_viewport(GeoCoordinate::new(20.0, 30.0), 5, 0.0);
    let start = viewport.center();

    // one world copy is tile_size * 2^zoom logical pixels wide
    let map_width_px = (TILE_SIZE as f64) * 32.0;
    viewport.pan(Point::new(map_width_px, 0.0)).unwrap();
    let wrapped = viewport.center();
    assert!((wrapped.longitude - start.longitude).abs() < 1e-6);
    assert!((wrapped.latitude - start.latitude).abs() < 1e-6);

    viewport.pan(Point::new(-map_width_px, 0.0)).unwrap();
    let back = viewport.center();
    assert!((back.longitude - start.longitude).abs() < 1e-6);
}

#[test]
fn wrap_flags_are_exclusive_until_the_world_repeats() {
    // near the antimeridian only one boundary line is crossed
    let east = make_viewport(GeoCoordinate::new(179.0, 0.0), 4, 0.0);
    assert!(east.cross_east_line() && !east.cross_west_line());
    assert!(east.cross_boundaries());

    let west = make_viewport(GeoCoordinate::new(-179.0, 0.0), 4, 0.0);
    assert!(west.cross_west_line() && !west.cross_east_line());

    // when the visible width covers the whole world both lines are crossed
    let world = make_viewport(GeoCoordinate::new(0.0, 0.0), 0, 0.0);
    assert!(world.cross_west_line() && world.cross_east_line());
    assert!(world.cross_boundaries());
}

#[test]
fn parts_partition_the_viewport_width() {
    // two parts across the antimeridian
    assert_partition(&make_viewport(GeoCoordinate::new(179.0, 0.0), 3, 0.0));
    // five parts at world zoom: west, two clones, central, east
    assert_partition(&make_viewport(GeoCoordinate::new(0.0, 0.0), 0, 0.0));
    // single central part
    assert_partition(&make_viewport(GeoCoordinate::new(10.0, 45.0), 8, 0.0));
}

fn assert_partition(viewport: &Viewport) {
    let mut parts = viewport.parts();
    assert!(!parts.is_empty());
    parts.sort_by(|a, b| {
        a.screen_interval()
            .x
            .inf
            .total_cmp(&b.screen_interval().x.inf)
    });

    let first = parts.first().unwrap().screen_interval().x;
    let last = parts.last().unwrap().screen_interval().x;
    assert!(first.inf.abs() < 1e-6, "west gap: {}", first.inf);
    assert!(
        (last.sup - viewport.width()).abs() < 1e-6,
        "east gap: {}",
        last.sup
    );

    for pair in parts.windows(2) {
        let gap = pair[1].screen_interval().x.inf - pair[0].screen_interval().x.sup;
        assert!(gap.abs() < 1e-6, "gap/overlap of {gap} px between parts");
    }
}

#[test]
fn worked_example_zoom_two() {
    let pyramid = TilePyramid::new(40_075_016.0, 256);
    let state = ViewportState::new(
        GeoCoordinate::new(0.0, 0.0),
        TiledZoomLevel::new(pyramid, 2),
        0.0,
    )
    .unwrap();
    let mut viewport = Viewport::new(state, VIEWPORT_SIZE);
    viewport.set_projection(Arc::new(WebMercator)).unwrap();

    assert!((viewport.resolution() - 39_135.8).abs() < 0.1);

    let screen = viewport
        .coordinate_to_screen(viewport.center(), false)
        .unwrap();
    assert!((screen.x - 400.0).abs() < 1e-6);
    assert!((screen.y - 300.0).abs() < 1e-6);
}

#[test]
fn world_zoom_produces_clones() {
    // at zoom 0 the map is 256 px wide; an 800 px viewport sees it three times
    let viewport = make_viewport(GeoCoordinate::new(0.0, 0.0), 0, 0.0);
    assert!(viewport.area_size_m().x >= EQUATORIAL_PERIMETER);
    assert!(viewport.cross_boundaries());
    assert!(!viewport.central_part_clones().is_empty());
    assert_eq!(viewport.number_of_full_maps(), 3);
}

#[test]
fn zoom_interval_clamps_gestures_instead_of_failing() {
    let mut viewport = make_viewport(GeoCoordinate::new(0.0, 0.0), 5, 0.0);
    viewport
        .set_zoom_level_interval(IntervalInt::new(2, 10), TILE_SIZE)
        .unwrap();

    viewport.stable_zoom(Point::new(400.0, 300.0), 15).unwrap();
    assert_eq!(viewport.zoom_level(), 10);

    viewport
        .zoom_at(GeoCoordinate::new(5.0, 5.0), 0)
        .unwrap();
    assert_eq!(viewport.zoom_level(), 2);
    assert!((viewport.center().longitude - 5.0).abs() < 1e-9);
}

#[test]
fn zoom_at_recenters_on_target() {
    let mut viewport = make_viewport(GeoCoordinate::new(0.0, 0.0), 4, 0.0);
    let target = GeoCoordinate::new(-3.7038, 40.4168);
    viewport.zoom_at(target, 9).unwrap();

    assert_eq!(viewport.zoom_level(), 9);
    let screen = viewport.coordinate_to_screen(target, false).unwrap();
    assert!((screen.x - 400.0).abs() < 1e-6);
    assert!((screen.y - 300.0).abs() < 1e-6);
}

#[test]
fn clipping_clamps_into_the_viewport_rectangle() {
    let viewport = make_viewport(GeoCoordinate::new(0.0, 0.0), 6, 0.0);

    let clipped = viewport
        .screen_to_coordinate(Point::new(-50.0, 700.0), true)
        .unwrap();
    let screen = viewport.coordinate_to_screen(clipped, false).unwrap();
    assert!(screen.x >= -1e-6 && screen.x <= viewport.width() + 1e-6);
    assert!(screen.y >= -1e-6 && screen.y <= viewport.height() + 1e-6);

    let far = GeoCoordinate::new(120.0, 0.0);
    let clamped = viewport.coordinate_to_screen(far, true).unwrap();
    assert!(viewport.screen_interval().contains(clamped));
}
