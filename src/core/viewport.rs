use crate::core::constants::MAX_ZOOM_LEVEL;
use crate::core::geo::{GeoCoordinate, Point};
use crate::core::interval::{Interval, Interval2D, IntervalInt};
use crate::core::polygon::Polygon;
use crate::core::projection::Projection;
use crate::core::resolution::TiledZoomLevel;
use crate::core::scale::MapScale;
use crate::core::state::ViewportState;
use crate::{Result, ViewportError};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

/// Which wrapped copy of the world a viewport part renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartPosition {
    /// The wrapped copy west of the map's west boundary
    West,
    /// The primary copy (and its clones when the map is narrower than the screen)
    Central,
    /// The wrapped copy east of the map's east boundary
    East,
}

/// A rectangular screen-space region mapped to a polygon in projected space.
///
/// The polygon lives in the canonical map domain (x in `[0, map_width]`);
/// `offset` records which world copy the part renders, as a signed multiple
/// of the map width. Parts are value-like and rebuilt on every recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportPart {
    position: PartPosition,
    offset: f64,
    screen_interval: Interval2D,
    polygon: Polygon,
    map_width: f64,
}

impl ViewportPart {
    fn new(
        position: PartPosition,
        offset: f64,
        screen_interval: Interval2D,
        polygon: Polygon,
        map_width: f64,
    ) -> Self {
        Self {
            position,
            offset,
            screen_interval,
            polygon,
            map_width,
        }
    }

    pub fn position(&self) -> PartPosition {
        self.position
    }

    /// World-copy offset in meters, a signed multiple of the map width
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// The screen-space region this part covers, in logical pixels
    pub fn screen_interval(&self) -> &Interval2D {
        &self.screen_interval
    }

    /// The part's polygon in canonical projected space
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Bounding interval of the polygon
    pub fn interval(&self) -> &Interval2D {
        self.polygon.interval()
    }

    /// Point-in-polygon test against the canonical projected polygon
    pub fn contains(&self, projected_coordinate: Point) -> bool {
        self.polygon.contains(projected_coordinate)
    }

    /// The polygon's minimal corner, used as the screen-transform origin
    pub fn inf_position(&self) -> Point {
        self.polygon.interval().inf()
    }

    /// Translates a projected coordinate into this part's reference frame.
    ///
    /// A point lying outside the part's x-range but within one world width of
    /// it is shifted by ±`map_width`; anything further away comes back
    /// unchanged.
    pub fn map_vector(&self, projected_coordinate: Point) -> Point {
        let x_interval = &self.polygon.interval().x;
        if x_interval.contains(projected_coordinate.x) {
            return projected_coordinate;
        }
        for shift in [self.map_width, -self.map_width] {
            let candidate = projected_coordinate + Point::new(shift, 0.0);
            if x_interval.contains(candidate.x) {
                return candidate;
            }
        }
        projected_coordinate
    }
}

/// Emitted once per settled transaction when observable state changed.
///
/// The GUI layer uses it to trigger a redraw; the tile-fetch layer re-reads
/// the parts to compute which tiles are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewportEvent {
    Changed {
        center: bool,
        zoom: bool,
        bearing: bool,
        resized: bool,
    },
    ProjectionChanged,
}

/// The viewport controller: owns the current and previous state, the screen
/// size, and all derived geometry (projected area, wrap topology, parts).
///
/// Mutations are transactional: each mutator either runs standalone or nests
/// inside an explicit [`Viewport::transaction`]; derived geometry is
/// recomputed once per settled transaction and one [`ViewportEvent`] is
/// queued when observable state changed.
///
/// Single-threaded by design: the transaction counter batches reentrant
/// calls from one thread and provides no cross-thread protection.
pub struct Viewport {
    state: ViewportState,
    previous_state: ViewportState,
    transaction_depth: u32,
    size_changed: bool,

    projection: Option<Arc<dyn Projection>>,

    smallest_tile_size: Option<u32>,
    zoom_level_interval: IntervalInt,
    interval_defined: bool,

    viewport_size: Point,
    device_pixel_ratio: f64,
    area_size_m: Point,

    viewport_polygon: Polygon,
    center_map_vertically: bool,
    y_screen_interval: Interval,

    west_part: Option<ViewportPart>,
    central_part: Option<ViewportPart>,
    central_part_clones: Vec<ViewportPart>,
    east_part: Option<ViewportPart>,

    cross_boundaries: bool,
    cross_west_line: bool,
    cross_east_line: bool,
    number_of_full_maps: u32,

    events: VecDeque<ViewportEvent>,
}

impl Viewport {
    /// Convenience constructor for the rectangle centered on `center`
    pub fn interval_from_center_and_size(center: Point, size: Point) -> Interval2D {
        Interval2D::from_center_and_size(center, size)
    }

    pub fn new(state: ViewportState, viewport_size: Point) -> Self {
        Self {
            previous_state: state.clone(),
            state,
            transaction_depth: 0,
            size_changed: false,
            projection: None,
            smallest_tile_size: None,
            zoom_level_interval: IntervalInt::new(0, MAX_ZOOM_LEVEL as i32),
            interval_defined: false,
            viewport_size,
            device_pixel_ratio: 1.0,
            area_size_m: Point::default(),
            viewport_polygon: Polygon::empty(),
            center_map_vertically: false,
            y_screen_interval: Interval::new(0.0, viewport_size.y),
            west_part: None,
            central_part: None,
            central_part_clones: Vec::new(),
            east_part: None,
            cross_boundaries: false,
            cross_west_line: false,
            cross_east_line: false,
            number_of_full_maps: 0,
            events: VecDeque::new(),
        }
    }

    // --- state accessors ---------------------------------------------------

    pub fn viewport_state(&self) -> &ViewportState {
        &self.state
    }

    pub fn center(&self) -> GeoCoordinate {
        self.state.coordinate()
    }

    pub fn bearing(&self) -> f64 {
        self.state.bearing()
    }

    pub fn zoom_level(&self) -> u32 {
        self.state.zoom_level()
    }

    pub fn tiled_zoom_level(&self) -> &TiledZoomLevel {
        self.state.tiled_zoom_level()
    }

    /// Tile resolution in meters per device pixel
    pub fn resolution(&self) -> f64 {
        self.tiled_zoom_level().resolution()
    }

    /// Effective resolution in meters per logical pixel
    pub fn meters_per_px(&self) -> f64 {
        self.resolution() * self.device_pixel_ratio
    }

    pub fn viewport_size(&self) -> Point {
        self.viewport_size
    }

    pub fn width(&self) -> f64 {
        self.viewport_size.x
    }

    pub fn height(&self) -> f64 {
        self.viewport_size.y
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Geographic extent currently visible, in meters
    pub fn area_size_m(&self) -> Point {
        self.area_size_m
    }

    /// The (possibly rotated) viewport rectangle in unwrapped projected space
    pub fn viewport_polygon(&self) -> &Polygon {
        &self.viewport_polygon
    }

    /// The viewport rectangle in logical screen pixels
    pub fn screen_interval(&self) -> Interval2D {
        Interval2D::new(
            Interval::new(0.0, self.viewport_size.x),
            Interval::new(0.0, self.viewport_size.y),
        )
    }

    fn screen_center_px(&self) -> Point {
        self.viewport_size / 2.0
    }

    pub fn from_px(&self, distance_px: f64) -> f64 {
        distance_px * self.meters_per_px()
    }

    pub fn to_px(&self, distance: f64) -> f64 {
        distance / self.meters_per_px()
    }

    pub fn vector_from_px(&self, distance_px: Point) -> Point {
        distance_px * self.meters_per_px()
    }

    pub fn vector_to_px(&self, distance: Point) -> Point {
        distance / self.meters_per_px()
    }

    // --- projection --------------------------------------------------------

    pub fn projection(&self) -> Option<&dyn Projection> {
        self.projection.as_deref()
    }

    fn projection_handle(&self) -> Result<Arc<dyn Projection>> {
        self.projection.clone().ok_or(ViewportError::NotConfigured)
    }

    /// Attaches or swaps the projection and rebuilds all derived geometry
    pub fn set_projection(&mut self, projection: Arc<dyn Projection>) -> Result<()> {
        self.projection = Some(projection);
        self.update_area()?;
        self.events.push_back(ViewportEvent::ProjectionChanged);
        Ok(())
    }

    // --- zoom interval -----------------------------------------------------

    pub fn zoom_level_interval(&self) -> &IntervalInt {
        &self.zoom_level_interval
    }

    pub fn is_interval_defined(&self) -> bool {
        self.interval_defined
    }

    /// Restricts the valid zoom range to the provider's interval intersected
    /// with the interval the pyramid itself supports for `smallest_tile_size`.
    pub fn set_zoom_level_interval(
        &mut self,
        interval: IntervalInt,
        smallest_tile_size: u32,
    ) -> Result<()> {
        let map_interval = self.map_zoom_level_interval(smallest_tile_size);
        let effective = interval.intersection(&map_interval);
        if effective.is_empty() {
            return Err(ViewportError::InvalidZoom(format!(
                "empty zoom interval: provider [{}, {}] x pyramid [{}, {}]",
                interval.inf, interval.sup, map_interval.inf, map_interval.sup
            )));
        }
        self.smallest_tile_size = Some(smallest_tile_size);
        self.zoom_level_interval = effective;
        self.interval_defined = true;
        // the current zoom may now lie outside the interval; settle clamps it
        self.transaction(|_| Ok(()))
    }

    /// Coarsest zoom at which the whole map is still at least one tile wide
    fn map_zoom_level_interval(&self, smallest_tile_size: u32) -> IntervalInt {
        let pyramid = *self.tiled_zoom_level().pyramid();
        let mut inf = 0;
        while inf < MAX_ZOOM_LEVEL && pyramid.map_size_px(inf) < smallest_tile_size as f64 {
            inf += 1;
        }
        IntervalInt::new(inf as i32, MAX_ZOOM_LEVEL as i32)
    }

    fn clamped_zoom(&self, zoom_level: u32) -> u32 {
        let clamped = self.zoom_level_interval.clamp(zoom_level as i32) as u32;
        if clamped != zoom_level {
            log::warn!(
                "zoom level {} clamped to {} (interval [{}, {}])",
                zoom_level,
                clamped,
                self.zoom_level_interval.inf,
                self.zoom_level_interval.sup
            );
        }
        clamped
    }

    // --- transactions ------------------------------------------------------

    /// Runs `f` inside a state transaction.
    ///
    /// Transactions nest; the recompute pass and the change event happen once,
    /// when the outermost transaction settles. The matching end is guaranteed
    /// even when `f` fails, so a failed mutation still leaves the derived
    /// geometry consistent with whatever state it reached.
    pub fn transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.begin_transaction();
        let result = f(self);
        let settled = self.end_transaction();
        match result {
            Ok(value) => settled.map(|_| value),
            Err(error) => Err(error),
        }
    }

    fn begin_transaction(&mut self) {
        if self.transaction_depth == 0 {
            self.previous_state = self.state.clone();
            self.size_changed = false;
        }
        self.transaction_depth += 1;
    }

    fn end_transaction(&mut self) -> Result<()> {
        debug_assert!(self.transaction_depth > 0, "unbalanced transaction");
        self.transaction_depth -= 1;
        if self.transaction_depth == 0 {
            self.settle()
        } else {
            Ok(())
        }
    }

    /// One full recompute pass per settled transaction
    fn settle(&mut self) -> Result<()> {
        let clamped = self.clamped_zoom(self.state.zoom_level());
        self.state.set_zoom_level(clamped);

        let resized = std::mem::take(&mut self.size_changed);
        if self.state == self.previous_state && !resized {
            return Ok(());
        }

        self.update_area()?;

        self.events.push_back(ViewportEvent::Changed {
            center: self.state.coordinate() != self.previous_state.coordinate(),
            zoom: self.state.zoom_level() != self.previous_state.zoom_level(),
            bearing: self.state.bearing() != self.previous_state.bearing(),
            resized,
        });
        Ok(())
    }

    // --- change notification ----------------------------------------------

    pub fn has_pending_event(&self) -> bool {
        !self.events.is_empty()
    }

    /// Pops the oldest queued change event
    pub fn poll_event(&mut self) -> Option<ViewportEvent> {
        self.events.pop_front()
    }

    // --- mutators ----------------------------------------------------------

    pub fn set_center(&mut self, coordinate: GeoCoordinate) -> Result<()> {
        self.transaction(|v| v.set_center_inner(coordinate))
    }

    fn set_center_inner(&mut self, coordinate: GeoCoordinate) -> Result<()> {
        let coordinate = coordinate.normalized();
        if !coordinate.is_valid() {
            return Err(ViewportError::InvalidCoordinates(format!(
                "({}, {})",
                coordinate.longitude, coordinate.latitude
            )));
        }
        self.state.set_coordinate(coordinate);
        Ok(())
    }

    pub fn set_bearing(&mut self, bearing: f64) -> Result<()> {
        self.transaction(|v| v.state.set_bearing(bearing))
    }

    /// Sets the zoom level; values outside the configured interval are
    /// clamped to the nearest bound so gestures never abort mid-interaction.
    pub fn set_zoom_level(&mut self, zoom_level: u32) -> Result<()> {
        self.transaction(|v| {
            let zoom_level = v.clamped_zoom(zoom_level);
            v.state.set_zoom_level(zoom_level);
            Ok(())
        })
    }

    pub fn set_viewport_size(&mut self, size: Point, device_pixel_ratio: f64) -> Result<()> {
        if size.x < 0.0 || size.y < 0.0 || !size.is_finite() {
            return Err(ViewportError::InvalidCoordinates(format!(
                "viewport size ({}, {})",
                size.x, size.y
            )));
        }
        if device_pixel_ratio <= 0.0 || !device_pixel_ratio.is_finite() {
            return Err(ViewportError::InvalidCoordinates(format!(
                "device pixel ratio {device_pixel_ratio}"
            )));
        }
        self.transaction(|v| {
            if size != v.viewport_size || device_pixel_ratio != v.device_pixel_ratio {
                v.viewport_size = size;
                v.device_pixel_ratio = device_pixel_ratio;
                v.size_changed = true;
            }
            Ok(())
        })
    }

    /// Translates the view by a screen-pixel delta; dragging content to the
    /// east moves the center to the west. Longitude wrap falls out of the
    /// projected-x wrap and the recompute pass.
    pub fn pan(&mut self, translation_px: Point) -> Result<()> {
        self.transaction(|v| {
            let projection = v.projection_handle()?;
            let center = projection.to_projected(v.state.coordinate());
            let delta = (translation_px * v.meters_per_px()).rotated_deg(-v.state.bearing());
            let mut new_center = center - delta;
            new_center.x = new_center.x.rem_euclid(projection.map_width());
            v.state.set_coordinate(projection.from_projected(new_center));
            Ok(())
        })
    }

    /// Zooms toward an explicit target: the coordinate becomes the new center
    pub fn zoom_at(&mut self, coordinate: GeoCoordinate, zoom_level: u32) -> Result<()> {
        self.transaction(|v| {
            let zoom_level = v.clamped_zoom(zoom_level);
            v.state.set_zoom_level(zoom_level);
            v.set_center_inner(coordinate)
        })
    }

    /// Zoom under cursor: the geographic point under `position_px` stays at
    /// `position_px` across the zoom change, exact to one pixel.
    pub fn stable_zoom(&mut self, position_px: Point, zoom_level: u32) -> Result<()> {
        self.transaction(|v| {
            let projection = v.projection_handle()?;
            let zoom_level = v.clamped_zoom(zoom_level);
            if zoom_level == v.state.zoom_level() {
                return Ok(());
            }

            let offset_px = position_px - v.screen_center_px();
            let bearing = v.state.bearing();
            let center = projection.to_projected(v.state.coordinate());
            let anchor = center + (offset_px * v.meters_per_px()).rotated_deg(-bearing);

            v.state.set_zoom_level(zoom_level);

            let mut new_center = anchor - (offset_px * v.meters_per_px()).rotated_deg(-bearing);
            new_center.x = new_center.x.rem_euclid(projection.map_width());
            v.state.set_coordinate(projection.from_projected(new_center));
            Ok(())
        })
    }

    // --- coordinate transforms ---------------------------------------------

    pub fn projected_center_coordinate(&self) -> Result<Point> {
        let projection = self.projection_handle()?;
        Ok(projection.to_projected(self.state.coordinate()))
    }

    pub fn to_projected_coordinate(&self, coordinate: GeoCoordinate) -> Result<Point> {
        let projection = self.projection_handle()?;
        Ok(projection.to_projected(coordinate))
    }

    pub fn from_projected_coordinate(&self, projected_coordinate: Point) -> Result<GeoCoordinate> {
        let projection = self.projection_handle()?;
        Ok(projection.from_projected(projected_coordinate))
    }

    /// Inverts the screen transform; the result lives in the canonical map
    /// domain whichever wrapped copy the pixel was over.
    pub fn screen_to_projected_coordinate(
        &self,
        screen_position: Point,
        clip_to_viewport: bool,
    ) -> Result<Point> {
        let projection = self.projection_handle()?;
        let screen_position = if clip_to_viewport {
            self.screen_interval().clamp(screen_position)
        } else {
            screen_position
        };
        let offset_px = screen_position - self.screen_center_px();
        let center = projection.to_projected(self.state.coordinate());
        let mut projected =
            center + (offset_px * self.meters_per_px()).rotated_deg(-self.state.bearing());
        projected.x = projected.x.rem_euclid(projection.map_width());
        Ok(projected)
    }

    pub fn screen_to_coordinate(
        &self,
        screen_position: Point,
        clip_to_viewport: bool,
    ) -> Result<GeoCoordinate> {
        let projection = self.projection_handle()?;
        let projected = self.screen_to_projected_coordinate(screen_position, clip_to_viewport)?;
        Ok(projection.from_projected(projected))
    }

    /// Maps a canonical projected coordinate to screen pixels, resolving the
    /// wrap against the nearest world copy.
    pub fn projected_to_screen(
        &self,
        projected_coordinate: Point,
        clip_to_viewport: bool,
    ) -> Result<Point> {
        let projection = self.projection_handle()?;
        let map_width = projection.map_width();
        let center = projection.to_projected(self.state.coordinate());

        let mut delta = projected_coordinate - center;
        if delta.x > map_width / 2.0 {
            delta.x -= map_width;
        } else if delta.x < -map_width / 2.0 {
            delta.x += map_width;
        }

        let screen = self.screen_center_px()
            + delta.rotated_deg(self.state.bearing()) / self.meters_per_px();
        Ok(if clip_to_viewport {
            self.screen_interval().clamp(screen)
        } else {
            screen
        })
    }

    pub fn coordinate_to_screen(
        &self,
        coordinate: GeoCoordinate,
        clip_to_viewport: bool,
    ) -> Result<Point> {
        let projection = self.projection_handle()?;
        self.projected_to_screen(projection.to_projected(coordinate), clip_to_viewport)
    }

    // --- wrap topology and parts -------------------------------------------

    pub fn cross_boundaries(&self) -> bool {
        self.cross_boundaries
    }

    pub fn cross_west_line(&self) -> bool {
        self.cross_west_line
    }

    pub fn cross_east_line(&self) -> bool {
        self.cross_east_line
    }

    /// How many full world copies tile across the viewport width, in addition
    /// to the primary copy (truncated, see DESIGN notes)
    pub fn number_of_full_maps(&self) -> u32 {
        self.number_of_full_maps
    }

    /// True when the rendered map is shorter than the viewport and gets
    /// centered vertically
    pub fn center_map_vertically(&self) -> bool {
        self.center_map_vertically
    }

    /// The vertical screen band the map occupies, in logical pixels
    pub fn y_screen_interval(&self) -> &Interval {
        &self.y_screen_interval
    }

    pub fn central_part(&self) -> Option<&ViewportPart> {
        self.central_part.as_ref()
    }

    pub fn west_part(&self) -> Option<&ViewportPart> {
        self.west_part.as_ref()
    }

    pub fn east_part(&self) -> Option<&ViewportPart> {
        self.east_part.as_ref()
    }

    pub fn central_part_clones(&self) -> &[ViewportPart] {
        &self.central_part_clones
    }

    /// All parts in ascending world-copy order
    pub fn parts(&self) -> Vec<&ViewportPart> {
        let mut parts: Vec<&ViewportPart> = Vec::new();
        parts.extend(self.west_part.as_ref());
        parts.extend(self.central_part.as_ref());
        parts.extend(self.central_part_clones.iter());
        parts.extend(self.east_part.as_ref());
        parts.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        parts
    }

    /// Locates the part whose polygon contains the point. The central part
    /// takes priority over its clones; clones are tested in ascending offset
    /// order.
    pub fn find_part(&self, projected_coordinate: Point) -> Option<&ViewportPart> {
        if let Some(part) = &self.central_part {
            if part.contains(projected_coordinate) {
                return Some(part);
            }
        }
        for clone in &self.central_part_clones {
            if clone.contains(projected_coordinate) {
                return Some(clone);
            }
        }
        if let Some(part) = &self.west_part {
            if part.contains(projected_coordinate) {
                return Some(part);
            }
        }
        if let Some(part) = &self.east_part {
            if part.contains(projected_coordinate) {
                return Some(part);
            }
        }
        None
    }

    /// Scale-bar length for the current resolution
    pub fn make_scale(&self, max_length_px: u32) -> Result<MapScale> {
        MapScale::from_resolution(self.meters_per_px(), max_length_px)
    }

    // --- recompute pass ----------------------------------------------------

    /// Full derived-geometry rebuild: projected center, area size, wrap
    /// topology, and the part decomposition. O(1) geometry work, safe to run
    /// on every frame.
    fn update_area(&mut self) -> Result<()> {
        let projection = self.projection_handle()?;
        let map_width = projection.map_width();

        self.area_size_m = self.viewport_size * self.meters_per_px();
        self.adjust_center(projection.as_ref());

        let center = projection.to_projected(self.state.coordinate());
        let rect = Interval2D::from_center_and_size(center, self.area_size_m);
        let bearing = self.state.bearing();
        self.viewport_polygon = if bearing == 0.0 {
            Polygon::from_interval(&rect)
        } else {
            Polygon::from_interval(&rect).rotated_about(center, bearing)
        };

        let bounds = *self.viewport_polygon.interval();
        self.cross_west_line = bounds.x.inf < 0.0;
        self.cross_east_line = bounds.x.sup > map_width;
        let covers_world = self.area_size_m.x >= map_width;
        self.cross_boundaries = covers_world || self.cross_west_line || self.cross_east_line;
        self.number_of_full_maps = if self.cross_boundaries {
            (self.area_size_m.x / map_width) as u32
        } else {
            0
        };

        self.update_y_screen_interval(projection.as_ref());
        self.build_parts(projection.as_ref(), center, &bounds);

        log::trace!(
            "viewport recompute: center {:?} zoom {} bearing {} cross [{} {} {}] full maps {}",
            self.state.coordinate(),
            self.state.zoom_level(),
            bearing,
            self.cross_west_line,
            self.cross_boundaries,
            self.cross_east_line,
            self.number_of_full_maps
        );
        Ok(())
    }

    /// Vertical centering policy: a map shorter than the viewport is pinned
    /// to the equator band; otherwise the center is clamped so the viewport
    /// never overruns the top or bottom map edge.
    fn adjust_center(&mut self, projection: &dyn Projection) {
        let map_height = projection.map_height();
        let area_height = self.area_size_m.y;
        self.center_map_vertically = map_height < area_height;

        let mut center = projection.to_projected(self.state.coordinate());
        let adjusted_y = if self.center_map_vertically {
            map_height / 2.0
        } else {
            center
                .y
                .clamp(area_height / 2.0, map_height - area_height / 2.0)
        };
        if adjusted_y != center.y {
            center.y = adjusted_y;
            self.state
                .set_coordinate(projection.from_projected(center));
        }
    }

    fn update_y_screen_interval(&mut self, projection: &dyn Projection) {
        if self.center_map_vertically {
            let map_height_px = projection.map_height() / self.meters_per_px();
            self.y_screen_interval =
                Interval::from_center_and_length(self.viewport_size.y / 2.0, map_height_px);
        } else {
            self.y_screen_interval = Interval::new(0.0, self.viewport_size.y);
        }
    }

    /// Decomposes the viewport polygon into per-world-copy parts: clip each
    /// world strip, translate back into the canonical domain, and record the
    /// screen region the strip occupies.
    fn build_parts(&mut self, projection: &dyn Projection, center: Point, bounds: &Interval2D) {
        let map_width = projection.map_width();
        let y_domain = projection.y_interval();

        self.west_part = None;
        self.central_part = None;
        self.east_part = None;
        self.central_part_clones.clear();

        let first_copy = (bounds.x.inf / map_width).floor() as i64;
        let last_copy = (bounds.x.sup / map_width).ceil() as i64 - 1;

        for copy in first_copy..=last_copy.max(first_copy) {
            let strip = Interval::new(copy as f64 * map_width, (copy + 1) as f64 * map_width);
            let clipped = self.viewport_polygon.clip_x(&strip).clip_y(&y_domain);
            if clipped.is_empty() {
                continue;
            }
            let offset = copy as f64 * map_width;
            let polygon = clipped.translated(Point::new(-offset, 0.0));
            let screen_interval = self.part_screen_interval(&polygon, offset, center);

            let full_strip = bounds.x.inf <= strip.inf && strip.sup <= bounds.x.sup;
            let position = if copy == 0 {
                PartPosition::Central
            } else if full_strip {
                PartPosition::Central
            } else if copy < 0 {
                PartPosition::West
            } else {
                PartPosition::East
            };
            let part = ViewportPart::new(position, offset, screen_interval, polygon, map_width);

            if copy == 0 {
                self.central_part = Some(part);
            } else if full_strip {
                self.central_part_clones.push(part);
            } else if copy < 0 {
                self.west_part = Some(part);
            } else {
                self.east_part = Some(part);
            }
        }
    }

    /// Screen-space bounding interval of a canonical part polygon, restored
    /// to its world copy before projecting through the screen transform
    fn part_screen_interval(&self, polygon: &Polygon, offset: f64, center: Point) -> Interval2D {
        let bearing = self.state.bearing();
        let meters_per_px = self.meters_per_px();
        let screen_center = self.screen_center_px();

        let mut interval = Interval2D::empty();
        for vertex in polygon.points() {
            let unwrapped = Point::new(vertex.x + offset, vertex.y);
            let screen = screen_center + (unwrapped - center).rotated_deg(bearing) / meters_per_px;
            interval.extend(screen);
        }
        interval
    }
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport")
            .field("state", &self.state)
            .field("viewport_size", &self.viewport_size)
            .field("area_size_m", &self.area_size_m)
            .field("cross_boundaries", &self.cross_boundaries)
            .field("number_of_full_maps", &self.number_of_full_maps)
            .finish_non_exhaustive()
    }
}
