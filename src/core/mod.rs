pub mod constants;
pub mod geo;
pub mod interval;
pub mod polygon;
pub mod projection;
pub mod resolution;
pub mod scale;
pub mod state;
pub mod viewport;
