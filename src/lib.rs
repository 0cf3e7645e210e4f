pub mod config;
pub mod network;
pub mod render;
pub mod terrain;

pub use config::RenderParams;
pub use network::{
    NetworkError, Polyline, RiverForest, RiverNetwork, RiverNode, build_network,
    extract_polylines, refresh_tail_lengths, smooth_junctions,
};
pub use render::{render_map, save_polylines_json};
pub use terrain::{Point, TerrainMap, TerrainType};
