//! # Voxel World Demo
//!
//! Builds a terrain world and logs its statistics.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

fn main() {
    voxel_world::run();
}
