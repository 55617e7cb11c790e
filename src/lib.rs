//! # Wavefront Importer
//!
//! A Rust library for importing Wavefront OBJ geometry and MTL material
//! libraries into render-ready triangle soup.
//!
//! ## Overview
//!
//! OBJ documents are parsed line by line into shared attribute pools.
//! Polygons are fan-triangulated, missing normals are synthesized with
//! angle-weighted smoothing per smoothing group, and the result is flattened
//! into a [`Mesh`] whose triangles are bucketed by geometry group and
//! material.
//!
//! ## Quick Start
//!
//! ```ignore
//! use wavefront_importer::{load_mesh, load_materials_for, ImportConfig};
//!
//! let config = ImportConfig::default();
//! let mesh = load_mesh("models/ship.obj", &config)?;
//! let materials = load_materials_for(&mesh, "models", &config)?;
//!
//! for (group, buckets) in &mesh.groups {
//!     for bucket in buckets {
//!         let material = materials.get(&bucket.material);
//!         let indices = bucket.vertex_indices();
//!         // upload mesh.positions_bytes() and draw `indices` with `material`
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod material;
pub mod mesh;
pub mod types;
pub mod wavefront;

// Re-export main types for convenience
pub use config::{ErrorPolicy, ImportConfig};
pub use error::{AttributeKind, ImportError, Result};
pub use export::obj::export_obj;
pub use material::{parse_mtl, parse_mtl_str, Material, MaterialComponent, MaterialLibrary};
pub use mesh::{MaterialGroup, Mesh, DEFAULT_GROUP, NO_MATERIAL};
pub use wavefront::{parse_obj, parse_obj_str};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load an OBJ file.
pub fn load_mesh<P: AsRef<Path>>(path: P, config: &ImportConfig) -> Result<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ImportError::unreadable(Some(path.to_path_buf()), e))?;
    parse_obj(BufReader::new(file), config).map_err(|e| with_path(e, path))
}

/// Parse OBJ text held in memory.
pub fn load_mesh_from_str(source: &str, config: &ImportConfig) -> Result<Mesh> {
    parse_obj_str(source, config)
}

/// Load an MTL file.
pub fn load_material_library<P: AsRef<Path>>(
    path: P,
    config: &ImportConfig,
) -> Result<MaterialLibrary> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ImportError::unreadable(Some(path.to_path_buf()), e))?;
    parse_mtl(BufReader::new(file), config).map_err(|e| with_path(e, path))
}

/// Parse MTL text held in memory.
pub fn load_material_library_from_str(
    source: &str,
    config: &ImportConfig,
) -> Result<MaterialLibrary> {
    parse_mtl_str(source, config)
}

/// Load every library the mesh references, resolved against `dir`.
///
/// Libraries are merged in `mtllib` order; later libraries win on duplicate
/// material names.
pub fn load_materials_for<P: AsRef<Path>>(
    mesh: &Mesh,
    dir: P,
    config: &ImportConfig,
) -> Result<MaterialLibrary> {
    let dir = dir.as_ref();
    let mut library = MaterialLibrary::new();
    for name in &mesh.mtllibs {
        library.merge(load_material_library(dir.join(name), config)?);
    }
    tracing::debug!(
        libraries = mesh.mtllibs.len(),
        materials = library.len(),
        "Loaded material libraries"
    );
    Ok(library)
}

/// Attach the file path to read failures raised while streaming.
fn with_path(error: ImportError, path: &Path) -> ImportError {
    match error {
        ImportError::UnreadableSource { path: None, source } => {
            ImportError::unreadable(Some(path.to_path_buf()), source)
        }
        other => other,
    }
}
