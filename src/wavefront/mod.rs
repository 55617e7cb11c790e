//! Wavefront OBJ geometry import.
//!
//! Import runs in three passes. The first pass classifies each line and
//! accumulates positions, normals, texture coordinates and triangulated faces,
//! building the position-to-triangle adjacency as it goes. The second pass
//! synthesizes normals for corners without one. The third flattens everything
//! into a [`Mesh`].

mod accumulator;
mod adjacency;
mod face;
mod flatten;
pub(crate) mod line;
mod normals;

use std::io::BufRead;

use accumulator::GeometryAccumulator;
use adjacency::VertexAdjacency;
use flatten::FlattenContext;
use line::Record;

use crate::config::{ImportConfig, LineErrors};
use crate::error::{AttributeKind, ImportError, LineError, Result};
use crate::mesh::{Mesh, DEFAULT_GROUP};
use crate::types::{NameInterner, SourceLine, Triangle};

/// Parse an OBJ document from a reader.
pub fn parse_obj<R: BufRead>(reader: R, config: &ImportConfig) -> Result<Mesh> {
    let mut parser = ObjParser::new(config);
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ImportError::unreadable(None, e))?;
        parser.parse_line(index + 1, &line)?;
    }
    parser.finish()
}

/// Parse an OBJ document held in memory.
pub fn parse_obj_str(source: &str, config: &ImportConfig) -> Result<Mesh> {
    let mut parser = ObjParser::new(config);
    for (index, line) in source.lines().enumerate() {
        parser.parse_line(index + 1, line)?;
    }
    parser.finish()
}

/// State for one OBJ import.
struct ObjParser {
    synthesize_normals: bool,
    errors: LineErrors,
    geometry: GeometryAccumulator,
    triangles: Vec<Triangle>,
    adjacency: VertexAdjacency,
    /// First face record missing a texture coordinate on some corner.
    missing_texcoord: Option<SourceLine>,
    /// First face record missing a normal on some corner.
    missing_normal: Option<SourceLine>,
    groups: NameInterner,
    materials: NameInterner,
    mtllibs: Vec<String>,
    smoothing_group: i32,
    current_group: usize,
    current_material: Option<usize>,
    dropped_faces: usize,
}

impl ObjParser {
    fn new(config: &ImportConfig) -> Self {
        Self {
            synthesize_normals: config.synthesize_normals,
            errors: LineErrors::new(config.error_policy),
            geometry: GeometryAccumulator::new(),
            triangles: Vec::new(),
            adjacency: VertexAdjacency::new(),
            missing_texcoord: None,
            missing_normal: None,
            groups: NameInterner::with_first(DEFAULT_GROUP),
            materials: NameInterner::new(),
            mtllibs: Vec::new(),
            smoothing_group: 0,
            current_group: 0,
            current_material: None,
            dropped_faces: 0,
        }
    }

    /// Classify and apply one line. Errors only when the policy aborts.
    fn parse_line(&mut self, number: usize, text: &str) -> Result<()> {
        let applied = match line::classify(text) {
            Ok(Some(record)) => self.apply(record, number, text),
            Ok(None) => Ok(()),
            Err(e) => Err(e),
        };
        match applied {
            Ok(()) => Ok(()),
            Err(e) => self.errors.handle(e.at(number, text)),
        }
    }

    fn apply(&mut self, record: Record<'_>, number: usize, text: &str) -> std::result::Result<(), LineError> {
        match record {
            Record::MaterialLibrary(name) => {
                if !self.mtllibs.iter().any(|lib| lib == name) {
                    self.mtllibs.push(name.to_string());
                }
            }
            Record::UseMaterial(name) => self.current_material = Some(self.materials.intern(name)),
            Record::Smoothing(group) => self.smoothing_group = group,
            Record::Group(name) => self.current_group = self.groups.intern(name),
            Record::Position(position) => {
                self.geometry.add_position(position);
            }
            Record::Normal(normal) => {
                self.geometry.add_normal(normal);
            }
            Record::TexCoord(texcoord) => {
                self.geometry.add_texcoord(texcoord);
            }
            Record::Face(tokens) => self.add_face(&tokens, number, text)?,
        }
        Ok(())
    }

    fn add_face(&mut self, tokens: &[&str], number: usize, text: &str) -> std::result::Result<(), LineError> {
        // Resolve every corner before adding anything so a bad corner leaves no
        // partial face behind.
        let corners = face::resolve_corners(tokens, &self.geometry)?;
        if corners.len() < 3 {
            tracing::trace!(line = number, corners = corners.len(), "dropping degenerate face");
            self.dropped_faces += 1;
            return Ok(());
        }

        if self.missing_texcoord.is_none() && corners.iter().any(|c| c.texcoord.is_none()) {
            self.missing_texcoord = Some(SourceLine::new(number, text));
        }
        if self.missing_normal.is_none() && corners.iter().any(|c| c.normal.is_none()) {
            self.missing_normal = Some(SourceLine::new(number, text));
        }

        for corners in face::triangulate(&corners) {
            let triangle = Triangle {
                corners,
                smoothing_group: self.smoothing_group,
                material: self.current_material,
                group: self.current_group,
                line: number,
            };
            self.adjacency.register(self.triangles.len(), triangle.positions());
            self.triangles.push(triangle);
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Mesh> {
        let skipped = self.errors.skipped();
        self.errors.finish()?;

        tracing::debug!(
            positions = self.geometry.len(AttributeKind::Position),
            normals = self.geometry.len(AttributeKind::Normal),
            texcoords = self.geometry.len(AttributeKind::TexCoord),
            triangles = self.triangles.len(),
            dropped_faces = self.dropped_faces,
            skipped_lines = skipped,
            "Parsed OBJ document"
        );

        if self.synthesize_normals {
            let added = normals::synthesize_normals(
                &mut self.geometry,
                &mut self.triangles,
                &self.adjacency,
            );
            tracing::debug!(synthesized = added, "Synthesized normals");
        }
        // Adjacency is only needed for smoothing.
        drop(self.adjacency);

        let mesh = flatten::flatten(
            &self.geometry,
            &self.triangles,
            &FlattenContext {
                groups: &self.groups,
                materials: &self.materials,
                missing_texcoord: self.missing_texcoord.as_ref(),
                missing_normal: self.missing_normal.as_ref(),
                mtllibs: &self.mtllibs,
            },
        )?;

        tracing::debug!(
            triangles = mesh.triangle_count(),
            groups = mesh.groups.len(),
            materials = self.materials.len(),
            has_normals = mesh.has_normals(),
            has_texcoords = mesh.has_texcoords(),
            "Flattened mesh"
        );
        Ok(mesh)
    }
}
