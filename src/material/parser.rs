//! MTL document parsing.

use std::io::BufRead;

use glam::Vec4;

use super::{Material, MaterialComponent, MaterialLibrary};
use crate::config::{ImportConfig, LineErrors};
use crate::error::{ImportError, LineError, Result};
use crate::wavefront::line::{parse_floats, split_keyword, strip_line};

/// Parse an MTL document from a reader.
pub fn parse_mtl<R: BufRead>(reader: R, config: &ImportConfig) -> Result<MaterialLibrary> {
    let mut parser = MtlParser::new(config);
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ImportError::unreadable(None, e))?;
        parser.parse_line(index + 1, &line)?;
    }
    parser.finish()
}

/// Parse an MTL document held in memory.
pub fn parse_mtl_str(source: &str, config: &ImportConfig) -> Result<MaterialLibrary> {
    let mut parser = MtlParser::new(config);
    for (index, line) in source.lines().enumerate() {
        parser.parse_line(index + 1, line)?;
    }
    parser.finish()
}

/// Well-formed MTL statements that carry nothing this importer stores.
const UNSUPPORTED: &[&str] = &[
    "Ni", "Ke", "Tf", "sharpness", "map_Ns", "map_d", "map_Ke", "map_bump", "map_Bump", "bump",
    "disp", "decal", "refl", "Pr", "Pm", "Ps", "Pc", "Pcr", "aniso", "anisor", "map_Pr",
    "map_Pm", "norm",
];

struct MtlParser {
    errors: LineErrors,
    current: Option<Material>,
    finished: Vec<Material>,
}

impl MtlParser {
    fn new(config: &ImportConfig) -> Self {
        Self {
            errors: LineErrors::new(config.error_policy),
            current: None,
            finished: Vec::new(),
        }
    }

    fn parse_line(&mut self, number: usize, text: &str) -> Result<()> {
        let line = strip_line(text);
        if line.is_empty() {
            return Ok(());
        }
        match self.apply(line) {
            Ok(()) => Ok(()),
            Err(e) => self.errors.handle(e.at(number, text)),
        }
    }

    fn apply(&mut self, line: &str) -> std::result::Result<(), LineError> {
        let (keyword, rest) = split_keyword(line);

        if keyword == "newmtl" {
            if rest.is_empty() {
                return Err(LineError::malformed("newmtl needs a name"));
            }
            if let Some(done) = self.current.take() {
                self.finished.push(done);
            }
            self.current = Some(Material::new(rest));
            return Ok(());
        }

        let Some(component) = component_keyword(keyword) else {
            return self.apply_scalar(keyword, rest);
        };
        let material = self.current_material(keyword)?;
        let target = component.select(material);
        if keyword.starts_with("map_") {
            if rest.is_empty() {
                return Err(LineError::malformed(format!("{} needs a file name", keyword)));
            }
            target.texture = Some(rest.to_string());
        } else {
            target.color = parse_color(rest, keyword)?;
        }
        Ok(())
    }

    fn apply_scalar(&mut self, keyword: &str, rest: &str) -> std::result::Result<(), LineError> {
        match keyword {
            "Ns" => {
                let value = parse_scalar(rest, keyword)?;
                self.current_material(keyword)?.specular_exponent = value;
            }
            "d" => {
                let value = parse_scalar(rest, keyword)?;
                self.current_material(keyword)?.dissolve = value;
            }
            "Tr" => {
                let value = parse_scalar(rest, keyword)?;
                self.current_material(keyword)?.dissolve = 1.0 - value;
            }
            "illum" => {
                let model = rest
                    .parse::<u32>()
                    .map_err(|_| LineError::malformed("illum expects a non-negative integer"))?;
                self.current_material(keyword)?.illumination = Some(model);
            }
            _ if UNSUPPORTED.contains(&keyword) => {
                tracing::trace!(keyword, "Ignoring unsupported MTL statement");
            }
            _ => return Err(LineError::Syntax),
        }
        Ok(())
    }

    fn current_material(&mut self, keyword: &str) -> std::result::Result<&mut Material, LineError> {
        self.current
            .as_mut()
            .ok_or_else(|| LineError::malformed(format!("{} before any newmtl", keyword)))
    }

    fn finish(mut self) -> Result<MaterialLibrary> {
        let skipped = self.errors.skipped();
        self.errors.finish()?;
        if let Some(done) = self.current.take() {
            self.finished.push(done);
        }

        let library: MaterialLibrary = self.finished.into_iter().collect();
        tracing::debug!(
            materials = library.len(),
            skipped_lines = skipped,
            "Parsed MTL document"
        );
        Ok(library)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Ambient,
    Diffuse,
    Specular,
}

impl Component {
    fn select(self, material: &mut Material) -> &mut MaterialComponent {
        match self {
            Component::Ambient => &mut material.ambient,
            Component::Diffuse => &mut material.diffuse,
            Component::Specular => &mut material.specular,
        }
    }
}

/// Colour and texture keywords, mapped to the component they set.
fn component_keyword(keyword: &str) -> Option<Component> {
    match keyword {
        "Ka" | "map_Ka" => Some(Component::Ambient),
        "Kd" | "map_Kd" => Some(Component::Diffuse),
        "Ks" | "map_Ks" => Some(Component::Specular),
        _ => None,
    }
}

fn parse_color(rest: &str, keyword: &str) -> std::result::Result<Vec4, LineError> {
    match parse_floats::<4>(rest, keyword)? {
        (c, 3) => Ok(Vec4::new(c[0], c[1], c[2], 1.0)),
        (c, 4) => Ok(Vec4::from_array(c)),
        (_, count) => Err(LineError::malformed(format!(
            "{} expects 3 or 4 numbers, got {}",
            keyword, count
        ))),
    }
}

fn parse_scalar(rest: &str, keyword: &str) -> std::result::Result<f32, LineError> {
    match parse_floats::<1>(rest, keyword)? {
        (v, 1) => Ok(v[0]),
        _ => Err(LineError::malformed(format!("{} expects one number", keyword))),
    }
}
