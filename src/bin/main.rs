//! Wavefront Importer CLI
//!
//! Inspect, dump and re-export Wavefront OBJ/MTL files.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use wavefront_importer::{
    export_obj, load_material_library, load_materials_for, load_mesh, ErrorPolicy, ImportConfig,
    ImportError, Mesh,
};

#[derive(Parser)]
#[command(name = "wavefront-importer")]
#[command(author, version, about = "Import Wavefront OBJ/MTL files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print counts, groups, materials and material libraries of an OBJ file
    Inspect {
        /// Input OBJ file
        input: PathBuf,

        /// Also load the referenced material libraries (resolved next to the input)
        #[arg(long)]
        materials: bool,

        #[command(flatten)]
        import: ImportArgs,
    },

    /// Print the imported mesh as JSON
    Dump {
        /// Input OBJ file
        input: PathBuf,

        /// Write JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        import: ImportArgs,
    },

    /// Print an MTL material library as JSON
    Materials {
        /// Input MTL file
        input: PathBuf,

        /// Error handling policy
        #[arg(long, value_enum, default_value = "strict")]
        policy: Policy,
    },

    /// Re-export an OBJ file as triangulated soup
    Convert {
        /// Input OBJ file
        input: PathBuf,

        /// Output OBJ file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        import: ImportArgs,
    },
}

#[derive(Args)]
struct ImportArgs {
    /// Error handling policy
    #[arg(long, value_enum, default_value = "strict")]
    policy: Policy,

    /// Leave normals absent instead of synthesizing them
    #[arg(long)]
    no_normals: bool,
}

impl ImportArgs {
    fn config(&self) -> ImportConfig {
        ImportConfig::default()
            .with_error_policy(self.policy.into())
            .with_normal_synthesis(!self.no_normals)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Stop at the first bad line
    Strict,
    /// Report every bad line at the end
    Collect,
    /// Drop bad lines and keep going
    Skip,
}

impl From<Policy> for ErrorPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Strict => ErrorPolicy::Strict,
            Policy::Collect => ErrorPolicy::Collect,
            Policy::Skip => ErrorPolicy::Skip,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect {
            input,
            materials,
            import,
        } => {
            inspect(&input, materials, &import.config())?;
        }
        Commands::Dump {
            input,
            output,
            import,
        } => {
            let mesh = load_reporting(&import.config(), |config| load_mesh(&input, config))?;
            let json = serde_json::to_string_pretty(&mesh)?;
            write_or_print(output.as_deref(), &json)?;
        }
        Commands::Materials { input, policy } => {
            let config = ImportConfig::default().with_error_policy(policy.into());
            let library =
                load_reporting(&config, |config| load_material_library(&input, config))?;
            println!("{}", serde_json::to_string_pretty(&library)?);
        }
        Commands::Convert {
            input,
            output,
            import,
        } => {
            convert(&input, &output, &import.config())?;
        }
    }

    Ok(())
}

fn inspect(
    input: &Path,
    with_materials: bool,
    config: &ImportConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading {:?}...", input);
    let mesh = load_reporting(config, |config| load_mesh(input, config))?;
    print_summary(&mesh);

    if with_materials && !mesh.mtllibs.is_empty() {
        let dir = input.parent().unwrap_or_else(|| Path::new("."));
        let library = load_materials_for(&mesh, dir, config)?;
        println!("\nMaterials defined: {}", library.len());
        for material in library.iter() {
            println!(
                "  {} (Kd {:?}, Ns {})",
                material.name,
                material.diffuse.color.to_array(),
                material.specular_exponent
            );
            for texture in material.textures() {
                println!("    texture: {}", texture);
            }
        }
        for name in mesh.material_names() {
            if name != wavefront_importer::NO_MATERIAL && !library.contains(name) {
                println!("  Warning: material {:?} is used but not defined", name);
            }
        }
    }

    Ok(())
}

fn print_summary(mesh: &Mesh) {
    println!("\nMesh Info:");
    println!("  Triangles: {}", mesh.triangle_count());
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Normals: {}", mesh.has_normals());
    println!("  Texture coordinates: {}", mesh.has_texcoords());
    println!("  Material libraries: {:?}", mesh.mtllibs);
    println!("  Groups: {}", mesh.groups.len());
    for (group, buckets) in &mesh.groups {
        let label = if group.is_empty() { "(default)" } else { group.as_str() };
        println!("    {}", label);
        for bucket in buckets {
            println!(
                "      {}: {} triangles",
                bucket.material,
                bucket.triangle_count()
            );
        }
    }
}

fn convert(
    input: &Path,
    output: &Path,
    config: &ImportConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading {:?}...", input);
    let mesh = load_reporting(config, |config| load_mesh(input, config))?;
    println!(
        "  Imported {} triangles in {} groups",
        mesh.triangle_count(),
        mesh.groups.len()
    );

    let name = output
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("mesh");
    let obj = export_obj(&mesh, name)?;
    fs::write(output, &obj)?;
    println!("Exported OBJ ({} bytes) to {:?}", obj.len(), output);

    Ok(())
}

/// Run `load`, printing every line the skip policy drops to stderr.
fn load_reporting<T>(
    config: &ImportConfig,
    load: impl Fn(&ImportConfig) -> wavefront_importer::Result<T>,
) -> wavefront_importer::Result<T> {
    let (value, skipped) = load_collecting_skipped(config, load)?;
    if !skipped.is_empty() {
        eprintln!("Skipped {} bad lines:", skipped.len());
        for error in &skipped {
            eprintln!("  {}", error);
        }
    }
    Ok(value)
}

/// Under [`ErrorPolicy::Skip`], find the lines that will be dropped by
/// collecting first, then import leniently.
fn load_collecting_skipped<T>(
    config: &ImportConfig,
    load: impl Fn(&ImportConfig) -> wavefront_importer::Result<T>,
) -> wavefront_importer::Result<(T, Vec<ImportError>)> {
    if config.error_policy != ErrorPolicy::Skip {
        return load(config).map(|value| (value, Vec::new()));
    }
    let collect = config.clone().with_error_policy(ErrorPolicy::Collect);
    match load(&collect) {
        Ok(value) => Ok((value, Vec::new())),
        Err(ImportError::Multiple(skipped)) => Ok((load(config)?, skipped)),
        Err(e) => Err(e),
    }
}

fn write_or_print(output: Option<&Path>, contents: &str) -> std::io::Result<()> {
    match output {
        Some(path) => fs::write(path, contents),
        None => {
            println!("{}", contents);
            Ok(())
        }
    }
}
