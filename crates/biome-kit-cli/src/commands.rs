//! Command implementations for the biome-kit CLI

use anyhow::{Context, Result, bail};
use biome_kit_core::config::{CONFIG_FILE_NAMES, ConfigLoader};
use biome_kit_core::{
    Biome, ConfigFormat, KitConfig, TASKS_FILE, TaskRegistry, TaskRunner,
};
use biome_kit_typegen::TypeGenerator;
use schemars::schema_for;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Synthesize the project described by the options file
pub async fn synth_command(dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let (path, config) = ConfigLoader::load(config_path.as_deref(), dir.as_deref())?;
    let root = match dir {
        Some(dir) => dir,
        None => config_dir(&path),
    };
    debug!("Synthesizing project at {}", root.display());

    let project = config
        .to_project(&root)
        .with_context(|| format!("Invalid options in {}", path.display()))?;
    let written = project.synth()?;

    for file in &written {
        println!("✓ Wrote {}", file.display());
    }
    Ok(())
}

/// Generate TypeScript declarations from the Biome schema
pub async fn types_command(
    schema: Option<PathBuf>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    // The options file is optional here; defaults apply without one.
    let (root, types) = match config_path {
        Some(path) => {
            let config = ConfigLoader::load_from_file(&path)?;
            (config_dir(&path), config.types)
        }
        None => match ConfigLoader::auto_discover(Path::new("."))? {
            Some(path) => {
                let config = ConfigLoader::load_from_file(&path)?;
                (config_dir(&path), config.types)
            }
            None => (PathBuf::from("."), Default::default()),
        },
    };

    let schema = schema.unwrap_or_else(|| root.join(types.schema_path()));
    let output = output.unwrap_or_else(|| root.join(types.output_path()));

    TypeGenerator::new(&schema)
        .generate(&output)
        .await
        .with_context(|| format!("Failed to generate types from {}", schema.display()))?;

    println!("✓ Generated types: {}", output.display());
    Ok(())
}

/// Run a task from the synthesized task manifest
pub async fn run_command(task: String, config_path: Option<PathBuf>) -> Result<()> {
    let root = match config_path {
        Some(path) => config_dir(&path),
        None => ConfigLoader::auto_discover(Path::new("."))?
            .map(|p| config_dir(&p))
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let manifest = root.join(TASKS_FILE);
    if !manifest.exists() {
        bail!(
            "Task manifest {} not found. Run 'biome-kit synth' first.",
            manifest.display()
        );
    }
    let registry = TaskRegistry::load(&manifest)?;
    TaskRunner::new(&registry, &root).run(&task)?;

    info!("Task '{}' completed", task);
    Ok(())
}

/// Create a default options file in the current directory
pub async fn config_init_command(format: ConfigFormat, force: bool) -> Result<()> {
    debug!("Initializing options file with format: {:?}", format);

    let filename = format!("biome-kit.{}", format.extension());
    let config_path = PathBuf::from(&filename);

    if config_path.exists() && !force {
        bail!("Options file '{filename}' already exists. Use --force to overwrite.");
    }
    if !force && let Some(existing) = CONFIG_FILE_NAMES.iter().find(|n| Path::new(n).exists()) {
        bail!("Options file '{existing}' already exists. Use --force to create another one.");
    }

    let content = KitConfig::default().to_string_as(format)?;
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {filename}"))?;

    println!("✓ Created options file: {filename}");
    println!("   Edit it, then run 'biome-kit synth'.");
    Ok(())
}

/// Validate an options file, including tool conflicts
pub async fn config_validate_command(path: Option<PathBuf>) -> Result<()> {
    debug!("Validating options file: {:?}", path);

    let (path, config) = ConfigLoader::load(path.as_deref(), None)?;
    let project = config.to_project(&config_dir(&path))?;
    // Rendering runs the pre-synthesis checks without writing anything.
    project.render()?;

    let features = config.biome.resolve().features;
    println!("✓ Options are valid: {}", path.display());
    println!("   Linter enabled: {}", features.linter);
    println!("   Formatter enabled: {}", features.formatter);
    println!("   Organize imports enabled: {}", features.organize_imports);
    Ok(())
}

/// Print the options, or the generated Biome configuration
pub async fn config_show_command(resolved: bool, config_path: Option<PathBuf>) -> Result<()> {
    debug!("Showing options (resolved: {})", resolved);

    let (path, config) = ConfigLoader::load(config_path.as_deref(), None)?;

    let output = if resolved {
        let project = config.to_project(&config_dir(&path))?;
        let biome = Biome::of(&project).context("Biome is not registered")?;
        serde_json::to_string_pretty(biome.configuration())?
    } else {
        serde_json::to_string_pretty(&config)?
    };
    println!("{output}");
    Ok(())
}

/// Print or write the JSON Schema of the options file
pub async fn config_schema_command(output: Option<PathBuf>) -> Result<()> {
    info!("Generating JSON Schema for biome-kit options...");

    let mut schema = serde_json::to_value(schema_for!(KitConfig))?;
    schema["title"] = json!("biome-kit options");
    schema["description"] =
        json!("Options file schema for biome-kit - validates biome-kit.json and biome-kit.jsonc");

    let text = serde_json::to_string_pretty(&schema)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, text)?;
            println!("✓ Generated JSON Schema: {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// Directory holding an options file
fn config_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
