use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use wuic::ast::Outline;
use wuic::consts::TEMPLATE_EXTENSION;
use wuic::{registry_for, Compiler, Config, Mode, Resource};

#[derive(Parser)]
#[command(name = "wuic")]
#[command(about = "Web UI template compiler")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    options: Options,

    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Settings overriding the `WUIC_*` environment
#[derive(Args)]
struct Options {
    /// Directory templates are resolved against
    #[arg(long, value_name = "DIR", global = true)]
    source_root: Option<PathBuf>,

    /// Directory generated sources are written to
    #[arg(short, long, value_name = "DIR", global = true)]
    output: Option<PathBuf>,

    /// Package prefix of generated classes (empty for none)
    #[arg(long, value_name = "PACKAGE", global = true)]
    package: Option<String>,

    /// Request character encoding forced by generated code
    #[arg(long, global = true)]
    charset: Option<String>,

    /// development or production
    #[arg(long, global = true)]
    mode: Option<Mode>,

    /// Directory with *.taglib.xml descriptors (repeatable)
    #[arg(long = "taglib", value_name = "DIR", global = true)]
    taglib_dirs: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile templates given by their path relative to the source root
    Compile {
        #[arg(value_name = "RESOURCE", required = true)]
        resources: Vec<String>,
    },

    /// Compile every template below the source root
    Build {
        /// Skip templates whose generated source is up to date
        #[arg(long)]
        changed: bool,
    },

    /// Print the generated source of a template without writing it
    Dump {
        #[arg(value_name = "RESOURCE")]
        resource: String,

        /// Print the node outline instead of the source
        #[arg(long)]
        outline: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = configure(cli.options)?;
    let registry = registry_for(&config)?;
    let compiler = Compiler::new(&registry, &config);

    match &cli.command {
        Commands::Compile { resources } => {
            for resource in resources {
                let path = compiler
                    .compile(resource)
                    .with_context(|| format!("failed to compile {}", resource))?;
                println!("{}", path.display());
            }
        }
        Commands::Build { changed } => build(&compiler, *changed)?,
        Commands::Dump { resource, outline } => dump(&compiler, resource, *outline)?,
    }

    Ok(())
}

fn configure(options: Options) -> Result<Config> {
    let mut config = Config::from_env().context("invalid WUIC_* environment")?;
    if let Some(source_root) = options.source_root {
        config.source_root = source_root;
    }
    if let Some(output) = options.output {
        config.destination_root = output;
    }
    if let Some(package) = options.package {
        config.package_prefix = package;
    }
    if let Some(charset) = options.charset {
        config.charset = Some(charset);
    }
    if let Some(mode) = options.mode {
        config.mode = mode;
    }
    config.taglib_dirs.extend(options.taglib_dirs);
    config.validate()?;
    Ok(config)
}

/// Template ids below `root`, in path order
fn templates(root: &Path) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("cannot walk {}", root.display()))?;
        let is_template = entry.file_type().is_file()
            && entry.path().extension().is_some_and(|e| e == TEMPLATE_EXTENSION);
        if !is_template {
            continue;
        }
        let relative = entry.path().strip_prefix(root)?;
        let id: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        ids.push(id.join("/"));
    }
    Ok(ids)
}

fn build(compiler: &Compiler<'_>, changed_only: bool) -> Result<()> {
    let root = compiler.config().source_root.clone();
    let mut compiled = 0;
    for id in templates(&root)? {
        if changed_only {
            let Some(mut resource) = Resource::locate(&id, compiler.config())? else {
                continue;
            };
            if compiler.refresh(&mut resource)?.is_some() {
                compiled += 1;
            }
        } else {
            compiler
                .compile(&id)
                .with_context(|| format!("failed to compile {}", id))?;
            compiled += 1;
        }
    }
    log::info!("{} template(s) compiled", compiled);
    Ok(())
}

fn dump(compiler: &Compiler<'_>, resource: &str, outline: bool) -> Result<()> {
    let path = compiler.config().source_root.join(resource);
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let tc = compiler.translate(resource, &source)?;
    if outline {
        print!("{}", Outline::render(tc.ast(), tc.class_node()));
    } else {
        print!("{}", tc.render());
    }
    Ok(())
}
