use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use sitepack::{
    ArchivePackager, ConflictPolicy, ExtractConfig, PackConfig, SitePackError, SiteWorkspace,
};

#[derive(Parser, Debug)]
#[command(name = "sitepack")]
#[command(version)]
#[command(about = "Package a generated site folder into a zip bundle, or expand one", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bundle a file or directory into a zip archive
    Pack {
        /// File or directory to package
        source: PathBuf,
        /// Output archive path (default: <source>_package.zip next to it)
        output: Option<PathBuf>,
        /// Store entries under a top-level folder named after the source
        #[arg(long)]
        include_root: bool,
        /// Deflate level 0-9
        #[arg(long, value_name = "N")]
        level: Option<i64>,
        /// Keep already-compressed formats (png, jpg, …) uncompressed
        #[arg(long)]
        store_precompressed: bool,
    },
    /// Expand an archive into a destination directory
    Unpack {
        /// Archive to expand
        archive: PathBuf,
        /// Destination directory (created if absent)
        dest: PathBuf,
        /// Never overwrite existing files
        #[arg(short = 'n', long)]
        no_clobber: bool,
        /// Abort on the first collision with an existing file
        #[arg(long, conflicts_with = "no_clobber")]
        fail_on_conflict: bool,
    },
    /// List the entries of an archive
    List {
        archive: PathBuf,
        /// Print as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Expand an archive into a scratch workspace and re-pack it normalized
    Repack {
        archive: PathBuf,
        /// Output archive path (default: <archive>_repacked.zip next to it)
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), SitePackError> {
    let packager = ArchivePackager::new();

    match cli.command {
        Command::Pack {
            source,
            output,
            include_root,
            level,
            store_precompressed,
        } => {
            let output = output.unwrap_or_else(|| ArchivePackager::default_bundle_name(&source));
            let config = PackConfig {
                include_root_dir: include_root,
                compression_level: level,
                store_precompressed,
            };
            let report = packager.create(&source, &output, &config)?;
            println!(
                "Packed {} -> {} ({} entries, {} bytes)",
                source.display(),
                report.archive_path,
                report.entry_count,
                report.total_bytes
            );
        }
        Command::Unpack {
            archive,
            dest,
            no_clobber,
            fail_on_conflict,
        } => {
            let conflict_policy = if fail_on_conflict {
                ConflictPolicy::ErrorOnConflict
            } else if no_clobber {
                ConflictPolicy::SkipExisting
            } else {
                ConflictPolicy::Overwrite
            };
            let report = packager.extract(&archive, &dest, &ExtractConfig { conflict_policy })?;
            println!(
                "Extracted {} -> {} ({} written, {} skipped)",
                archive.display(),
                report.destination,
                report.written,
                report.skipped
            );
        }
        Command::List { archive, json } => {
            let entries = packager.list(&archive)?;
            if json {
                let rendered = serde_json::to_string_pretty(&entries).map_err(|e| {
                    SitePackError::Archive(format!("Failed to render entry list: {}", e))
                })?;
                println!("{}", rendered);
            } else {
                for entry in &entries {
                    println!("{:>10}  {}", entry.size, entry.name);
                }
                println!("{:>10}  {} entries", "", entries.len());
            }
        }
        Command::Repack { archive, output } => {
            let label = archive
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("bundle")
                .to_string();
            let output = output.unwrap_or_else(|| default_repack_name(&archive));

            let workspace = SiteWorkspace::new(&label)?;
            packager.extract(&archive, workspace.uploads_path(), &ExtractConfig::default())?;
            let report =
                packager.create(workspace.uploads_path(), &output, &PackConfig::default())?;
            println!(
                "Repacked {} -> {} ({} entries)",
                archive.display(),
                report.archive_path,
                report.entry_count
            );
        }
    }

    Ok(())
}

/// `bundle.zip` -> `bundle_repacked.zip`, kept next to the original
fn default_repack_name(archive: &Path) -> PathBuf {
    let parent = archive.parent();
    let stem = archive
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("bundle");

    let new_name = format!("{}_repacked.zip", stem);

    match parent {
        Some(p) => p.join(new_name),
        None => PathBuf::from(new_name),
    }
}
