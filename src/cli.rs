use clap::{Parser, ValueEnum};
use stashnfo_common::RecordKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stashnfo")]
#[command(author, version, about = "Convert Stash scene, performer and gallery metadata to NFO files")]
pub struct Cli {
    /// Stash JSON export to convert
    pub input: Option<PathBuf>,

    /// NFO file to write (default: input with .nfo extension, or KIND-ID.nfo for remote records)
    pub output: Option<PathBuf>,

    /// NFO file to write; the only way to name the output of --stash-id or --search
    #[arg(short = 'o', long = "output", value_name = "PATH", conflicts_with = "output")]
    pub output_file: Option<PathBuf>,

    /// Record type; auto detects it from the input fields
    #[arg(short = 't', long = "type", value_enum, default_value_t = KindArg::Auto)]
    pub kind: KindArg,

    /// Indent the generated XML
    #[arg(long)]
    pub pretty: bool,

    /// Write embedded base64 images next to the NFO file
    #[arg(long)]
    pub extract_images: bool,

    /// Replace an existing NFO file
    #[arg(long)]
    pub overwrite: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Fetch the record with this numeric id from the Stash server
    #[arg(long, value_name = "ID")]
    pub stash_id: Option<u64>,

    /// Search the Stash server and convert the first match
    #[arg(long, value_name = "QUERY")]
    pub search: Option<String>,

    /// Stash API key (overrides the config file)
    #[arg(long, env = "STASH_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

impl Cli {
    /// Output path from `-o` or the second positional.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output_file.clone().or_else(|| self.output.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Auto,
    Scene,
    Performer,
    Gallery,
}

impl KindArg {
    pub fn kind(self) -> Option<RecordKind> {
        match self {
            KindArg::Auto => None,
            KindArg::Scene => Some(RecordKind::Scene),
            KindArg::Performer => Some(RecordKind::Performer),
            KindArg::Gallery => Some(RecordKind::Gallery),
        }
    }
}
