use clap::{Args, Parser as ClapParser, Subcommand};
use paramtree::cli::{self, CliError, MultipartOptions, QueryOptions};
use paramtree::{ParseOptions, boundary_from_content_type};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "paramtree")]
#[command(about = "Rebuild nested request parameters from query strings and multipart bodies")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query string
    Query {
        /// The query string (reads from stdin if not provided)
        query: Option<String>,

        /// The whole input is form-encoded once more; decode it before parsing
        #[arg(short, long)]
        urlencoded: bool,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Parse a multipart/form-data body
    Multipart {
        /// Boundary token of the body
        #[arg(short, long, conflicts_with = "content_type", required_unless_present = "content_type")]
        boundary: Option<String>,

        /// Full Content-Type header to take the boundary from
        #[arg(long)]
        content_type: Option<String>,

        /// File holding the body (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Store uploaded files in this directory
        #[arg(long)]
        upload_dir: Option<PathBuf>,

        /// Read size in bytes
        #[arg(long, default_value_t = paramtree::options::DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Maximum key path segments, counting the leading name
    #[arg(long, default_value_t = paramtree::options::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Pretty-print the output
    #[arg(short, long)]
    pretty: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Query {
            query,
            urlencoded,
            common,
        } => run_query(query, urlencoded, &common),
        Commands::Multipart {
            boundary,
            content_type,
            input,
            upload_dir,
            chunk_size,
            common,
        } => run_multipart(boundary, content_type, input, upload_dir, chunk_size, &common),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn run_query(query: Option<String>, urlencoded: bool, common: &CommonArgs) -> Result<(), CliError> {
    let query = match query {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Some(buffer)
        }
        None => None,
    };

    let options = QueryOptions {
        query,
        urlencoded,
        parse: ParseOptions::default().with_max_depth(common.max_depth),
    };

    print_json(&cli::execute_query(&options)?, common.pretty)
}

fn run_multipart(
    boundary: Option<String>,
    content_type: Option<String>,
    input: Option<PathBuf>,
    upload_dir: Option<PathBuf>,
    chunk_size: usize,
    common: &CommonArgs,
) -> Result<(), CliError> {
    let boundary = match (boundary, content_type) {
        (Some(boundary), _) => boundary,
        (None, Some(content_type)) => boundary_from_content_type(&content_type)?,
        (None, None) => return Err(CliError::NoInput),
    };

    let options = MultipartOptions {
        boundary,
        upload_dir,
        parse: ParseOptions::default()
            .with_max_depth(common.max_depth)
            .with_chunk_size(chunk_size),
    };

    let output = match input {
        Some(path) => cli::execute_multipart(BufReader::new(File::open(path)?), &options)?,
        None if !atty::is(atty::Stream::Stdin) => cli::execute_multipart(io::stdin().lock(), &options)?,
        None => return Err(CliError::NoInput),
    };

    print_json(&output, common.pretty)
}

fn print_json(output: &serde_json::Value, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(output)
    } else {
        serde_json::to_string(output)
    }
    .map_err(|e| CliError::Io(e.into()))?;
    println!("{}", json);
    Ok(())
}
