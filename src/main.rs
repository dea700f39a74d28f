use clap::Parser;
use std::path::PathBuf;

/// Convert a BMFont text descriptor to JSON
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Descriptor file to read
    input: PathBuf,

    /// JSON file to write
    output: PathBuf,

    #[command(flatten)]
    verbosity: clap_verbosity_flag::Verbosity,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.into())
        .init();

    if let Err(e) = bmfont2json::convert(&args.input, &args.output) {
        log::error!("Converting {} failed: {}", args.input.display(), e);
        std::process::exit(1);
    }
}
