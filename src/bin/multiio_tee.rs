use std::error::Error;

use multiio::cli::{OutputArgs, TeeArgs};
use multiio::{InputSpec, StdinInput};
use sarge::prelude::*;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  multiio_tee [-a] [-p] [--adaptive] [-c <config>] -o <token> [-o <token> ...]");
    eprintln!();
    eprintln!("Copies stdin to stdout and to every output.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -a, --append       Append to files instead of truncating");
    eprintln!("  -p, --parallel     Start in parallel fan-out");
    eprintln!("      --adaptive     Switch modes from observed write latency");
    eprintln!("  -c, --config       Tuning file (.json, .yaml, .toml)");
    eprintln!();
    eprintln!("Output tokens:");
    eprintln!("  - | stdout         Write to stdout (always included)");
    eprintln!("  stderr             Write to stderr");
    eprintln!("  @<path>            Force treating value as a file path");
}

fn flag(value: Option<Result<bool, impl Error>>) -> bool {
    matches!(value, Some(Ok(true)))
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut reader = ArgumentReader::new();

    let output_ref = reader.add::<OutputArgs>(tag::both('o', "output"));
    let append_ref = reader.add::<bool>(tag::both('a', "append"));
    let parallel_ref = reader.add::<bool>(tag::both('p', "parallel"));
    let adaptive_ref = reader.add::<bool>(tag::long("adaptive"));
    let config_ref = reader.add::<String>(tag::both('c', "config"));

    let args = reader.parse()?;

    let mut outputs = match output_ref.get(&args) {
        Some(Ok(v)) => v,
        Some(Err(never)) => match never {},
        None => OutputArgs::default(),
    };
    if !outputs.is_stdout() {
        outputs = outputs.with_output("-");
    }

    let tee = TeeArgs {
        outputs,
        append: flag(append_ref.get(&args)),
        parallel: flag(parallel_ref.get(&args)),
        adaptive: flag(adaptive_ref.get(&args)),
        config: config_ref.get(&args).and_then(Result::ok),
    };

    let multi = tee.builder()?.build();
    for spec in tee.output_specs() {
        multi.add_output_spec(&spec)?;
    }
    multi.set_input_spec(&InputSpec::new("-", Arc::new(StdinInput::new())))?;

    let copied = multi.copy()?;
    multi.flush()?;
    info!(bytes = copied, mode = %multi.mode(), "tee finished");
    multi.close()?;

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("multiio_tee error: {e}");
        print_usage();
        std::process::exit(1);
    }
}
