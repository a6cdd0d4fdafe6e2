//! Check dataset conversions before running them
//!
//! ```text
//! check_conversion -d /data/raw.n5,volumes/labels,label,labels -o /data/out.n5
//! ```
//!
//! Prints one line per dataset and exits non-zero if any check failed.

use clap::Parser;
use dsconv::{
    parse_dataset_descriptor, validate_batch, BatchItem, ContainerFormat, ConversionSpec,
    FilesystemBackend,
};
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "Validate N5/Zarr dataset conversions before running them")]
struct Cli {
    /// Dataset to convert (format: container,dataset[,kind][,output_group])
    #[arg(short = 'd', long = "dataset", required = true)]
    datasets: Vec<String>,

    /// Container the converted datasets are written to
    #[arg(short = 'o', long)]
    output_container: String,

    /// Allow writing into output groups that already exist
    #[arg(long)]
    overwrite: bool,

    /// Container layout (n5 or zarr); inferred from each location when omitted
    #[arg(long)]
    format: Option<ContainerFormat>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let backend = match cli.format {
        Some(format) => FilesystemBackend::with_format(format),
        None => FilesystemBackend::new(),
    };

    let mut items = Vec::with_capacity(cli.datasets.len());
    for descriptor in &cli.datasets {
        let item = parse_dataset_descriptor(descriptor).and_then(|parsed| {
            let spec = ConversionSpec::from_descriptor(&parsed, cli.output_container.as_str())?;
            Ok(BatchItem {
                spec,
                declared_kind: parsed.kind,
            })
        });

        match item {
            Ok(item) => items.push(item),
            Err(err) => {
                eprintln!("{descriptor}: {err} ({})", err.remediation());
                return ExitCode::from(2);
            }
        }
    }

    let report = validate_batch(&backend, &items, cli.overwrite);
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(kind) => println!("{}: ok ({kind})", outcome.spec),
            Err(err) => println!("{}: {err} ({})", outcome.spec, err.remediation()),
        }
    }

    if report.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
