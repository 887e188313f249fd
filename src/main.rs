use clap::error::ErrorKind;
use clap::{ArgGroup, CommandFactory, Parser};
use slapseg::config::{parse_num_procs, HarnessConfig, Operation};
use std::process;
use tracing::Level;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Slap segmentation conformance harness", long_about = None)]
#[command(group(
    ArgGroup::new("operation")
        .args(["identify", "supported", "segment", "orientation"])
        .multiple(false)
))]
struct Cli {
    /// Print identification information about the engine
    #[arg(short = 'i', long)]
    identify: bool,

    /// Print which kinds of images the engine supports
    #[arg(short = 'k', long = "kinds")]
    supported: bool,

    /// Run the segmentation suite
    #[arg(short = 's', long)]
    segment: bool,

    /// Run the orientation determination suite
    #[arg(short = 'd', long = "determine-orientation")]
    orientation: bool,

    /// Seed for shuffling the image set
    #[arg(short = 'r', long = "random-seed")]
    seed: Option<u64>,

    /// Number of worker processes
    #[arg(short = 'f', long = "num-procs", default_value_t = 1, value_parser = parse_num_procs)]
    num_procs: usize,

    #[command(flatten)]
    harness: HarnessConfig,

    #[arg(long, default_value_t = false)]
    debug: bool,

    #[arg(long, hide = true, conflicts_with = "operation")]
    worker: bool,
}

impl Cli {
    fn operation(&self) -> Operation {
        if self.identify {
            Operation::Identify
        } else if self.supported {
            Operation::Supported
        } else if self.segment {
            Operation::Segment
        } else if self.orientation {
            Operation::Orientation
        } else {
            Operation::Usage
        }
    }
}

fn print_usage() {
    let mut command = Cli::command();
    eprintln!("{}", command.render_usage());
    eprintln!("       (one of -i, -k, -s or -d; -r and -f apply to -s and -d)");
}

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                print_usage();
                process::exit(1);
            }
        },
    };

    init_tracing(cli.debug);

    if cli.worker {
        process::exit(cmd::worker::run());
    }

    let seed = cli.seed.unwrap_or_else(|| fastrand::u64(..));
    let code = match cli.operation() {
        Operation::Usage => {
            print_usage();
            0
        }
        Operation::Identify => cmd::report("identify", cmd::info::identify(&cli.harness)),
        Operation::Supported => cmd::report("supported", cmd::info::supported(&cli.harness)),
        op @ (Operation::Segment | Operation::Orientation) => cmd::report(
            if op == Operation::Segment {
                "segment"
            } else {
                "determine orientation"
            },
            cmd::suite::run(op, seed, cli.num_procs, cli.debug, &cli.harness),
        ),
    };
    process::exit(code);
}
