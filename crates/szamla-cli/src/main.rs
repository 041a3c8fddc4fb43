mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use szamla_core::model::Layout;

#[derive(Parser)]
#[command(
    name = "szamla",
    version,
    about = "Extract vendor invoice PDFs (Multialarm, Volvo, Vodafone) into spreadsheets"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an invoice PDF into rows without writing a spreadsheet
    Parse {
        /// Invoice layout: multialarm, volvo or vodafone
        #[arg(value_parser = parse_layout)]
        layout: Layout,

        /// Path to the invoice PDF
        pdf_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write parsed output to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Parse an invoice PDF and write it as an .xlsx workbook
    Export {
        /// Invoice layout: multialarm, volvo or vodafone
        #[arg(value_parser = parse_layout)]
        layout: Layout,

        /// Path to the invoice PDF
        pdf_file: PathBuf,

        /// Phonebook (JSON or .xlsx) used to resolve Vodafone subscribers
        #[arg(long, value_name = "FILE")]
        phone_book: Option<PathBuf>,

        /// TESZOR / VAT / ledger mapping (JSON or .xlsx) for Vodafone charges
        #[arg(long, value_name = "FILE")]
        teszor_map: Option<PathBuf>,

        /// Directory the workbook is written to
        #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },
    /// List supported invoice layouts
    Layouts,
}

fn parse_layout(s: &str) -> Result<Layout, String> {
    s.parse::<Layout>().map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error: failed to install logger: {e}");
    }

    let result = match cli.command {
        Commands::Parse {
            layout,
            pdf_file,
            output,
            out,
        } => commands::parse::run(layout, pdf_file, &output, out),
        Commands::Export {
            layout,
            pdf_file,
            phone_book,
            teszor_map,
            out_dir,
        } => commands::export::run(layout, pdf_file, phone_book, teszor_map, out_dir),
        Commands::Layouts => commands::layouts::list(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
