use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;

//===========================================================================//

/// Packs the PNG files of a directory into a single ICO file.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Directory to take the PNG files from
    #[arg(value_name = "PNG_input_file_directory")]
    input_dir: PathBuf,
    /// ICO file to create
    #[arg(value_name = "ICO_output_file")]
    output: PathBuf,
}

//===========================================================================//

fn main() -> ExitCode {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(error) => {
            match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = error.print();
                }
                // A wrong argument count is not an error; just explain.
                _ => println!("{}\n", Cli::command().render_usage()),
            }
            return ExitCode::SUCCESS;
        }
    };

    // Accepted and skipped files are logged to stdout at INFO and WARN.
    tracing_subscriber::fmt::init();

    match icopack::pack_directory(&args.input_dir, &args.output) {
        Ok(Some(summary)) => {
            println!(
                "\n{} PNG files from {} have been packed into\n\
                 the ICO file {},\n\
                 having a total size of {} bytes.\n",
                summary.num_images,
                args.input_dir.display(),
                args.output.display(),
                summary.total_size
            );
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!(
                "No PNG files in {} could be packed; {} was not written.",
                args.input_dir.display(),
                args.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("icopack: {}", error);
            ExitCode::FAILURE
        }
    }
}

//===========================================================================//
