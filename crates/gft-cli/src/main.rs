use std::process::ExitCode;

use gft_io::convert_files;
use gft_model::ConversionSummary;

fn usage() {
    eprintln!("usage: gft2vtk coordfile ienfile dispfile strfile outfile");
}

fn print_summary(summary: &ConversionSummary) {
    println!("nodes: {}", summary.num_nodes);
    println!("elements: {}", summary.num_elements);
    println!("time_step: {}", summary.time_step);
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 6 {
        usage();
        return ExitCode::from(2);
    }

    let summary = match convert_files(&args[1], &args[2], &args[3], &args[4], &args[5]) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("gft2vtk: {err}");
            return ExitCode::from(1);
        }
    };
    print_summary(&summary);
    ExitCode::SUCCESS
}
