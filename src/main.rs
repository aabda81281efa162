//! report – writes the demo sales report or a label sheet to a PDF.
//!
//! Usage:
//!   report <output.pdf> [--landscape] [--title "My Report"]
//!   report <output.pdf> --labels <FORMAT> <input.txt> [--border]
//!
//! Label input files hold one label per block of lines; blocks are
//! separated by blank lines.

use std::{env, fs, path::Path, path::PathBuf, process};

use pdf_report::{samples, DocumentConfig, Orientation};

struct LabelArgs {
    format: String,
    input: PathBuf,
    border: bool,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut output_path: Option<PathBuf> = None;
    let mut landscape = false;
    let mut title: Option<String> = None;
    let mut label_format: Option<String> = None;
    let mut label_input: Option<PathBuf> = None;
    let mut border = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--landscape" | "-l" => landscape = true,
            "--border" | "-b" => border = true,
            "--title" | "-t" => match iter.next() {
                Some(v) => title = Some(v.clone()),
                None => fail(&args[0], "--title needs a value"),
            },
            "--labels" => match (iter.next(), iter.next()) {
                (Some(format), Some(input)) => {
                    label_format = Some(format.clone());
                    label_input = Some(PathBuf::from(input));
                }
                _ => fail(&args[0], "--labels needs a format and an input file"),
            },
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => fail(&args[0], &format!("unknown flag: {other}")),
            path => {
                if output_path.is_some() {
                    fail(&args[0], &format!("unexpected argument: {path}"));
                }
                output_path = Some(PathBuf::from(path));
            }
        }
    }

    let Some(output) = output_path else {
        fail(&args[0], "no output file specified");
    };

    let labels = match (label_format, label_input) {
        (Some(format), Some(input)) => Some(LabelArgs {
            format,
            input,
            border,
        }),
        _ => None,
    };

    let result = match labels {
        Some(labels) => write_labels(&labels),
        None => write_report(title, landscape),
    };
    let (bytes, pages) = match result {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error generating PDF: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = write_output(&output, &bytes) {
        eprintln!("Error writing '{}': {e}", output.display());
        process::exit(1);
    }
    eprintln!(
        "Wrote '{}' ({} bytes, {} page{})",
        output.display(),
        bytes.len(),
        pages,
        if pages == 1 { "" } else { "s" }
    );
}

fn write_report(title: Option<String>, landscape: bool) -> pdf_report::Result<(Vec<u8>, usize)> {
    let defaults = DocumentConfig::default();
    let config = DocumentConfig {
        title: title.unwrap_or(defaults.title.clone()),
        orientation: if landscape {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        },
        ..defaults
    };
    let mut doc = samples::sales_report(config)?;
    let bytes = doc.output()?;
    Ok((bytes, doc.page_count()))
}

fn write_labels(args: &LabelArgs) -> pdf_report::Result<(Vec<u8>, usize)> {
    let text = fs::read_to_string(&args.input)?;
    let mut labels = samples::label_sheet(&args.format, &text, args.border)?;
    let bytes = labels.output()?;
    Ok((bytes, labels.document().page_count()))
}

fn write_output(output: &Path, bytes: &[u8]) -> std::io::Result<()> {
    // Create output directory if necessary.
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output, bytes)
}

fn fail(prog: &str, message: &str) -> ! {
    eprintln!("Error: {message}");
    print_usage(prog);
    process::exit(1);
}

fn print_usage(prog: &str) {
    eprintln!("report – PDF report and label sheet writer (pdf-report)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <output.pdf> [--landscape] [--title \"My Report\"]");
    eprintln!("  {prog} <output.pdf> --labels <FORMAT> <input.txt> [--border]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <output.pdf>   Output path");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --title, -t    Document title in PDF metadata (default: Report)");
    eprintln!("  --landscape    Use landscape page orientation");
    eprintln!("  --labels       Print one label per blank-line separated block of <input.txt>");
    eprintln!("                 using a built-in format (5160-5164, 8600, L7163, 3422)");
    eprintln!("  --border       Draw a dashed border around every label");
    eprintln!("  --help         Print this message");
}
