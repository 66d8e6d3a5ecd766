//! tex2canvas CLI - Convert LaTeX homework to Canvas HTML and publish it

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use tex2canvas::canvas::{
    extract_body_if_full_html, format_due_at, parse_due_date, AssignmentRequest, CanvasClient,
    CanvasConfig, SUBMISSION_TYPES,
};
#[cfg(feature = "cli")]
use tex2canvas::utils::error::{CliDiagnostic, PublishError, PublishResult};
#[cfg(feature = "cli")]
use tex2canvas::{HtmlConverter, HtmlOptions};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "tex2canvas")]
#[command(version)]
#[command(about = "Convert LaTeX homework into Canvas-ready HTML", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input .tex files (reads from stdin if not provided)
    inputs: Vec<PathBuf>,

    /// Output directory (defaults to alongside each input)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Emit only the body fragment, without the standalone page shell
    #[arg(long)]
    body_only: bool,

    /// Base URL of the equation rendering service
    #[arg(long)]
    equation_url: Option<String>,

    /// Suppress conversion warnings
    #[arg(short, long)]
    quiet: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Convert .tex files to Canvas HTML (default action)
    Convert {
        /// Input .tex files
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Emit only the body fragment
        #[arg(long)]
        body_only: bool,

        /// Base URL of the equation rendering service
        #[arg(long)]
        equation_url: Option<String>,

        /// Suppress conversion warnings
        #[arg(short, long)]
        quiet: bool,
    },

    /// Create or update-and-publish a Canvas assignment
    Publish {
        /// Path to the private config JSON
        #[arg(long, default_value = ".canvas_config.json")]
        config: PathBuf,

        /// Update this existing assignment instead of creating a new one
        #[arg(long)]
        assignment_id: Option<String>,

        /// Assignment title (required when creating)
        #[arg(long)]
        title: Option<String>,

        /// HTML description string
        #[arg(long)]
        description: Option<String>,

        /// HTML file for the assignment description
        #[arg(long)]
        html_file: Option<PathBuf>,

        /// Points possible
        #[arg(long)]
        points: Option<f64>,

        /// Canvas submission type
        #[arg(long, default_value = "on_paper")]
        submission_type: String,

        /// Due date, ISO-8601 or natural language ("next friday at 5pm")
        #[arg(long)]
        due_at: Option<String>,

        /// Unlock date/time in ISO-8601
        #[arg(long)]
        unlock_at: Option<String>,

        /// Lock date/time in ISO-8601
        #[arg(long)]
        lock_at: Option<String>,

        /// Show the request payload without calling Canvas
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the supported LaTeX subset and submission types
    Info,
}

#[cfg(feature = "cli")]
fn print_diagnostic(diag: &CliDiagnostic) {
    eprintln!("{}{}\x1b[0m", diag.color_code(), diag);
}

#[cfg(feature = "cli")]
fn html_options(body_only: bool, equation_url: Option<&str>) -> HtmlOptions {
    let mut options = if body_only {
        HtmlOptions::body_only()
    } else {
        HtmlOptions::new()
    };
    if let Some(url) = equation_url {
        options.equation_base_url = url.to_string();
    }
    options
}

#[cfg(feature = "cli")]
fn convert_stdin(options: HtmlOptions, quiet: bool) -> io::Result<()> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let mut converter = HtmlConverter::with_options(options);
    let result = converter.convert_document_with_diagnostics(&input);
    if !quiet {
        for warning in &result.warnings {
            print_diagnostic(&CliDiagnostic::from(warning.clone()));
        }
    }
    io::stdout().write_all(result.html.as_bytes())?;
    Ok(())
}

#[cfg(feature = "cli")]
fn output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let file = input.with_extension("html");
    match out_dir {
        Some(dir) => dir.join(file.file_name().unwrap_or(file.as_os_str())),
        None => file,
    }
}

#[cfg(feature = "cli")]
fn convert_files(
    inputs: &[PathBuf],
    out_dir: Option<&Path>,
    options: HtmlOptions,
    quiet: bool,
) -> io::Result<()> {
    if inputs.is_empty() {
        return convert_stdin(options, quiet);
    }

    if let Some(dir) = out_dir {
        fs::create_dir_all(dir)?;
    }

    let mut converter = HtmlConverter::with_options(options);
    for input in inputs {
        let text = fs::read_to_string(input)?;
        let result = converter.convert_document_with_diagnostics(&text);

        if !quiet {
            for warning in &result.warnings {
                eprint!("{}: ", input.display());
                print_diagnostic(&CliDiagnostic::from(warning.clone()));
            }
        }

        let out = output_path(input, out_dir);
        fs::write(&out, &result.html)?;
        eprintln!("Wrote {}", out.display());
    }
    Ok(())
}

#[cfg(feature = "cli")]
#[allow(clippy::too_many_arguments)]
fn publish(
    config: &Path,
    assignment_id: Option<&str>,
    title: Option<&str>,
    description: Option<&str>,
    html_file: Option<&Path>,
    points: Option<f64>,
    submission_type: &str,
    due_at: Option<&str>,
    unlock_at: Option<&str>,
    lock_at: Option<&str>,
    dry_run: bool,
) -> PublishResult<()> {
    let config = CanvasConfig::load(config)?;
    let course = config.course()?;

    if description.is_some() && html_file.is_some() {
        return Err(PublishError::invalid(
            "use either --description or --html-file, not both",
        ));
    }

    let mut request = AssignmentRequest::new(submission_type)?;
    request.title = title.map(str::to_string);
    request.description = match (description, html_file) {
        (Some(text), _) => Some(text.to_string()),
        (None, Some(path)) => {
            let html = fs::read_to_string(path)?;
            Some(extract_body_if_full_html(&html))
        }
        (None, None) => None,
    };
    request.points = points;
    request.due_at = match due_at {
        Some(raw) => parse_due_date(raw, chrono::Local::now())?
            .map(|due| format_due_at(&due)),
        None => None,
    };
    request.unlock_at = unlock_at.map(str::to_string);
    request.lock_at = lock_at.map(str::to_string);

    let client = CanvasClient::new(course, config.access_token.trim()).dry_run(dry_run);
    let outcome = match assignment_id {
        Some(id) => {
            let outcome = client.update_assignment(id, &request)?;
            println!("Updated and published assignment.");
            outcome
        }
        None => {
            let outcome = client.create_assignment(&request)?;
            println!("Created and published assignment.");
            outcome
        }
    };

    if let Some(id) = outcome.id {
        println!("Assignment ID: {}", id);
    }
    println!("Published: {}", outcome.published);
    if let Some(url) = outcome.html_url {
        println!("URL: {}", url);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn print_info() {
    println!("tex2canvas {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Supported LaTeX subset:");
    println!("  math: $...$, $$...$$, \\[...\\], eqnarray (one image per row)");
    println!("  structure: section/subsection/subsubsection, itemize, enumerate");
    println!("  markup: \\emph, \\textbf, {{\\bf ...}}, \\\\ line breaks");
    println!("  images: \\includegraphics with alt=... or a preceding % alt: comment");
    println!();
    println!("Submission types: {}", SUBMISSION_TYPES.join(", "));
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            inputs,
            out_dir,
            body_only,
            equation_url,
            quiet,
        }) => {
            let options = html_options(body_only, equation_url.as_deref());
            convert_files(&inputs, out_dir.as_deref(), options, quiet).map_err(PublishError::from)
        }
        Some(Commands::Publish {
            config,
            assignment_id,
            title,
            description,
            html_file,
            points,
            submission_type,
            due_at,
            unlock_at,
            lock_at,
            dry_run,
        }) => publish(
            &config,
            assignment_id.as_deref(),
            title.as_deref(),
            description.as_deref(),
            html_file.as_deref(),
            points,
            &submission_type,
            due_at.as_deref(),
            unlock_at.as_deref(),
            lock_at.as_deref(),
            dry_run,
        ),
        Some(Commands::Info) => {
            print_info();
            Ok(())
        }
        None => {
            let options = html_options(cli.body_only, cli.equation_url.as_deref());
            convert_files(&cli.inputs, cli.out_dir.as_deref(), options, cli.quiet)
                .map_err(PublishError::from)
        }
    };

    if let Err(err) = result {
        eprintln!("\x1b[31mError: {}\x1b[0m", err);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("tex2canvas was built without the 'cli' feature");
}
