//! srcmlcpp CLI library
//!
//! This module contains the core CLI logic for the srcmlcpp tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::fs;

use log::{info, warn};

use srcmlcpp::{SrcmlcppError, UnitBuilder, xml};

/// Run the srcmlcpp CLI application
///
/// This function converts the input file with srcML, parses it when the
/// format needs the AST, and writes the result to the output file or to
/// the standard output. The warnings of the parse are rendered with their
/// location in the input.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `SrcmlcppError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - srcML failures
/// - Fatal parsing errors
pub fn run(args: &Args) -> Result<(), SrcmlcppError> {
    info!(
        input_path = args.input,
        format:? = args.format;
        "Processing header"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    // Positions give the diagnostics a location in the input.
    app_config.options_mut().dump_positions = true;

    let source = fs::read_to_string(&args.input)?;
    let builder = UnitBuilder::new(app_config);

    let output = match args.format {
        OutputFormat::Xml => xml::to_pretty_xml_string(&builder.code_to_srcml(&source)?)?,
        OutputFormat::Roundtrip => {
            let code = builder.srcml_to_code(&builder.code_to_srcml(&source)?)?;
            if code.trim_end() == source.trim_end() {
                info!("Roundtrip is identical to the input");
            } else {
                warn!(input_path = args.input; "Roundtrip differs from the input");
            }
            code
        }
        OutputFormat::Overview | OutputFormat::Code => {
            let unit = builder.code_to_cpp_unit(&source, Some(&args.input))?;
            for reportable in error_adapter::diagnostics_to_reportables(unit.diagnostics(), &source) {
                warn!("{}", error_adapter::render(&reportable));
            }
            if args.format == OutputFormat::Overview {
                unit.hierarchy_overview(unit.root())
            } else {
                unit.str_code(unit.root())
            }
        }
    };

    match &args.output {
        Some(path) => {
            fs::write(path, output)?;
            info!(output_file = path.as_str(); "Output written");
        }
        None => println!("{output}"),
    }

    Ok(())
}
