//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use crate::analyzer::analyze_source;
use crate::generator::Generator;

use super::{CliError, CliResult, ExitCode};

/// Compile the router declarations in `input` and write the dispatcher to
/// `output`.
///
/// Extraction failures abort with the analyzer's diagnostic. Formatting
/// trouble degrades to unformatted output with a warning. I/O failures abort
/// naming the file and the cause.
pub fn generate(input: &Path, output: &Path) -> CliResult<ExitCode> {
    let input_name = input.to_string_lossy();
    let output_name = output.to_string_lossy();

    let source = fs::read_to_string(input)
        .map_err(|e| CliError::failure(format!("Error reading {}: {}", input_name, e)))?;

    let analysis =
        analyze_source(&input_name, &source).map_err(|e| CliError::failure(e.to_string()))?;

    let invocation = format!("routegen -i {} -o {}", input_name, output_name);
    let generated = Generator::new(&analysis.tree, &analysis.meta, &invocation)
        .generate()
        .map_err(|e| CliError::failure(format!("Code generation error: {}", e)))?;

    if let Some(warning) = &generated.format_warning {
        tracing::warn!("{warning}");
        tracing::warn!("writing unformatted output to {}", output_name);
    }

    fs::write(output, &generated.code)
        .map_err(|e| CliError::failure(format!("Error writing {}: {}", output_name, e)))?;

    println!("Generated {}", output_name);
    Ok(ExitCode::SUCCESS)
}
