use std::path::PathBuf;

use clap::Parser;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Validate references and dependencies of a checklist document")]
pub struct Validate {
    /// The path to the checklist document
    file: PathBuf,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

impl Validate {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let benchmark = super::load(&self.file)?;

        let unresolved = benchmark.unresolved();
        let cycles = benchmark.dependency_cycles();
        let total = unresolved.len() + cycles.len();

        match self.output {
            OutputFormat::Table => self.output_table(&benchmark, &cycles),
            OutputFormat::Json => Self::output_json(&benchmark, &cycles)?,
            OutputFormat::Summary => println!("issues={total}"),
        }

        // Exit with code 2 so CI can distinguish findings from failures.
        if total > 0 {
            std::process::exit(2);
        }

        Ok(())
    }

    fn output_table(&self, benchmark: &xccdf::Benchmark, cycles: &[Vec<String>]) {
        if self.quiet {
            return;
        }

        println!("Validating checklist...\n");

        let items = benchmark.items().count();
        let unresolved = benchmark.unresolved();

        if unresolved.is_empty() {
            println!("✓ References:    {items} items, all references resolved");
        } else {
            println!(
                "{}",
                format!("✗ References:    {} unresolved", unresolved.len()).warning()
            );
            for diagnostic in unresolved {
                println!("    • {diagnostic}");
            }
        }

        if cycles.is_empty() {
            println!("✓ Dependencies:  No cycles");
        } else {
            println!(
                "{}",
                format!("✗ Dependencies:  {} cycles found", cycles.len()).warning()
            );
            for cycle in cycles {
                println!("    • {}", cycle.join(" → "));
            }
        }

        let total = unresolved.len() + cycles.len();
        if total == 0 {
            println!("\n{}", "Checklist is healthy (0 issues)".success());
        } else {
            println!("\n{}", format!("Summary: {total} issues found").warning());
            println!(
                "\n{}",
                "Run 'xccdf dump' to inspect the parsed model".dim()
            );
        }
    }

    fn output_json(benchmark: &xccdf::Benchmark, cycles: &[Vec<String>]) -> anyhow::Result<()> {
        use serde_json::json;

        let total = benchmark.unresolved().len() + cycles.len();
        let output = json!({
            "status": if total == 0 { "healthy" } else { "issues_found" },
            "issues": {
                "unresolved": benchmark.unresolved(),
                "cycles": cycles,
            },
            "summary": {
                "total_issues": total,
            }
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn healthy_document_validates_cleanly() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"<Benchmark id="b">
                <Rule id="r1"><requires idref="r2"/></Rule>
                <Rule id="r2"/>
            </Benchmark>"#
        )
        .unwrap();

        for output in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Summary] {
            let validate = Validate {
                file: file.path().to_path_buf(),
                output,
                quiet: false,
            };
            validate.run().expect("healthy document should validate");
        }
    }
}
