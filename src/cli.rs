use std::path::{Path, PathBuf};

mod show;
mod terminal;
mod validate;

use clap::ArgAction;
use show::Show;
use tracing::instrument;
use validate::Validate;

/// Read and parse a checklist document at a CLI boundary.
fn load(file: &Path) -> anyhow::Result<xccdf::Benchmark> {
    let source = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", file.display()))?;
    let benchmark = xccdf::Benchmark::parse(&source)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {e}", file.display()))?;
    Ok(benchmark)
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.run()
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Print the item tree of a checklist document
    Show(Show),

    /// Validate references and dependencies of a checklist document
    Validate(Validate),

    /// Dump the parsed object model as JSON
    Dump(Dump),
}

impl Command {
    fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Show(command) => command.run()?,
            Self::Validate(command) => command.run()?,
            Self::Dump(command) => command.run()?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Dump {
    /// The path to the checklist document
    file: PathBuf,
}

impl Dump {
    #[instrument]
    fn run(self) -> anyhow::Result<()> {
        let benchmark = load(&self.file)?;
        println!("{}", serde_json::to_string_pretty(&benchmark)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn document(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn load_reads_and_parses_a_document() {
        let file = document(r#"<Benchmark id="b"><Rule id="r1"/></Benchmark>"#);

        let benchmark = load(file.path()).expect("document should load");
        assert_eq!(benchmark.ident(), Some("b"));
        assert_eq!(benchmark.content().len(), 1);
    }

    #[test]
    fn load_reports_missing_files() {
        let err = load(Path::new("/nonexistent/checklist.xml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn load_reports_parse_failures() {
        let file = document("<NotABenchmark/>");

        let err = load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn dump_serializes_a_document() {
        let file = document(r#"<Benchmark id="b"><Group id="g"><Rule id="r"/></Group></Benchmark>"#);

        let dump = Dump {
            file: file.path().to_path_buf(),
        };
        dump.run().expect("dump should succeed");
    }
}
