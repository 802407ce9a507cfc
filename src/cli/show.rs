use std::path::PathBuf;

use clap::Parser;
use tracing::instrument;
use xccdf::{Benchmark, Item, model::ItemId};

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Print the item tree of a checklist document")]
pub struct Show {
    /// The path to the checklist document
    file: PathBuf,
}

impl Show {
    #[instrument]
    pub fn run(self) -> anyhow::Result<()> {
        let benchmark = super::load(&self.file)?;

        match (benchmark.title(), benchmark.ident()) {
            (Some(title), Some(ident)) => println!("{title} {}", format!("({ident})").dim()),
            (Some(title), None) => println!("{title}"),
            (None, Some(ident)) => println!("{ident}"),
            (None, None) => println!("(untitled benchmark)"),
        }

        for id in benchmark.content() {
            print_item(&benchmark, *id, 1);
        }

        let unresolved = benchmark.unresolved().len();
        if unresolved > 0 {
            println!(
                "\n{}",
                format!("⚠️  {unresolved} unresolved references (run 'xccdf validate')").warning()
            );
        }

        Ok(())
    }
}

fn print_item(benchmark: &Benchmark, id: ItemId, depth: usize) {
    let indent = "  ".repeat(depth);
    match benchmark.item(id) {
        Item::Group(group) => {
            let label = group.meta.title.as_deref().unwrap_or(&group.meta.ident);
            println!("{indent}{label} {}", format!("[{}]", group.meta.ident).dim());
            for child in &group.content {
                print_item(benchmark, *child, depth + 1);
            }
        }
        Item::Rule(rule) => {
            let label = rule.meta.title.as_deref().unwrap_or(&rule.meta.ident);
            let severity = format!("{:?}", rule.severity).to_lowercase();
            let mut annotations = vec![severity];
            if !rule.checks.is_empty() {
                annotations.push(format!("{} checks", rule.checks.len()));
            }
            if !rule.meta.selected {
                annotations.push("unselected".to_string());
            }
            println!(
                "{indent}• {label} {}",
                format!("({})", annotations.join(", ")).dim()
            );
        }
    }
}
