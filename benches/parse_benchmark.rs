//! This bench test parses a generated checklist document with deeply nested
//! groups, cross-references and check trees.

#![allow(missing_docs)]

use std::fmt::Write;

use criterion::{Criterion, criterion_group, criterion_main};
use xccdf::Benchmark;

/// Generates a checklist with `groups` groups of `rules` rules each. Every
/// rule requires the next rule in its group, so the resolution pass has
/// forward references to chase.
fn generate_document(groups: usize, rules: usize) -> String {
    let mut doc = String::from(r#"<Benchmark id="bench"><title>Generated</title>"#);
    for g in 0..groups {
        write!(doc, r#"<Group id="g{g}"><title>Group {g}</title>"#).unwrap();
        for r in 0..rules {
            let next = (r + 1) % rules;
            write!(
                doc,
                r#"<Rule id="g{g}-r{r}" severity="medium">
                    <requires idref="g{g}-r{next}"/>
                    <complex-check operator="and">
                        <check system="urn:oval">
                            <check-content-ref href="oval.xml" name="def-{r}"/>
                        </check>
                        <check system="urn:oval" negate="true" operator="or">
                            <check system="urn:sce"/>
                        </check>
                    </complex-check>
                    <fix id="f-{g}-{r}" strategy="configure">echo fix {r}</fix>
                    <fixtext fixref="f-{g}-{r}">Apply fix {r}</fixtext>
                </Rule>"#
            )
            .unwrap();
        }
        doc.push_str("</Group>");
    }
    doc.push_str("</Benchmark>");
    doc
}

fn parse_benchmark(c: &mut Criterion) {
    let document = generate_document(50, 40);

    c.bench_function("parse checklist", |b| {
        b.iter(|| {
            let benchmark = Benchmark::parse(&document).unwrap();
            assert!(benchmark.unresolved().is_empty());
            benchmark
        });
    });
}

criterion_group!(benches, parse_benchmark);
criterion_main!(benches);
