//! The benchmark: document root and owner of all checklist entities.
//!
//! Storage is decomposed: items, values and fixes live in arenas on the
//! benchmark and are addressed by stable typed handles. Structural ownership
//! (a group's content, a rule's fixes) is expressed as handle lists, so
//! dropping the benchmark releases every owned entity exactly once and
//! cross-references can never dangle.

use petgraph::{
    algo::{is_cyclic_directed, tarjan_scc},
    graphmap::DiGraphMap,
};
use serde::Serialize;
use tracing::debug;

use crate::{
    model::{
        check::{Check, CheckBody},
        item::{Item, Value},
        registry::{
            DuplicateIdent, Expected, FixId, FixRef, IdentRegistry, ItemId, ItemRef, Reason,
            Unresolved, ValueId, ValueRef,
        },
        remediation::Fix,
    },
    parse,
};

/// The root of a parsed checklist document.
#[derive(Debug, Default, Serialize)]
pub struct Benchmark {
    /// The benchmark's own identifier, if the document carried one.
    ident: Option<String>,
    /// Human-readable title.
    title: Option<String>,
    /// Human-readable description.
    description: Option<String>,
    /// Arena of all Groups and Rules, in allocation (document) order.
    items: Vec<Item>,
    /// Arena of all Values.
    values: Vec<Value>,
    /// Arena of all Fixes.
    fixes: Vec<Fix>,
    /// Handles of top-level items in document order.
    content: Vec<ItemId>,
    /// Handles of benchmark-level values in document order.
    root_values: Vec<ValueId>,
    /// Per-slot diagnostics left over from the resolution pass.
    unresolved: Vec<Unresolved>,
    #[serde(skip)]
    registry: IdentRegistry,
}

impl Benchmark {
    /// Builds the object model from a checklist document.
    ///
    /// The model is returned whenever the token stream itself is readable,
    /// even if individual items or references are defective; inspect
    /// [`Self::unresolved`] and the per-item state to judge usability.
    ///
    /// # Errors
    ///
    /// Returns an error only for malformed XML or a document whose root
    /// element is not `Benchmark`.
    pub fn parse(source: &str) -> Result<Self, parse::Error> {
        parse::parse_document(source)
    }

    /// The benchmark's identifier, if any.
    #[must_use]
    pub fn ident(&self) -> Option<&str> {
        self.ident.as_deref()
    }

    /// The benchmark's title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The benchmark's description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Looks up an item by handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this benchmark.
    #[must_use]
    pub fn item(&self, id: ItemId) -> &Item {
        &self.items[id.index()]
    }

    /// Looks up a value by handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this benchmark.
    #[must_use]
    pub fn value(&self, id: ValueId) -> &Value {
        &self.values[id.index()]
    }

    /// Looks up a fix by handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this benchmark.
    #[must_use]
    pub fn fix(&self, id: FixId) -> &Fix {
        &self.fixes[id.index()]
    }

    /// Handles of the benchmark's top-level items, in document order.
    #[must_use]
    pub fn content(&self) -> &[ItemId] {
        &self.content
    }

    /// Handles of the benchmark-level values, in document order.
    #[must_use]
    pub fn root_values(&self) -> &[ValueId] {
        &self.root_values
    }

    /// Iterates over every item in the benchmark with its handle.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| (ItemId(index), item))
    }

    /// Finds an item by its identifier.
    #[must_use]
    pub fn find(&self, ident: &str) -> Option<&Item> {
        let id = self.registry.lookup_item(ident).ok()?;
        Some(self.item(id))
    }

    /// Finds a value by its identifier.
    #[must_use]
    pub fn find_value(&self, ident: &str) -> Option<&Value> {
        let id = self.registry.lookup_value(ident).ok()?;
        Some(self.value(id))
    }

    /// Finds a fix by its identifier in the auxiliary fix table.
    #[must_use]
    pub fn find_fix(&self, ident: &str) -> Option<&Fix> {
        let id = self.registry.lookup_fix(ident).ok()?;
        Some(self.fix(id))
    }

    /// The per-slot diagnostics recorded by the resolution pass.
    #[must_use]
    pub fn unresolved(&self) -> &[Unresolved] {
        &self.unresolved
    }

    /// Whether the dependency graph over resolved `requires`/`conflicts`
    /// references contains a cycle.
    #[must_use]
    pub fn has_dependency_cycles(&self) -> bool {
        is_cyclic_directed(&self.dependency_graph())
    }

    /// All dependency cycles, as sorted lists of item identifiers.
    #[must_use]
    pub fn dependency_cycles(&self) -> Vec<Vec<String>> {
        let graph = self.dependency_graph();
        let mut cycles = Vec::new();

        for component in tarjan_scc(&graph) {
            if component.len() > 1 {
                let mut idents: Vec<_> = component
                    .iter()
                    .map(|id| self.item(*id).ident().to_string())
                    .collect();
                idents.sort();
                cycles.push(idents);
                continue;
            }

            let Some(&node) = component.first() else {
                continue;
            };

            if graph.contains_edge(node, node) {
                cycles.push(vec![self.item(node).ident().to_string()]);
            }
        }

        cycles.sort();
        cycles
    }

    fn dependency_graph(&self) -> DiGraphMap<ItemId, ()> {
        let mut graph = DiGraphMap::new();

        for (id, item) in self.items() {
            graph.add_node(id);
            let constraints = item.constraints();

            for alternatives in &constraints.requires {
                for slot in alternatives {
                    if let Some(target) = slot.target {
                        graph.add_edge(id, target, ());
                    }
                }
            }
            for slot in &constraints.conflicts {
                if let Some(target) = slot.target {
                    graph.add_edge(id, target, ());
                }
            }
        }

        graph
    }
}

/// Mutation surface used by the parser. Items are registered before their
/// children are parsed, so identifiers declared earlier in the tree
/// (including an item's own) are visible to later references.
impl Benchmark {
    pub(crate) fn set_ident(&mut self, ident: Option<String>) {
        self.ident = ident;
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = Some(title);
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = Some(description);
    }

    /// Allocates an item and registers its identifier in one step.
    ///
    /// The item must carry a non-empty identifier; a duplicate identifier
    /// rejects the item before it enters the arena.
    pub(crate) fn insert_item(&mut self, item: Item) -> Result<ItemId, DuplicateIdent> {
        let id = ItemId(self.items.len());
        self.registry.register_item(item.ident(), id)?;
        self.items.push(item);
        Ok(id)
    }

    /// Allocates a value and registers its identifier.
    pub(crate) fn insert_value(&mut self, value: Value) -> Result<ValueId, DuplicateIdent> {
        let id = ValueId(self.values.len());
        self.registry.register_value(&value.ident, id)?;
        self.values.push(value);
        Ok(id)
    }

    /// Allocates a fix, registering non-empty identifiers in the auxiliary
    /// table.
    pub(crate) fn insert_fix(&mut self, fix: Fix) -> FixId {
        let id = FixId(self.fixes.len());
        if let Some(ident) = fix.ident.as_deref() {
            if !ident.is_empty() {
                self.registry.register_fix(ident, id);
            }
        }
        self.fixes.push(fix);
        id
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> &mut Item {
        &mut self.items[id.index()]
    }

    pub(crate) fn push_content(&mut self, id: ItemId) {
        self.content.push(id);
    }

    pub(crate) fn push_root_value(&mut self, id: ValueId) {
        self.root_values.push(id);
    }

    pub(crate) const fn registry(&self) -> &IdentRegistry {
        &self.registry
    }

    /// The resolution pass: revisits every pending slot once the whole
    /// document has been parsed and either fills it or records a per-slot
    /// diagnostic. Runs exactly once, from the parse entry point.
    pub(crate) fn resolve_pending(&mut self) {
        let mut report = Vec::new();
        let registry = std::mem::take(&mut self.registry);

        for item in &mut self.items {
            let owner = item.meta().ident.clone();

            let constraints = item.constraints_mut();
            for alternatives in &mut constraints.requires {
                for slot in alternatives.iter_mut() {
                    resolve_item_slot(slot, &registry, &owner, &mut report);
                }
            }
            for slot in &mut constraints.conflicts {
                resolve_item_slot(slot, &registry, &owner, &mut report);
            }

            if let Item::Rule(rule) = item {
                for check in &mut rule.checks {
                    resolve_check_exports(check, &registry, &owner, &mut report);
                }
                for fixtext in &mut rule.fixtexts {
                    resolve_fix_slot(&mut fixtext.fixref, &registry, &owner, &mut report);
                }
            }
        }

        if !report.is_empty() {
            debug!(count = report.len(), "resolution pass left unresolved references");
        }

        self.registry = registry;
        self.unresolved = report;
    }
}

fn resolve_item_slot(
    slot: &mut ItemRef,
    registry: &IdentRegistry,
    owner: &str,
    report: &mut Vec<Unresolved>,
) {
    if slot.is_resolved() {
        return;
    }
    match slot.idref.as_deref() {
        None => report.push(Unresolved {
            owner: owner.to_string(),
            idref: None,
            expected: Expected::Content,
            reason: Reason::MissingIdent,
        }),
        Some(ident) => match registry.lookup_item(ident) {
            Ok(target) => slot.target = Some(target),
            Err(reason) => report.push(Unresolved {
                owner: owner.to_string(),
                idref: Some(ident.to_string()),
                expected: Expected::Content,
                reason,
            }),
        },
    }
}

fn resolve_value_slot(
    slot: &mut ValueRef,
    registry: &IdentRegistry,
    owner: &str,
    report: &mut Vec<Unresolved>,
) {
    if slot.is_resolved() {
        return;
    }
    match slot.idref.as_deref() {
        None => report.push(Unresolved {
            owner: owner.to_string(),
            idref: None,
            expected: Expected::Value,
            reason: Reason::MissingIdent,
        }),
        Some(ident) => match registry.lookup_value(ident) {
            Ok(target) => slot.target = Some(target),
            Err(reason) => report.push(Unresolved {
                owner: owner.to_string(),
                idref: Some(ident.to_string()),
                expected: Expected::Value,
                reason,
            }),
        },
    }
}

fn resolve_fix_slot(
    slot: &mut FixRef,
    registry: &IdentRegistry,
    owner: &str,
    report: &mut Vec<Unresolved>,
) {
    if slot.is_resolved() {
        return;
    }
    // A fixtext without a fixref applies generally; only a named fix that
    // cannot be found is worth reporting.
    let Some(ident) = slot.idref.as_deref() else {
        return;
    };
    match registry.lookup_fix(ident) {
        Ok(target) => slot.target = Some(target),
        Err(reason) => report.push(Unresolved {
            owner: owner.to_string(),
            idref: Some(ident.to_string()),
            expected: Expected::Fix,
            reason,
        }),
    }
}

fn resolve_check_exports(
    check: &mut Check,
    registry: &IdentRegistry,
    owner: &str,
    report: &mut Vec<Unresolved>,
) {
    match &mut check.body {
        CheckBody::Leaf(leaf) => {
            for export in &mut leaf.exports {
                resolve_value_slot(&mut export.value, registry, owner, report);
            }
        }
        CheckBody::Combinator(combinator) => {
            for child in &mut combinator.children {
                resolve_check_exports(child, registry, owner, report);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use nonempty::NonEmpty;

    use crate::model::item::{Group, ItemMeta, Rule};

    use super::*;

    fn insert_rule(benchmark: &mut Benchmark, ident: &str) -> ItemId {
        let rule = Rule::new(ItemMeta::new(ident.to_string(), None));
        benchmark.insert_item(Item::Rule(rule)).unwrap()
    }

    #[test]
    fn forward_reference_resolves_after_pass() {
        let mut benchmark = Benchmark::default();

        // "a" requires "b" before "b" exists.
        let a = insert_rule(&mut benchmark, "a");
        let pending = benchmark.registry().request_item(Some("b"));
        assert!(!pending.is_resolved());
        benchmark
            .item_mut(a)
            .constraints_mut()
            .requires
            .push(NonEmpty::new(pending));

        let b = insert_rule(&mut benchmark, "b");
        benchmark.resolve_pending();

        let slot = &benchmark.item(a).constraints().requires[0].head;
        assert_eq!(slot.target, Some(b));
        assert!(benchmark.unresolved().is_empty());
    }

    #[test]
    fn missing_target_is_reported_per_slot() {
        let mut benchmark = Benchmark::default();
        let a = insert_rule(&mut benchmark, "a");
        let slot = benchmark.registry().request_item(Some("ghost"));
        benchmark.item_mut(a).constraints_mut().conflicts.push(slot);

        benchmark.resolve_pending();

        assert_eq!(benchmark.unresolved().len(), 1);
        let diagnostic = &benchmark.unresolved()[0];
        assert_eq!(diagnostic.owner, "a");
        assert_eq!(diagnostic.reason, Reason::NotFound);
        assert!(!benchmark.item(a).constraints().conflicts[0].is_resolved());
    }

    #[test]
    fn conflict_slot_without_ident_is_reported() {
        let mut benchmark = Benchmark::default();
        let a = insert_rule(&mut benchmark, "a");
        let slot = benchmark.registry().request_item(None);
        benchmark.item_mut(a).constraints_mut().conflicts.push(slot);

        benchmark.resolve_pending();

        assert_eq!(benchmark.unresolved()[0].reason, Reason::MissingIdent);
    }

    #[test]
    fn dependency_cycle_is_detected() {
        let mut benchmark = Benchmark::default();
        let a = insert_rule(&mut benchmark, "a");
        let b = insert_rule(&mut benchmark, "b");

        let to_b = ItemRef {
            idref: Some("b".to_string()),
            target: Some(b),
        };
        let to_a = ItemRef {
            idref: Some("a".to_string()),
            target: Some(a),
        };
        benchmark
            .item_mut(a)
            .constraints_mut()
            .requires
            .push(NonEmpty::new(to_b));
        benchmark
            .item_mut(b)
            .constraints_mut()
            .requires
            .push(NonEmpty::new(to_a));

        assert!(benchmark.has_dependency_cycles());
        assert_eq!(
            benchmark.dependency_cycles(),
            vec![vec!["a".to_string(), "b".to_string()]]
        );
    }

    #[test]
    fn acyclic_dependencies_report_no_cycles() {
        let mut benchmark = Benchmark::default();
        let a = insert_rule(&mut benchmark, "a");
        let b = insert_rule(&mut benchmark, "b");

        let to_b = ItemRef {
            idref: Some("b".to_string()),
            target: Some(b),
        };
        benchmark
            .item_mut(a)
            .constraints_mut()
            .requires
            .push(NonEmpty::new(to_b));

        assert!(!benchmark.has_dependency_cycles());
        assert!(benchmark.dependency_cycles().is_empty());
    }

    #[test]
    fn find_looks_through_the_registry() {
        let mut benchmark = Benchmark::default();
        let group = Group::new(ItemMeta::new("g".to_string(), None));
        benchmark.insert_item(Item::Group(group)).unwrap();

        assert!(benchmark.find("g").is_some());
        assert!(benchmark.find("absent").is_none());
        // A group identifier is not a value.
        assert!(benchmark.find_value("g").is_none());
    }
}
