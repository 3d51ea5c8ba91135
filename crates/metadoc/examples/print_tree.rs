//! Builds two recording sessions, merges them and prints the result.
//!
//! Set `RUST_LOG=metadoc=debug` to watch reparenting and merge events.

use metadoc::{
    DocumentBuilder, MergeOptions, NodeRef, PropertyBuilder, SectionBuilder, Store, validate_tree,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn print_node(store: &Store, node: NodeRef, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        NodeRef::Document(r) => {
            if let Some(doc) = store.document(r) {
                println!("{}Document {} (author: {})", indent, doc.id_str(), doc.author().unwrap_or("-"));
            }
        }
        NodeRef::Section(r) => {
            if let Some(section) = store.section(r) {
                let merged = if store.merged_section(r).is_some() { " [merged]" } else { "" };
                println!("{}[{}]{}", indent, section.name(), merged);
                for &property in section.properties() {
                    print_node(store, property.into(), depth + 1);
                }
            }
        }
        NodeRef::Property(r) => {
            if let Some(property) = store.property(r) {
                let values: Vec<String> = property.iter().map(ToString::to_string).collect();
                let dtype = property.dtype().map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
                let unit = property.unit().map(|u| format!(" {}", u)).unwrap_or_default();
                println!("{}{} ({}) = [{}]{}", indent, property.name(), dtype, values.join(", "), unit);
            }
        }
    }
    for &section in store.child_sections(node) {
        print_node(store, section.into(), depth + 1);
    }
}

fn session(name: &str, rates: Vec<i64>, notes: &str) -> SectionBuilder {
    SectionBuilder::new(name)
        .section_type("recording")
        .definition("One  recording session")
        .property(PropertyBuilder::new("sampling_rate").value(rates).unit("Hz"))
        .property(PropertyBuilder::new("notes").value(notes))
        .section(
            SectionBuilder::new("electrode")
                .property(PropertyBuilder::new("position").dtype("2-tuple").value("(39.12; 67.19)")),
        )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut store = Store::new();
    let doc = DocumentBuilder::new()
        .author("D. N. Adams")
        .version("1.0")
        .section(session("session", vec![20000, 10000], "first day"))
        .build(&mut store)?;
    let later = session("session", vec![5000], "second day").build(&mut store)?;

    let Some(first) = store.section_named(doc, "session") else {
        return Err("document lost its session".into());
    };
    store.merge_sections(first, later, MergeOptions::new())?;

    print_node(&store, doc.into(), 0);
    validate_tree(&store, doc)?;

    if let Some(rate) = store.find_path(doc, "/session:sampling_rate").and_then(NodeRef::as_property) {
        let count = store.property(rate).map_or(0, |p| p.len());
        println!("{}: {} values", store.path(rate)?, count);
    }
    Ok(())
}
