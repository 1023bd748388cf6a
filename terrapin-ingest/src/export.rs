//! Table export: four CSV files or a single JSON document.

use std::fs;
use std::path::Path;

use serde::Serialize;
use terrapin_graph::{Literal, PropertyGraph};
use tracing::info;

use crate::error::Result;

/// Write the four tables as CSV files under `out_dir`.
///
/// Files: `resources.csv`, `literals.csv`, `resource_edges.csv`,
/// `literal_edges.csv`. Edge rows reference resources by IRI and literals by
/// row id.
pub fn write_csv(graph: &PropertyGraph, out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)?;

    let mut resources = String::from("id,iri\n");
    for (id, iri) in graph.resources().iter().enumerate() {
        resources.push_str(&format!("{},{}\n", id, csv_escape(iri.as_str())));
    }
    fs::write(out_dir.join("resources.csv"), &resources)?;

    let mut literals = String::from("id,value,datatype,language\n");
    for (id, lit) in graph.literals().iter().enumerate() {
        literals.push_str(&format!(
            "{},{},{},{}\n",
            id,
            csv_escape(&lit.value.lexical()),
            csv_escape(lit.datatype.as_iri()),
            csv_escape(lit.language.as_deref().unwrap_or("")),
        ));
    }
    fs::write(out_dir.join("literals.csv"), &literals)?;

    let mut resource_edges = String::from("src_iri,predicate_iri,dst_iri\n");
    for (src, predicate, dst) in graph.resource_edge_rows() {
        resource_edges.push_str(&format!(
            "{},{},{}\n",
            csv_escape(src.as_str()),
            csv_escape(predicate.as_str()),
            csv_escape(dst.as_str()),
        ));
    }
    fs::write(out_dir.join("resource_edges.csv"), &resource_edges)?;

    let mut literal_edges = String::from("src_iri,predicate_iri,literal_id\n");
    for edge in graph.literal_edges() {
        literal_edges.push_str(&format!(
            "{},{},{}\n",
            csv_escape(graph.resource_iri(edge.src).as_str()),
            csv_escape(edge.predicate.as_str()),
            edge.literal.index(),
        ));
    }
    fs::write(out_dir.join("literal_edges.csv"), &literal_edges)?;

    info!(
        out_dir = %out_dir.display(),
        "Wrote resources.csv, literals.csv, resource_edges.csv, literal_edges.csv"
    );
    Ok(())
}

#[derive(Serialize)]
struct JsonGraph<'a> {
    resources: Vec<&'a str>,
    literals: &'a [Literal],
    resource_edges: Vec<JsonResourceEdge<'a>>,
    literal_edges: Vec<JsonLiteralEdge<'a>>,
}

#[derive(Serialize)]
struct JsonResourceEdge<'a> {
    src_iri: &'a str,
    predicate_iri: &'a str,
    dst_iri: &'a str,
}

#[derive(Serialize)]
struct JsonLiteralEdge<'a> {
    src_iri: &'a str,
    predicate_iri: &'a str,
    literal_id: usize,
}

/// Write all four tables as one JSON document, `graph.json`.
pub fn write_json(graph: &PropertyGraph, out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)?;

    let doc = JsonGraph {
        resources: graph.resources().iter().map(|iri| iri.as_str()).collect(),
        literals: graph.literals(),
        resource_edges: graph
            .resource_edge_rows()
            .map(|(src, predicate, dst)| JsonResourceEdge {
                src_iri: src.as_str(),
                predicate_iri: predicate.as_str(),
                dst_iri: dst.as_str(),
            })
            .collect(),
        literal_edges: graph
            .literal_edges()
            .iter()
            .map(|edge| JsonLiteralEdge {
                src_iri: graph.resource_iri(edge.src).as_str(),
                predicate_iri: edge.predicate.as_str(),
                literal_id: edge.literal.index(),
            })
            .collect(),
    };

    let path = out_dir.join("graph.json");
    fs::write(&path, serde_json::to_string_pretty(&doc)?)?;
    info!(path = %path.display(), "Wrote graph.json");
    Ok(())
}

fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
        assert_eq!(csv_escape("bare\rreturn"), "\"bare\rreturn\"");
    }

    #[test]
    fn csv_files_round_trip_counts() {
        let graph = terrapin_turtle::parse_to_graph(
            r#"
            @prefix ex: <http://example.org/> .
            ex:a ex:knows ex:b ;
                 ex:name "A, comma" .
            "#,
        )
        .unwrap();

        let dir = std::env::temp_dir().join("terrapin-export-test");
        write_csv(&graph, &dir).unwrap();

        let resources = fs::read_to_string(dir.join("resources.csv")).unwrap();
        assert_eq!(resources.lines().count(), 1 + graph.resource_count());

        let literals = fs::read_to_string(dir.join("literals.csv")).unwrap();
        assert!(literals.contains("\"A, comma\""));

        write_json(&graph, &dir).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join("graph.json")).unwrap()).unwrap();
        assert_eq!(json["resources"].as_array().unwrap().len(), 2);
        assert_eq!(json["resource_edges"][0]["dst_iri"], "http://example.org/b");

        let _ = fs::remove_dir_all(&dir);
    }
}
