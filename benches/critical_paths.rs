//! Criterion benchmarks for figurekit critical paths
//!
//! Benchmarks the core performance-critical operations:
//! - Markup: scanning of the catalog source document
//! - Catalog: full load (parse, classify, resolve colors)
//! - Codec: figure string parse, compose and edit
//! - Query: catalog filtering

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use figurekit::catalog::Catalog;
use figurekit::codec::{FigureCodec, Selection};
use figurekit::config::FigureConfig;
use figurekit::markup::scan;
use figurekit::models::Gender;
use figurekit::query::{query, CatalogQuery};

// =============================================================================
// Test Data Generators
// =============================================================================

const CATEGORIES: [&str; 8] = ["hd", "hr", "ha", "ch", "cc", "lg", "sh", "wa"];

/// Generate a source document with `sets_per_category` sets in each category
fn make_figuredata(sets_per_category: usize) -> String {
    let mut doc = String::from("<figuredata><colors>");
    for palette in 1..=3 {
        doc.push_str(&format!("<palette id=\"{}\">", palette));
        for color in 1..=60 {
            doc.push_str(&format!(
                "<color id=\"{}\" index=\"{}\" club=\"{}\" selectable=\"1\">{:06X}</color>",
                color,
                color,
                if color % 10 == 0 { 2 } else { 0 },
                color * 4099
            ));
        }
        doc.push_str("</palette>");
    }
    doc.push_str("</colors><sets>");
    for category in CATEGORIES {
        doc.push_str(&format!("<settype type=\"{}\" paletteid=\"3\">", category));
        for i in 0..sets_per_category {
            let id = 100 + i;
            let gender = ["M", "F", "U"][i % 3];
            doc.push_str(&format!(
                "<set id=\"{id}\" gender=\"{gender}\" club=\"{}\" colorable=\"1\" selectable=\"1\">\
                 <part id=\"{id}\" type=\"{category}\" colorable=\"1\" index=\"0\" colorindex=\"1\"/>\
                 <part id=\"{id}\" type=\"{category}\" colorable=\"1\" index=\"1\" colorindex=\"{}\"/>\
                 </set>",
                if i % 7 == 0 { 2 } else { 0 },
                if i % 2 == 0 { 2 } else { 1 },
            ));
        }
        doc.push_str("</settype>");
    }
    doc.push_str("</sets></figuredata>");
    doc
}

/// Generate a furnidata document with one record per third part
fn make_furnidata(sets_per_category: usize) -> String {
    let entries: Vec<String> = CATEGORIES
        .iter()
        .flat_map(|category| {
            (0..sets_per_category).step_by(3).map(move |i| {
                format!(
                    r#"{{"classname": "clothing_{}_{}", "furniline": "{}"}}"#,
                    category,
                    100 + i,
                    if i % 2 == 0 { "nft2024" } else { "rares" }
                )
            })
        })
        .collect();
    format!(r#"{{"roomitemtypes": {{"furnitype": [{}]}}}}"#, entries.join(","))
}

/// A figure string with one part per category
fn make_figure() -> String {
    CATEGORIES.iter().map(|c| format!("{}-101-12-34-", c)).collect::<Vec<_>>().join(".")
}

// =============================================================================
// Markup Benchmarks
// =============================================================================

fn bench_markup(c: &mut Criterion) {
    let mut group = c.benchmark_group("markup");

    for sets in [10, 100, 500].iter() {
        let doc = make_figuredata(*sets);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::new("scan", sets), &doc, |b, doc| {
            b.iter(|| scan(black_box(doc)))
        });
    }

    group.finish();
}

// =============================================================================
// Catalog Benchmarks
// =============================================================================

fn bench_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog");
    let config = FigureConfig::default();

    for sets in [10, 100, 500].iter() {
        let figuredata = make_figuredata(*sets);
        let furnidata = make_furnidata(*sets);
        group.throughput(Throughput::Elements((*sets * CATEGORIES.len()) as u64));
        group.bench_with_input(BenchmarkId::new("load", sets), &figuredata, |b, doc| {
            b.iter(|| Catalog::load(black_box(doc), Some(furnidata.as_str()), &config))
        });
    }

    group.bench_function("seed", |b| b.iter(|| Catalog::seed(black_box(&config))));

    group.finish();
}

// =============================================================================
// Codec Benchmarks
// =============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let config = FigureConfig::default();
    let catalog = match Catalog::load(&make_figuredata(100), None, &config) {
        Ok(catalog) => catalog,
        Err(e) => panic!("bench catalog failed to load: {}", e),
    };
    let codec = FigureCodec::new(&catalog);
    let figure = make_figure();

    group.bench_function("parse", |b| b.iter(|| codec.parse(black_box(&figure))));

    let selection = codec.parse(&figure).selection;
    group.bench_function("compose", |b| b.iter(|| codec.compose(black_box(&selection))));

    let noisy = format!("{}..xx-1-2-.hd-x.ch-101-a-", figure);
    group.bench_function("parse_with_invalid_tokens", |b| b.iter(|| codec.parse(black_box(&noisy))));

    group.bench_function("set_part_then_compose", |b| {
        b.iter(|| {
            let mut sel: Selection = selection.clone();
            let _ = codec.set_part(&mut sel, "ch", "104", None);
            let _ = codec.set_color(&mut sel, "ch", 1, "7");
            codec.compose(&sel)
        })
    });

    group.finish();
}

// =============================================================================
// Query Benchmarks
// =============================================================================

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let config = FigureConfig::default();
    let catalog = match Catalog::load(&make_figuredata(500), None, &config) {
        Ok(catalog) => catalog,
        Err(e) => panic!("bench catalog failed to load: {}", e),
    };

    let by_category = CatalogQuery::new().category("ch").gender(Gender::Female);
    group.bench_function("category_gender", |b| b.iter(|| query(&catalog, black_box(&by_category))));

    let search = CatalogQuery::new().search("shirt 12");
    group.bench_function("search", |b| b.iter(|| query(&catalog, black_box(&search))));

    group.finish();
}

criterion_group!(benches, bench_markup, bench_catalog, bench_codec, bench_query);
criterion_main!(benches);
