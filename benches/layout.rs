use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use process_network::config::{Config, LayoutConfig};
use process_network::connection::ConnectionDrop;
use process_network::ir::{Category, EdgeSpec, NodeSpec};
use process_network::layout::auto_organize;
use process_network::session::EditorSession;
use process_network::{GraphModel, ingest};
use std::hint::black_box;

/// Round-robins nodes over every known category and chains them with edges.
fn synthetic_payload(nodes: usize, extra_edges: usize) -> String {
    let categories = [
        "Cognitiva",
        "Afetiva",
        "Comportamento",
        "Self",
        "Contexto",
        "Motivacional",
        "Sociocultural",
        "Atencional",
        "Biofisiológica",
        "Intervenção",
    ];
    let nodes_json: Vec<String> = (0..nodes)
        .map(|i| {
            format!(
                r#"{{"id":"n{i}","label":"Processo {i}","category":"{}"}}"#,
                categories[i % categories.len()]
            )
        })
        .collect();
    let mut edges_json: Vec<String> = (1..nodes)
        .map(|i| format!(r#"{{"source":"n{}","target":"n{i}","weight":"forte"}}"#, i - 1))
        .collect();
    let mut count = 0usize;
    'outer: for i in 0..nodes {
        for j in (i + 2)..nodes {
            if count >= extra_edges {
                break 'outer;
            }
            edges_json.push(format!(r#"{{"source":"n{i}","target":"n{j}"}}"#));
            count += 1;
        }
    }
    format!(
        r#"{{"nodes":[{}],"edges":[{}]}}"#,
        nodes_json.join(","),
        edges_json.join(",")
    )
}

fn model_for(nodes: usize, extra_edges: usize) -> GraphModel {
    let payload = synthetic_payload(nodes, extra_edges);
    let (model, _) =
        ingest::parse_graph(&payload, &Config::default().ingest).expect("ingest failed");
    model
}

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");
    let config = Config::default();
    for (nodes, extra_edges) in [(10usize, 10usize), (60, 120), (200, 600)] {
        let name = format!("graph_{nodes}_{extra_edges}");
        let payload = synthetic_payload(nodes, extra_edges);
        group.bench_with_input(BenchmarkId::from_parameter(name), &payload, |b, data| {
            b.iter(|| {
                let parsed =
                    ingest::parse_graph(black_box(data), &config.ingest).expect("ingest failed");
                black_box(parsed.0.nodes().len());
            });
        });
    }
    group.finish();
}

fn bench_auto_organize(c: &mut Criterion) {
    let mut group = c.benchmark_group("auto_organize");
    let config = LayoutConfig::default();
    for nodes in [10usize, 40, 120, 400] {
        let model = model_for(nodes, nodes);
        group.bench_with_input(
            BenchmarkId::from_parameter(nodes),
            model.nodes(),
            |b, nodes| {
                b.iter(|| {
                    let mut nodes = nodes.to_vec();
                    let layout = auto_organize(black_box(&mut nodes), &config);
                    black_box(layout.width);
                });
            },
        );
    }
    group.finish();
}

fn bench_edit_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_session");
    for nodes in [10usize, 40, 120] {
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &nodes, |b, &count| {
            b.iter(|| {
                let mut session = EditorSession::default();
                for i in 0..count {
                    let category = Category::KNOWN[i % Category::KNOWN.len()].clone();
                    session
                        .add_node(
                            NodeSpec::new(format!("p{i}"), category).with_id(format!("p{i}")),
                        )
                        .expect("add");
                }
                for i in 1..count {
                    session
                        .connect(
                            EdgeSpec::new(format!("p{}", i - 1), format!("p{i}")),
                            ConnectionDrop::BodyToBody,
                        )
                        .expect("connect");
                }
                while session.undo() {}
                black_box(session.history().len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_ingest, bench_auto_organize, bench_edit_session
);
criterion_main!(benches);
