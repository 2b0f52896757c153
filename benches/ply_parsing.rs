//! Benchmarks for PLY document decoding
//!
//! Measures decoding of realistic vertex data and triangle faces in ASCII and
//! binary formats, plus typed extraction through serde.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ply_mesh::{Document, PlyHeader};
use serde::Deserialize;
use std::io::Cursor;

#[derive(Deserialize)]
#[allow(unused)]
struct RealisticVertex {
    x: f32,
    y: f32,
    z: f32,
    nx: f32,
    ny: f32,
    nz: f32,
    red: u8,
    green: u8,
    blue: u8,
}

const HEADER_BODY: &str = "comment Benchmark realistic vertex data
property float x
property float y
property float z
property float nx
property float ny
property float nz
property uchar red
property uchar green
property uchar blue
";

fn header(format: &str, vertex_count: usize, face_count: usize) -> String {
    let mut lines = HEADER_BODY.lines();
    let comment = lines.next().unwrap_or_default();
    let properties: Vec<&str> = lines.collect();
    format!(
        "ply\nformat {format} 1.0\n{comment}\nelement vertex {vertex_count}\n{}\nelement face {face_count}\nproperty list uchar uint vertex_indices\nend_header\n",
        properties.join("\n")
    )
}

fn generate_binary_ply_data(vertex_count: usize) -> Vec<u8> {
    let face_count = vertex_count.saturating_sub(2);
    let mut binary_data = header("binary_little_endian", vertex_count, face_count).into_bytes();

    // 6 floats + 3 bytes = 27 bytes per vertex
    for i in 0..vertex_count {
        let base = i as f32 * 0.01;
        binary_data.extend_from_slice(&base.to_le_bytes());
        binary_data.extend_from_slice(&(base + 1.0).to_le_bytes());
        binary_data.extend_from_slice(&(base + 2.0).to_le_bytes());
        binary_data.extend_from_slice(&0.0f32.to_le_bytes());
        binary_data.extend_from_slice(&0.0f32.to_le_bytes());
        binary_data.extend_from_slice(&1.0f32.to_le_bytes());
        binary_data.push((i % 256) as u8);
        binary_data.push(((i * 2) % 256) as u8);
        binary_data.push(((i * 3) % 256) as u8);
    }

    for i in 0..face_count as u32 {
        binary_data.push(3);
        for v in [i, i + 1, i + 2] {
            binary_data.extend_from_slice(&v.to_le_bytes());
        }
    }

    binary_data
}

fn generate_ascii_ply_data(vertex_count: usize) -> String {
    let face_count = vertex_count.saturating_sub(2);
    let mut ply_data = header("ascii", vertex_count, face_count);

    for i in 0..vertex_count {
        let base = i as f32 * 0.01;
        ply_data.push_str(&format!(
            "{} {} {} 0.0 0.0 1.0 {} {} {}\n",
            base,
            base + 1.0,
            base + 2.0,
            i % 256,
            (i * 2) % 256,
            (i * 3) % 256
        ));
    }
    for i in 0..face_count {
        ply_data.push_str(&format!("3 {} {} {}\n", i, i + 1, i + 2));
    }

    ply_data
}

fn bench_binary_vs_ascii_formats(c: &mut Criterion) {
    let vertex_count = 5000;
    let binary_data = generate_binary_ply_data(vertex_count);
    let ascii_data = generate_ascii_ply_data(vertex_count);

    let mut group = c.benchmark_group("format_comparison_5k");

    group.bench_function("binary_document", |b| {
        b.iter(|| {
            let doc = Document::from_bytes(black_box(&binary_data)).unwrap();
            black_box(doc);
        })
    });

    group.bench_function("ascii_document", |b| {
        b.iter(|| {
            let doc: Document = black_box(&ascii_data).parse().unwrap();
            black_box(doc);
        })
    });

    let doc = Document::from_bytes(&binary_data).unwrap();
    group.bench_function("typed_vertices", |b| {
        b.iter(|| {
            let vertices: Vec<RealisticVertex> = black_box(&doc)
                .element("vertex")
                .unwrap()
                .deserialize_records()
                .unwrap();
            black_box(vertices);
        })
    });

    group.finish();
}

fn bench_scaling_performance(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    for size in [1000, 5000, 25000] {
        let binary_data = generate_binary_ply_data(size);

        group.throughput(Throughput::Bytes(binary_data.len() as u64));
        group.bench_function(format!("{}k_vertices", size / 1000), |b| {
            b.iter(|| {
                let doc = Document::from_read(Cursor::new(black_box(&binary_data))).unwrap();
                black_box(doc);
            })
        });
    }

    group.finish();
}

fn bench_header_parsing(c: &mut Criterion) {
    let binary_data = generate_binary_ply_data(5000);

    c.bench_function("header_parse", |b| {
        b.iter(|| {
            let mut reader = black_box(binary_data.as_slice());
            let header = PlyHeader::parse(&mut reader).unwrap();
            black_box(header);
        })
    });
}

criterion_group!(
    benches,
    bench_binary_vs_ascii_formats,
    bench_scaling_performance,
    bench_header_parsing
);

criterion_main!(benches);
