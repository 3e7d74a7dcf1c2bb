//! Decoder throughput over synthetic enumeration buffers

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ntquery::layout::{BufferView, PointerWidth};
use ntquery::object::{decode_extended_handles, decode_object_types};
use ntquery::security::Sid;
use ntquery::token::decode_privileges;

const WIDTH: PointerWidth = PointerWidth::Eight;

fn types_buffer(count: usize) -> Vec<u8> {
    let unicode_string = 2 * WIDTH.bytes();
    let header_size = unicode_string + 13 * 4 + 16 + 4 + 4 + 12;
    let mut buf = (count as u32).to_le_bytes().to_vec();
    buf.resize(WIDTH.align_up(4), 0);
    for i in 0..count {
        let name = format!("Type{:03}", i);
        let name_bytes: Vec<u8> = name.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        let start = buf.len();
        buf.resize(start + header_size, 0);
        buf[start..start + 2].copy_from_slice(&(name_bytes.len() as u16).to_le_bytes());
        buf[start + 2..start + 4]
            .copy_from_slice(&((name_bytes.len() + 2) as u16).to_le_bytes());
        buf[start + unicode_string + 13 * 4 + 16 + 4 + 2] = (i + 2) as u8;
        buf.extend_from_slice(&name_bytes);
        buf.extend_from_slice(&[0, 0]);
        let padded = WIDTH.align_up(buf.len());
        buf.resize(padded, 0);
    }
    buf
}

fn handles_buffer(count: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(16 + count * 40);
    buf.extend_from_slice(&(count as u64).to_le_bytes());
    buf.extend_from_slice(&0u64.to_le_bytes());
    for i in 0..count {
        buf.extend_from_slice(&(0xFFFF_8000_0000_0000u64 + i as u64).to_le_bytes());
        buf.extend_from_slice(&((i as u64 % 512) * 4).to_le_bytes());
        buf.extend_from_slice(&((i as u64) * 4 + 4).to_le_bytes());
        buf.extend_from_slice(&0x0012_0089u32.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
        buf.extend_from_slice(&((i % 64) as u16 + 2).to_le_bytes());
        buf.extend_from_slice(&((i as u32 % 2) * 2).to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
    }
    buf
}

fn privileges_buffer(count: usize) -> Vec<u8> {
    let mut buf = (count as u32).to_le_bytes().to_vec();
    for i in 0..count {
        buf.extend_from_slice(&((i as u32 % 35) + 2).to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&((i as u32) % 4).to_le_bytes());
    }
    buf
}

fn bench_object_types(c: &mut Criterion) {
    let buf = types_buffer(70);
    c.bench_function("decode_object_types/70", |b| {
        b.iter(|| decode_object_types(&BufferView::new(black_box(&buf)), WIDTH).unwrap())
    });
}

fn bench_extended_handles(c: &mut Criterion) {
    let types = decode_object_types(&BufferView::new(&types_buffer(70)), WIDTH).unwrap();
    let buf = handles_buffer(50_000);
    c.bench_function("decode_extended_handles/50k", |b| {
        b.iter(|| {
            decode_extended_handles(&BufferView::new(black_box(&buf)), WIDTH, &types).unwrap()
        })
    });
}

fn bench_privileges(c: &mut Criterion) {
    let buf = privileges_buffer(35);
    c.bench_function("decode_privileges/35", |b| {
        b.iter(|| decode_privileges(&BufferView::new(black_box(&buf))).unwrap())
    });
}

fn bench_sid_parse(c: &mut Criterion) {
    c.bench_function("sid_parse_and_format", |b| {
        b.iter(|| {
            let sid = Sid::parse(black_box("S-1-5-21-3623811015-3361044348-30300820-1013"))
                .unwrap();
            black_box(sid.to_string())
        })
    });
}

criterion_group!(
    benches,
    bench_object_types,
    bench_extended_handles,
    bench_privileges,
    bench_sid_parse
);
criterion_main!(benches);
