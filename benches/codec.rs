use criterion::{black_box, criterion_group, criterion_main, Criterion};
use crp_tools::{
    codec::{CrpCodec, PackOptions},
    file_parsers::crp::{parser::parse_crp_bytes, writer::write_crp_bytes},
};

fn codec_benchmark(c: &mut Criterion) {
    let codec = CrpCodec::default();
    // Largest image the program region accepts
    let bin = (0..0x5FFFE_u32).map(|i| i as u8).collect::<Vec<_>>();
    let options = PackOptions {
        flash_size: None,
        flash_addr: 0x20000,
        header: true,
    };

    c.bench_function("pack_program_image", |b| {
        b.iter(|| codec.pack(black_box(&bin), &options).expect("Failed to pack"))
    });

    let packed = codec.pack(&bin, &options).expect("Failed to pack");
    let file = bytes::Bytes::from(write_crp_bytes(&[packed.data]).expect("Failed to wrap"));

    c.bench_function("unpack_program_image", |b| {
        b.iter(|| {
            let container = parse_crp_bytes(black_box(file.clone())).expect("Failed to parse");
            codec.unpack(&container)
        })
    });
}

criterion_group!(benches, codec_benchmark);
criterion_main!(benches);
