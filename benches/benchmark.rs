use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use astc_gpu_core::{
    encode_ise, find_best_partition_candidates, symbolic_to_physical, BlockSizeDescriptor, ColorF32,
    EncoderConfig, ImageBlock, PartitionTables, QuantMethod, SymbolicBlock,
};

criterion_main!(benches);
criterion_group!(
    benches,
    compile_block_size,
    partition_selection,
    encode_sequences,
    pack_blocks
);

const BLOCK_SIZES: [(u32, u32); 4] = [(4, 4), (6, 6), (8, 8), (12, 12)];

fn compile_block_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_block_size");
    for (x, y) in BLOCK_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{}x{}", x, y)), &(x, y), |b, &(x, y)| {
            b.iter(|| {
                let bsd = BlockSizeDescriptor::new(x, y).unwrap();
                PartitionTables::new(&bsd).texel_count()
            });
        });
    }
    group.finish();
}

fn noisy_block(x: u32, y: u32) -> ImageBlock {
    let mut state = 0x1234_5678u32;
    let texels = (0..x * y)
        .map(|_| {
            let mut channel = || {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state % 65536) as f32
            };
            ColorF32::new(channel(), channel(), channel(), 65536.0)
        })
        .collect();
    ImageBlock::new(0, 0, texels)
}

fn partition_selection(c: &mut Criterion) {
    let config = EncoderConfig::default();
    let mut group = c.benchmark_group("partition_selection");
    for (x, y) in BLOCK_SIZES {
        let tables = PartitionTables::new(&BlockSizeDescriptor::new(x, y).unwrap());
        let block = noisy_block(x, y);
        for partition_count in 2..=4 {
            group.bench_with_input(
                BenchmarkId::new(format!("{}x{}", x, y), partition_count),
                &partition_count,
                |b, &partition_count| {
                    b.iter(|| find_best_partition_candidates(&tables, &block, partition_count, &config).unwrap());
                },
            );
        }
    }
    group.finish();
}

fn encode_sequences(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_ise");
    for quant in [QuantMethod::Quant3, QuantMethod::Quant5, QuantMethod::Quant8, QuantMethod::Quant12] {
        let levels = quant.levels();
        let values: Vec<u8> = (0..32).map(|i| (i % levels) as u8).collect();
        group.bench_with_input(BenchmarkId::from_parameter(format!("{:?}", quant)), &values, |b, values| {
            let mut out = [0u8; 64];
            b.iter(|| encode_ise(quant, values, &mut out, 0).unwrap());
        });
    }
    group.finish();
}

fn pack_blocks(c: &mut Criterion) {
    let bsd = BlockSizeDescriptor::new(8, 8).unwrap();
    let blocks: Vec<SymbolicBlock> = bsd
        .block_modes()
        .iter()
        .filter(|bm| bm.weight_bits <= 64)
        .map(|bm| SymbolicBlock {
            block_mode: bm.mode_index,
            partition_count: 2,
            partition_index: bm.mode_index as u32 % 1024,
            partition_formats: [4, 8, 0, 0],
            quant_mode: QuantMethod::Quant6,
            quantized_weights: [40; 64],
            ..SymbolicBlock::default()
        })
        .collect();

    c.bench_function("symbolic_to_physical", |b| {
        b.iter(|| {
            let mut ok = true;
            for scb in &blocks {
                ok &= symbolic_to_physical(&bsd, scb).is_ok();
            }
            ok
        });
    });
}
