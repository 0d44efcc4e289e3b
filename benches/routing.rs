// benches/routing.rs

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lattice_surgery_compiler::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Square lattice with qubits in opposite corners and random obstacles.
fn obstacle_slice(n: i32, density: f64, seed: u64) -> Slice {
    let mut rng = StdRng::seed_from_u64(seed);
    let corners = [Cell::new(0, 0), Cell::new(n - 1, n - 1)];
    let mut slice = Slice::from_layout(Arc::new(SimpleLayout::new(0)));
    for (id, cell) in corners.into_iter().enumerate() {
        slice
            .add_qubit_patch(Patch::qubit(cell).with_id(id as PatchId))
            .expect("corner cells start free");
    }
    for row in 0..n {
        for col in 0..n {
            let cell = Cell::new(row, col);
            if corners.contains(&cell) {
                continue;
            }
            if rng.gen::<f64>() < density {
                slice
                    .add_qubit_patch(Patch::qubit(cell))
                    .expect("each obstacle cell is visited once");
            }
        }
    }
    slice
}

fn benchmark_routing(c: &mut Criterion) {
    c.bench_function("route_open_16x16", |b| {
        let slice = obstacle_slice(16, 0.0, 1);
        b.iter(|| {
            graph_search_route_ancilla(black_box(&slice), 0, PauliOperator::X, 1, PauliOperator::Z)
        });
    });

    c.bench_function("route_obstacles_32x32", |b| {
        let slice = obstacle_slice(32, 0.2, 7);
        b.iter(|| {
            graph_search_route_ancilla(black_box(&slice), 0, PauliOperator::X, 1, PauliOperator::Z)
        });
    });

    c.bench_function("compile_zz_chain_16", |b| {
        let program = (0..15).fold(
            LogicalLatticeComputation::new((0..16).collect()),
            |program, i| {
                program.then(MultiPatchMeasurement::new([
                    (i, PauliOperator::Z),
                    (i + 1, PauliOperator::Z),
                ]))
            },
        );
        b.iter(|| PatchComputation::make(black_box(&program)));
    });
}

criterion_group!(benches, benchmark_routing);
criterion_main!(benches);
