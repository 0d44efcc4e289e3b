//! Walkthrough of a small lattice-surgery program.
//!
//! Shows:
//! 1. Seeding slice 0 from a layout
//! 2. Logical Paulis and single-patch measurements
//! 3. Ancilla routing for X⊗X and Z⊗Z joint measurements
//! 4. A twist (S-gate) route on a single patch
//!
//! Run with `RUST_LOG=debug` to see the compiler's own trace.

use std::sync::Arc;

use lattice_surgery_compiler::prelude::*;

fn main() -> Result<(), LatticeError> {
    env_logger::init();

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║       Lattice Surgery — Patch Compilation Demo       ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let layout = Arc::new(SimpleLayout::with_config(3, LayoutConfig { row: 1, spacing: 2 }));
    let program = LogicalLatticeComputation::new(vec![0, 1, 2])
        .then(LogicalPauli { target: 0 })
        .then(MultiPatchMeasurement::new([(0, PauliOperator::Z), (1, PauliOperator::Z)]))
        .then(MultiPatchMeasurement::new([(1, PauliOperator::Z), (2, PauliOperator::Z)]))
        .then(SinglePatchMeasurement { target: 1 })
        .then(MagicStateRequest { target: 2 });

    let compiled = PatchComputation::make_with_layout(&program, layout)?;

    for (i, slice) in compiled.slices().iter().enumerate() {
        let step = match i {
            0 => "initial placement".to_string(),
            _ => format!("{:?}", program.instructions[i - 1]),
        };
        println!("═══ Slice {} — {} ═══", i, step);
        print_slice(slice, None);
        println!();
    }

    println!("═══ Twist route on patch 0 (last slice) ═══");
    let last = compiled.last_slice();
    match route_twist(last, 0)? {
        Some(region) => print_slice(last, Some(&region)),
        None => println!("  no free cells around patch 0: the single row leaves no room"),
    }

    Ok(())
}

/// One character per cell: patch id digit, `~` for ancillas, `.` for free.
fn print_slice(slice: &Slice, extra: Option<&RoutingRegion>) {
    let bounds = SearchBounds::from_origin(slice.furthest_cell());
    for row in bounds.min().row..=bounds.max().row {
        let line: String = (bounds.min().col..=bounds.max().col)
            .map(|col| {
                let cell = Cell::new(row, col);
                let routed = slice
                    .routing_regions()
                    .iter()
                    .chain(extra)
                    .any(|r| r.occupies(cell));
                match slice.any_patch_on_cell(cell) {
                    Some(p) => match (p.id, p.activity) {
                        (_, PatchActivity::Measurement) => 'M',
                        (_, PatchActivity::Unitary) => 'U',
                        (Some(id), _) => char::from_digit(id % 10, 10).unwrap_or('#'),
                        (None, _) => '#',
                    },
                    None if routed => '~',
                    None => '.',
                }
            })
            .collect();
        println!("  {}", line);
    }
}
