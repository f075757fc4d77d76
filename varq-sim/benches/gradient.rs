use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use varq_sim::{
    circuit_gradient, encode, ClassifierObjective, CircuitEvaluator, GradientConfig,
    GradientMethod, Objective, VariationalCircuit,
};

fn weights_for(circuit: &VariationalCircuit) -> Vec<f64> {
    (0..circuit.num_weights()).map(|i| (i as f64) * 0.1).collect()
}

fn bench_circuit_gradient(c: &mut Criterion) {
    let mut group = c.benchmark_group("circuit_gradient");
    let angles = encode(&[0.4, 0.1, -0.7, 0.3]).unwrap();

    for layers in [2, 6, 12] {
        let circuit = VariationalCircuit::new(layers, 2).unwrap();
        let weights = weights_for(&circuit);

        for (label, method, parallel) in [
            ("parameter_shift_par", GradientMethod::ParameterShift, true),
            ("parameter_shift_seq", GradientMethod::ParameterShift, false),
            ("finite_difference_seq", GradientMethod::FiniteDifference, false),
        ] {
            let config = GradientConfig {
                method,
                parallel,
                ..Default::default()
            };
            group.bench_with_input(
                BenchmarkId::new(label, format!("{}layers_{}params", layers, weights.len())),
                &weights,
                |b, weights| {
                    b.iter(|| {
                        circuit_gradient(&circuit, black_box(&angles), black_box(weights), &config)
                            .unwrap()
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_batch_objective(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_objective");
    let circuit = VariationalCircuit::new(6, 2).unwrap();
    let config = GradientConfig::default();

    for batch in [1, 5, 20] {
        let angles: Vec<_> = (0..batch)
            .map(|i| encode(&[0.5 + 0.01 * i as f64, 0.2, 0.3, 0.4]).unwrap())
            .collect();
        let labels: Vec<f64> = (0..batch).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let objective = ClassifierObjective::new(&circuit, &angles, &labels, &config).unwrap();
        let mut params = weights_for(&circuit);
        params.push(0.0);

        group.bench_with_input(BenchmarkId::from_parameter(batch), &params, |b, params| {
            b.iter(|| objective.gradient(black_box(params)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_circuit_gradient, bench_batch_objective);
criterion_main!(benches);
