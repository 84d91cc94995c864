use criterion::{criterion_group, criterion_main, Criterion};
use sim::{EnvConfig, Environment, Level};

fn bench_env_step(c: &mut Criterion) {
    let level = Level::from_str(include_str!("../tests/data/level_1.txt")).unwrap();
    c.bench_function("env_step", |b| {
        let mut env = Environment::new(level.clone(), EnvConfig::default()).unwrap();
        b.iter(|| {
            let (_obs, _reward, done) = env.step(&[0.01]);
            if done {
                env.reset();
            }
        });
    });
}

criterion_group!(benches, bench_env_step);
criterion_main!(benches);
