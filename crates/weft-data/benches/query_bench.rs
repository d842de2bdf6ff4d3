use criterion::{black_box, criterion_group, criterion_main, Criterion};
use weft_data::ecs::{Descriptor, EntityId, Term, World};

fn bench_queries(c: &mut Criterion) {
    let mut world = World::default();
    let position = world
        .register_per_entity(|v: u32| v, Some("position"))
        .expect("register position");
    let visible = world.register_tag(Some("visible")).expect("register tag");

    // Setup 10,000 entities, every other one visible
    for i in 0..10_000_u32 {
        if i % 2 == 0 {
            world
                .spawn([
                    Descriptor::with_args(position, i),
                    Descriptor::new(visible),
                ])
                .expect("spawn");
        } else {
            world
                .spawn([Descriptor::with_args(position, i)])
                .expect("spawn");
        }
    }
    let churned = EntityId { index: 0 };

    let mut group = c.benchmark_group("Bitmask Queries");

    group.bench_function("Cached Re-Read (Position & Visible)", |b| {
        let mut query = world
            .query([Term::With(position), Term::With(visible)])
            .expect("query");
        b.iter(|| {
            let mut sum = 0_u32;
            for record in query.iter(&world) {
                sum += record.get_as::<u32>("position").expect("position");
                black_box(sum);
            }
        });
    });

    group.bench_function("First Scan (Fresh Query)", |b| {
        b.iter(|| {
            let mut query = world
                .query([Term::With(position), Term::With(visible)])
                .expect("query");
            black_box(query.iter(&world).count());
        });
    });

    group.bench_function("Detach/Attach Churn With Re-Read", |b| {
        let mut query = world
            .query([Term::With(position), Term::With(visible)])
            .expect("query");
        b.iter(|| {
            world.detach(churned, [visible]).expect("detach");
            black_box(query.iter(&world).count());
            world
                .attach(churned, [Descriptor::new(visible)])
                .expect("attach");
            black_box(query.iter(&world).count());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_queries);
criterion_main!(benches);
