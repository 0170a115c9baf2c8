use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wordle_solver::{
    default_allowed, default_possible, NullProgress, Query, Ranker, PrefixIndex, Word, WordSet,
};

fn entropy_benchmark(c: &mut Criterion) {
    let allowed = default_allowed();
    let possible = default_possible();
    let index = PrefixIndex::build(&allowed, &possible);

    c.bench_function("top_n_entropy/opening_guess", |b| {
        b.iter(|| {
            let mut ranker = Ranker::new(&allowed);
            let query = Query::new();
            black_box(ranker.top_n_entropy(&index, &query, 5, &NullProgress));
        });
    });

    let mut warm = Ranker::new(&allowed);
    let opening_query = Query::new();
    warm.top_n_entropy(&index, &opening_query, 10, &NullProgress);

    let narrowed = {
        let mut query = Query::new();
        query.set_fixed(b'a' - b'a', 0);
        query.require_at_least(b's' - b'a', 1);
        query
    };

    c.bench_function("top_n_entropy/narrowed_query_warm_start", |b| {
        b.iter(|| {
            black_box(warm.top_n_entropy(&index, &narrowed, 5, &NullProgress));
        });
    });

    let guess = Word::parse("crane").unwrap_or_else(|_| allowed[0]);
    c.bench_function("partition/full_possible_set", |b| {
        b.iter(|| {
            black_box(index.partition(black_box(guess), &Query::new(), WordSet::Possible));
        });
    });
}

criterion_group!(benches, entropy_benchmark);
criterion_main!(benches);
