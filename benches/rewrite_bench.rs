use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fourfold::{Dictionary, Program, Session, Stack, evaluate, lex, parse_str};

// Builds a list of `n` symbols with cons, then takes it apart again with snoc
fn cons_snoc_program(n: usize) -> String {
    let mut program = String::new();
    for i in 0..n {
        program.push_str(&format!("s{} ", i));
    }
    program.push_str("[] ");
    for _ in 0..n {
        program.push_str("cons ");
    }
    for _ in 0..n {
        program.push_str("snoc ");
    }
    program
}

const PRELUDE_INPUT: &str = "a b swap dup = [x [y]] [x [y]] = and [yes] [no] if";

fn bench_lexer(c: &mut Criterion) {
    let input = cons_snoc_program(200);
    let mut group = c.benchmark_group("Lexer");
    group.bench_with_input(BenchmarkId::new("lex", "cons_snoc_200"), &input, |b, input| {
        b.iter(|| lex(black_box(input)))
    });
    group.bench_with_input(
        BenchmarkId::new("parse_str", "cons_snoc_200"),
        &input,
        |b, input| b.iter(|| parse_str(black_box(input))),
    );
    group.finish();
}

fn bench_evaluator(c: &mut Criterion) {
    let mut group = c.benchmark_group("Evaluator");
    for n in [10, 100, 500] {
        let program = parse_str(&cons_snoc_program(n));
        group.bench_with_input(BenchmarkId::new("cons_snoc", n), &program, |b, program| {
            b.iter(|| {
                evaluate(
                    Dictionary::new(),
                    Stack::new(),
                    Program::from(black_box(program.clone())),
                )
            })
        });
    }

    let session = Session::with_prelude();
    group.bench_function("prelude_words", |b| {
        b.iter(|| {
            let mut session = session.clone();
            session.eval_str(black_box(PRELUDE_INPUT))
        })
    });
    group.finish();
}

criterion_group!(benches, bench_lexer, bench_evaluator);
criterion_main!(benches);
