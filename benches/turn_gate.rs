use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hide_and_seek_client::adapter::protocol::parse_server_message;
use hide_and_seek_client::core::{Step, TurnGate};
use hide_and_seek_client::types::{Agent, AgentType, GameStatus, GameView, Turn, TurnType};

fn view(n: u32, t: TurnType) -> GameView {
    GameView::new(GameStatus::Ongoing, Turn::new(n, t), Agent::new(1, AgentType::Police))
}

fn bench_step_same_turn(c: &mut Criterion) {
    let mut gate = TurnGate::new();
    let v = view(2, TurnType::PoliceTurn);
    gate.step(&v);
    gate.mark_acted();

    c.bench_function("gate_step_same_turn", |b| {
        b.iter(|| gate.step(black_box(&v)))
    });
}

fn bench_step_turn_change(c: &mut Criterion) {
    let views = [view(1, TurnType::ThiefTurn), view(2, TurnType::PoliceTurn)];
    let mut gate = TurnGate::new();
    gate.step(&views[0]);

    c.bench_function("gate_step_turn_change", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i ^= 1;
            let step = gate.step(black_box(&views[i]));
            if step == Step::Move {
                gate.mark_acted();
            }
            step
        })
    });
}

fn bench_can_move(c: &mut Criterion) {
    let gate = TurnGate::new();
    let v = view(3, TurnType::ThiefTurn);

    c.bench_function("can_move", |b| b.iter(|| gate.can_move(black_box(&v))));
}

fn bench_parse_view(c: &mut Criterion) {
    let line = r#"{"type":"view","seq":9,"ts":1,"view":{"status":"ongoing","turn":{"turn_number":4,"turn_type":"police_turn"},"viewer":{"id":1,"team":"first","agent_type":"police","node_id":3,"is_dead":false}}}"#;

    c.bench_function("parse_view_line", |b| {
        b.iter(|| parse_server_message(black_box(line)))
    });
}

criterion_group!(
    benches,
    bench_step_same_turn,
    bench_step_turn_change,
    bench_can_move,
    bench_parse_view
);
criterion_main!(benches);
