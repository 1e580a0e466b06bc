use creative_marketplace::models::task::{Deliveries, Priority, Requirements};
use creative_marketplace::models::{Identity, Role, Task, TaskStatus, TaskType, User};
use creative_marketplace::services::marketplace::build_view;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

const TYPES: [TaskType; 4] = [
    TaskType::Logo,
    TaskType::Banner,
    TaskType::Video,
    TaskType::PrintDesign,
];

/// A synthetic board: a quarter in the marketplace, a quarter assigned to
/// the viewer, the rest private or assigned elsewhere.
fn task_board(n: usize) -> Vec<Task> {
    (0..n)
        .map(|i| Task {
            id: format!("task-{:06}", i),
            client_id: format!("client-{}", i % 50),
            title: format!("Campaign asset #{}", i),
            description: "Seasonal campaign refresh for social and print".to_string(),
            task_type: TYPES[i % TYPES.len()],
            status: if i % 8 == 0 {
                TaskStatus::Completed
            } else {
                TaskStatus::InProgress
            },
            priority: Priority::Medium,
            requirements: Requirements::default(),
            deadline: None,
            assigned_designer: match i % 4 {
                0 => None,
                1 => Some("viewer".to_string()),
                _ => Some(format!("designer-{}", i % 7)),
            },
            pushed_to_marketplace: i % 2 == 0,
            designer_deliveries: Deliveries::default(),
            created_at: format!("2024-{:02}-{:02}T00:00:00Z", 1 + i % 12, 1 + i % 28),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
            claimed_at: None,
            reviewed_at: None,
        })
        .collect()
}

fn viewer(role: Role) -> User {
    let mut user = User::default_for(
        &Identity {
            uid: "viewer".to_string(),
            email: "viewer@example.com".to_string(),
        },
        "2024-01-01T00:00:00Z",
    );
    user.role = role;
    user
}

fn benchmark_build_view(c: &mut Criterion) {
    let tasks = task_board(10_000);
    let designer = viewer(Role::Designer);
    let admin = viewer(Role::Admin);

    let mut group = c.benchmark_group("marketplace_view");

    group.bench_function("designer_partition", |b| {
        b.iter(|| build_view(black_box(tasks.clone()), &designer, None))
    });

    group.bench_function("designer_search", |b| {
        b.iter(|| build_view(black_box(tasks.clone()), &designer, Some("print")))
    });

    group.bench_function("admin_everything", |b| {
        b.iter(|| build_view(black_box(tasks.clone()), &admin, None))
    });

    group.finish();
}

criterion_group!(benches, benchmark_build_view);
criterion_main!(benches);
