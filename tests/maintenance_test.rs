mod helpers;

use std::sync::Arc;
use std::time::Duration;

use cogspace::config::{MaintenanceConfig, MemoryConfig};
use cogspace::memory::maintenance::spawn_maintenance;
use cogspace::memory::store::{Memory, PROTECTED_SYMBOLS};
use helpers::atom;

#[tokio::test]
async fn background_task_decays_and_stops_cleanly() {
    let space = Arc::new(Memory::new(MemoryConfig {
        forget_trigger_size: 20,
        ..MemoryConfig::default()
    }));
    for i in 0..60 {
        space.add(atom(&format!("(Transient {i})")));
    }

    let config = MaintenanceConfig {
        enabled: true,
        interval_ms: 5,
    };
    let handle = spawn_maintenance(Arc::clone(&space), &config);
    tokio::time::sleep(Duration::from_millis(200)).await;
    let cycles = handle.shutdown().await;

    assert!(cycles >= 3, "only {cycles} cycles ran");
    assert!(space.now() as usize >= cycles);
    assert!(space.len() < PROTECTED_SYMBOLS.len() + 60);
    for name in PROTECTED_SYMBOLS {
        assert!(space.contains(name));
    }
}

#[tokio::test]
async fn shutdown_before_first_tick() {
    let space = Arc::new(Memory::default());
    let config = MaintenanceConfig {
        enabled: true,
        interval_ms: 60_000,
    };
    let handle = spawn_maintenance(Arc::clone(&space), &config);
    assert_eq!(handle.shutdown().await, 0);
    assert_eq!(space.now(), 0);
}

#[tokio::test]
async fn concurrent_queries_during_maintenance() {
    let space = Arc::new(Memory::default());
    for i in 0..100 {
        space.add(atom(&format!("(Fact {i})")));
    }
    let handle = spawn_maintenance(
        Arc::clone(&space),
        &MaintenanceConfig {
            enabled: true,
            interval_ms: 1,
        },
    );

    let reader = {
        let space = Arc::clone(&space);
        tokio::task::spawn_blocking(move || {
            let mut seen = 0;
            for _ in 0..100 {
                seen += space.query(&atom("(Fact $n)")).len();
            }
            seen
        })
    };
    let seen = reader.await.unwrap();
    handle.shutdown().await;
    assert!(seen > 0);
}
