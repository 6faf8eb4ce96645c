mod helpers;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use cogspace::atom::Atom;
use cogspace::config::MemoryConfig;
use cogspace::memory::store::{Memory, PROTECTED_SYMBOLS};
use helpers::atom;

fn pressured_space() -> Memory {
    Memory::new(MemoryConfig {
        forget_trigger_size: 50,
        ..MemoryConfig::default()
    })
}

#[test]
fn protected_symbols_survive_any_number_of_cycles() {
    let space = pressured_space();
    for i in 0..200 {
        space.add(atom(&format!("(Noise {i})")));
    }
    for _ in 0..50 {
        space.decay_and_forget();
    }
    for name in PROTECTED_SYMBOLS {
        assert!(space.get(name).is_some(), "{name} was forgotten");
    }
}

#[test]
fn forgetting_removes_from_the_index_too() {
    let space = pressured_space();
    for i in 0..200 {
        space.add(atom(&format!("(Noise {i})")));
    }
    for _ in 0..10 {
        space.decay_and_forget();
    }
    assert!(space.len() <= 40);
    let remaining = space.query(&atom("(Noise $n)"));
    assert_eq!(remaining.len() + PROTECTED_SYMBOLS.len(), space.len());
}

#[test]
fn variables_are_never_forgotten() {
    let space = pressured_space();
    let var = space.add(Atom::var("lonely"));
    for i in 0..100 {
        space.add(Atom::sym(format!("Filler{i}")));
    }
    for _ in 0..20 {
        space.decay_and_forget();
    }
    assert!(space.contains(var.id()));
}

#[test]
fn rules_in_use_outlive_idle_facts() {
    let space = pressured_space();
    let rule = space.add(atom("(= (answer) 42)"));
    for i in 0..100 {
        space.add(atom(&format!("(Idle {i})")));
    }
    for _ in 0..20 {
        space.query(&atom("(= (answer) $x)"));
        space.decay_and_forget();
    }
    assert!(space.contains(rule.id()));
    assert!(space.query(&atom("(Idle $n)")).len() < 100);
}

#[test]
fn readers_never_see_half_removed_atoms() {
    let space = Arc::new(pressured_space());
    for i in 0..300 {
        space.add(atom(&format!("(Churn {i})")));
    }

    let reader = {
        let space = Arc::clone(&space);
        thread::spawn(move || {
            for _ in 0..200 {
                // Every match must still resolve through the table.
                for m in space.query(&atom("(Churn $n)")) {
                    let _ = space.value(&m.atom);
                }
            }
        })
    };
    for _ in 0..20 {
        space.decay_and_forget();
    }
    reader.join().unwrap();

    for m in space.query(&atom("(Churn $n)")) {
        assert!(space.contains(m.atom.id()));
    }
}

#[test]
fn add_during_forgetting_keeps_atoms_interned() {
    // A fresh access lifts sti to 1.0; it takes two decays at 0.5 to fall
    // under the threshold, so a legitimate removal needs a cycle that
    // started after the add.
    let space = Arc::new(Memory::new(MemoryConfig {
        initial_sti: 0.0,
        access_boost: 1.0,
        sti_decay: 0.5,
        lti_transfer: 0.0,
        lti_learning_rate: 0.0,
        min_forget_priority: 0.4,
        recency_tau: 1e9,
        forget_trigger_size: 0,
        ..MemoryConfig::default()
    }));
    let stop = Arc::new(AtomicBool::new(false));

    let forgetter = {
        let space = Arc::clone(&space);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                space.decay_and_forget();
            }
        })
    };

    for round in 0..5_000 {
        let before = space.now();
        let stored = space.add(atom(&format!("(Churn {})", round % 16)));
        assert!(
            space.contains(stored.id()) || space.now() > before,
            "{stored} vanished inside the add that returned it"
        );
    }
    stop.store(true, Ordering::Relaxed);
    forgetter.join().unwrap();
}
