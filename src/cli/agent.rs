//! Chain-world demo: train an agent for a few episodes and show what it learned.

use anyhow::Result;

use cogspace::agent::{Agent, ChainWorld};
use cogspace::config::CogConfig;

pub fn agent(config: &CogConfig, episodes: usize, seed: Option<u64>) -> Result<()> {
    let interp = super::interpreter(config);
    let mut agent = match seed {
        Some(seed) => Agent::seeded(interp.clone(), config.agent.clone(), seed),
        None => Agent::new(interp.clone(), config.agent.clone()),
    };
    let mut world = ChainWorld::three_state();

    for episode in 1..=episodes {
        world.reset();
        let summary = agent.run(&mut world, None, config.agent.max_cycles);
        println!(
            "  episode {episode:>3}: {} cycle(s), reward {:.2}, stop: {:?}",
            summary.cycles, summary.total_reward, summary.stop
        );
    }
    println!();

    println!("Learned utilities:");
    for position in 0..2 {
        let actions = [world.move_action(position), world.stay_action(position)];
        for action in actions.into_iter().flatten() {
            match agent.utility(&action) {
                Some(u) => println!("  {:<20} {:.4}", action.to_string(), u),
                None => println!("  {:<20} -", action.to_string()),
            }
        }
    }
    Ok(())
}
