//! WrldBldr Combat - Skirmish simulator
//!
//! Runs a sample party against a band of enemies. Enemies act through the
//! combat AI; players strike the weakest opponent. Set `COMBAT_DICE_SEED`
//! for a reproducible fight.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wrldbldr_combat::application::services::{
    CombatService, ResolveTurnRequest, StartCombatRequest, TurnResolution,
};
use wrldbldr_combat::domain::entities::{Combatant, Side};
use wrldbldr_combat::domain::services::{select_target, TargetPriority};
use wrldbldr_combat::domain::value_objects::CombatAction;
use wrldbldr_combat::infrastructure::config::AppConfig;
use wrldbldr_combat::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wrldbldr_combat=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting WrldBldr Combat skirmish");

    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Dice seed: {:?}", config.dice_seed);
    tracing::info!("  Max rounds: {}", config.max_rounds);
    tracing::info!("  Default flee threshold: {}", config.default_flee_threshold);

    let state = AppState::new(config)?;
    tracing::info!("Application state initialized");
    tracing::info!("  Weapons in catalog: {}", state.weapons.len());
    let service = &state.combat_service;

    let roster = sample_roster(state.config.default_flee_threshold);
    let encounter = service
        .start_combat(StartCombatRequest {
            roster,
            seed: state.config.dice_seed,
        })
        .await
        .context("Failed to start encounter")?;
    let encounter_id = encounter.id;

    for combatant_id in &encounter.turn_order {
        if let Some(combatant) = encounter.combatant(*combatant_id) {
            tracing::info!(
                "  {} (initiative {})",
                combatant.name,
                combatant.initiative().unwrap_or_default()
            );
        }
    }

    let mut snapshot = encounter;
    while !snapshot.is_completed() {
        if snapshot.round > state.config.max_rounds {
            tracing::warn!(
                rounds = state.config.max_rounds,
                "Round limit reached without a winner"
            );
            break;
        }

        let Some(actor) = snapshot
            .current_combatant
            .and_then(|id| snapshot.combatant(id))
        else {
            break;
        };

        let resolution = if actor.is_enemy() {
            service.resolve_ai_turn(encounter_id).await?
        } else {
            let action = select_target(TargetPriority::Weakest, Side::Party, &snapshot.combatants)
                .map(CombatAction::attack)
                .unwrap_or(CombatAction::Pass);
            service
                .resolve_turn(
                    encounter_id,
                    ResolveTurnRequest {
                        combatant_id: actor.id,
                        action,
                    },
                )
                .await?
        };

        report(&resolution)?;
        snapshot = resolution.state;
    }

    let history = service.get_history(encounter_id).await?;
    let final_state = service.close_encounter(encounter_id).await?;
    match final_state.outcome {
        Some(outcome) => tracing::info!(
            rounds = final_state.round,
            attacks = history.len(),
            "Outcome: {}",
            outcome.display_name()
        ),
        None => tracing::info!(
            rounds = final_state.round,
            attacks = history.len(),
            "Skirmish ended undecided"
        ),
    }
    for combatant in &final_state.combatants {
        tracing::info!(
            "  {}: {}/{} HP ({:?})",
            combatant.name,
            combatant.current_health(),
            combatant.max_health(),
            combatant.status()
        );
    }

    Ok(())
}

fn sample_roster(flee_threshold: f64) -> Vec<Combatant> {
    vec![
        Combatant::player("Aria", 34, 16, "longsword").with_dexterity_modifier(1),
        Combatant::player("Bram", 26, 13, "shortbow").with_dexterity_modifier(3),
        Combatant::enemy("Orc Raider", 15, 13, "greataxe")
            .with_dexterity_modifier(1)
            .with_flee_threshold(flee_threshold),
        Combatant::enemy("Goblin Archer", 7, 15, "shortbow")
            .with_dexterity_modifier(2)
            .with_flee_threshold(flee_threshold),
        Combatant::enemy("Goblin Cutter", 7, 15, "scimitar")
            .with_dexterity_modifier(2)
            .with_flee_threshold(flee_threshold),
    ]
}

fn report(resolution: &TurnResolution) -> anyhow::Result<()> {
    if let Some(decision) = &resolution.ai_decision {
        tracing::debug!(
            behavior = decision.behavior.display_name(),
            "AI chose {}",
            decision.action.display_name()
        );
    }
    if let Some(record) = &resolution.record {
        tracing::info!("{}", record.summary());
        tracing::debug!(
            "{}",
            serde_json::to_string(record).context("Failed to serialize attack record")?
        );
    }
    Ok(())
}
