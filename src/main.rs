//! # Arise Main Entry Point
//!
//! Initializes logging and the stores, restores or creates a session, and
//! runs the interactive command loop that drives the progression engine.

use arise::cue::{Cue, CueSink, LogCues};
use arise::daily::{self, TrainingField};
use arise::items::{self, InventoryItem, InventoryStore, ItemKind, ItemSpec, Rarity, StatBonuses};
use arise::narrative::{SystemEvent, SystemVoice};
use arise::notify::{Notifier, TerminalNotifier};
use arise::penalty::{PenaltyEpisode, SurviveOutcome};
use arise::player::{EquipSlot, Player, StatKey};
use arise::session::SessionStore;
use arise::{config, AriseError, AriseResult};
use chrono::Local;
use clap::Parser;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Command line arguments for Arise.
#[derive(Parser, Debug)]
#[command(name = "arise")]
#[command(about = "A gamified daily-habit tracker driven by the System")]
#[command(version)]
struct Args {
    /// Directory holding player and inventory state
    #[arg(short, long, default_value = ".arise")]
    data_dir: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> AriseResult<()> {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    log::info!("Starting Arise v{}", arise::VERSION);

    let sessions = SessionStore::new(&args.data_dir)?;
    let inventory_store = InventoryStore::new(&args.data_dir)?;
    let voice = SystemVoice::from_env();
    let cues: Arc<dyn CueSink> = Arc::new(LogCues);
    let notifier = TerminalNotifier::default();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let Some(player) = resume_or_login(&sessions, &cues, &mut lines).await? else {
        return Ok(());
    };

    run_session(
        sessions,
        inventory_store,
        voice,
        cues,
        notifier,
        &mut lines,
        player,
    )
    .await
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Warn,
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

/// Restores the active session, or walks the player through login.
///
/// Returns `None` when stdin closes before a login completes.
async fn resume_or_login(
    sessions: &SessionStore,
    cues: &Arc<dyn CueSink>,
    lines: &mut Lines<BufReader<Stdin>>,
) -> AriseResult<Option<Player>> {
    if let Some(player) = sessions.load_current_session()? {
        log::info!("resumed session for {}", player.email);
        return Ok(Some(player));
    }

    loop {
        let Some(email) = prompt(lines, "Hunter ID (email): ").await? else {
            return Ok(None);
        };
        let Some(name) = prompt(lines, "Name: ").await? else {
            return Ok(None);
        };
        let email = email.trim().to_string();
        let name = name.trim().to_string();

        if email.is_empty() || name.is_empty() {
            continue;
        }
        if !email.contains('@') {
            cues.emit(Cue::Error);
            println!("Invalid Hunter ID.");
            continue;
        }
        if sessions.exists(&email) {
            println!("Account exists. Logging in.");
        }
        return Ok(Some(sessions.login(&email, &name)?));
    }
}

async fn prompt(
    lines: &mut Lines<BufReader<Stdin>>,
    text: &str,
) -> AriseResult<Option<String>> {
    print!("{}", text);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

/// Commands accepted at the interactive prompt.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Status,
    Train(TrainingField, u32),
    Complete,
    Forfeit,
    Survive,
    Upgrade(StatKey),
    Shop,
    Buy(usize),
    Items,
    Equip(usize),
    Unequip(EquipSlot),
    UseItem(usize),
    Discard(usize),
    Chat(String),
    Alerts,
    Logout,
    Help,
    Quit,
}

/// Parses one line of player input.
fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or_default().to_lowercase();

    match head.as_str() {
        "status" => Ok(Command::Status),
        "train" => {
            let usage = "usage: train <pushups|situps|squats|running> <amount>";
            let field = parts
                .next()
                .and_then(TrainingField::from_name)
                .ok_or(usage)?;
            let amount = parts.next().and_then(|s| s.parse().ok()).ok_or(usage)?;
            Ok(Command::Train(field, amount))
        }
        "complete" => Ok(Command::Complete),
        "forfeit" => Ok(Command::Forfeit),
        "survive" => Ok(Command::Survive),
        "upgrade" => parts
            .next()
            .and_then(StatKey::from_name)
            .map(Command::Upgrade)
            .ok_or_else(|| "usage: upgrade <strength|agility|sense|vitality|intelligence>".into()),
        "shop" => Ok(Command::Shop),
        "buy" => index_arg(parts.next())
            .map(Command::Buy)
            .ok_or_else(|| "usage: buy <shop entry number>".into()),
        "items" => Ok(Command::Items),
        "equip" => index_arg(parts.next())
            .map(Command::Equip)
            .ok_or_else(|| "usage: equip <item number>".into()),
        "unequip" => parts
            .next()
            .and_then(EquipSlot::from_name)
            .map(Command::Unequip)
            .ok_or_else(|| "usage: unequip <slot>".into()),
        "use" => index_arg(parts.next())
            .map(Command::UseItem)
            .ok_or_else(|| "usage: use <item number>".into()),
        "discard" => index_arg(parts.next())
            .map(Command::Discard)
            .ok_or_else(|| "usage: discard <item number>".into()),
        "chat" => {
            let query = line.splitn(2, char::is_whitespace).nth(1).unwrap_or("").trim();
            if query.is_empty() {
                Err("usage: chat <question for the System>".into())
            } else {
                Ok(Command::Chat(query.to_string()))
            }
        }
        "alerts" => Ok(Command::Alerts),
        "logout" => Ok(Command::Logout),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn index_arg(arg: Option<&str>) -> Option<usize> {
    arg.and_then(|s| s.parse::<usize>().ok()).filter(|&n| n > 0)
}

/// The interactive session loop.
async fn run_session(
    sessions: SessionStore,
    inventory_store: InventoryStore,
    voice: SystemVoice,
    cues: Arc<dyn CueSink>,
    mut notifier: TerminalNotifier,
    lines: &mut Lines<BufReader<Stdin>>,
    mut player: Player,
) -> AriseResult<()> {
    let mut inventory = inventory_store.load(&player.email)?;
    let mut today = Local::now().date_naive();
    let mut progress = daily::resolve_today(&player, today);
    let mut penalty: Option<PenaltyEpisode> = None;

    // Narrative is decoration, fetched only after session state is settled.
    let login_msg = voice.describe(SystemEvent::Login, &player, None).await;
    cues.emit(Cue::Notify);
    system_window(&login_msg);
    println!("Type 'help' for commands.");

    loop {
        let in_penalty = penalty.as_ref().is_some_and(PenaltyEpisode::is_active);
        let marker = if in_penalty { "[PENALTY] > " } else { "> " };
        let Some(line) = prompt(lines, marker).await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        // Crossing midnight: re-resolve today before acting.
        let now = Local::now().date_naive();
        if now != today {
            today = now;
            progress = daily::resolve_today(&player, today);
        }

        // The penalty zone blocks every other game action.
        if in_penalty
            && !matches!(command, Command::Survive | Command::Help | Command::Quit)
        {
            cues.emit(Cue::Error);
            println!("PENALTY ZONE ACTIVE. Survive first.");
            continue;
        }

        match command {
            Command::Status => {
                render_status(&player, &inventory, &progress, in_penalty);
            }

            Command::Train(field, amount) => {
                daily::log_training(&mut progress, field, amount);
                println!(
                    "Logged. Today: {} pushups, {} situps, {} squats, {} km.",
                    progress.pushups, progress.situps, progress.squats, progress.running_km
                );
            }

            Command::Complete => match daily::complete_quest(&mut player, &mut progress) {
                Ok(outcome) => {
                    sessions.save(&player)?;
                    cues.emit(Cue::LevelUp);
                    if outcome.rank_changed {
                        println!("RANK UP: {}-Rank Hunter.", player.rank);
                    }
                    if outcome.leveled_up {
                        let msg = voice.describe(SystemEvent::LevelUp, &player, None).await;
                        system_window(&msg);
                    } else {
                        system_window("DAILY QUEST COMPLETE. REWARDS RECEIVED.");
                    }
                }
                Err(err) => reject(&cues, &err),
            },

            Command::Forfeit => {
                if progress.completed {
                    cues.emit(Cue::Error);
                    println!("Daily Quest already completed.");
                    continue;
                }
                penalty = Some(PenaltyEpisode::trigger(Arc::clone(&cues)));
                notifier.send("The System", "PENALTY ZONE ACTIVE");
                let msg = voice.describe(SystemEvent::Penalty, &player, None).await;
                system_window(&format!("PLAYER FORFEIT\n\n{}", msg));
                println!("Survive {} times to live.", config::PENALTY_CLICKS);
            }

            Command::Survive => {
                if let Some(episode) = penalty.as_mut() {
                    match episode.survive() {
                        SurviveOutcome::Counted { clicks_remaining } => {
                            println!("SURVIVE. {} remaining.", clicks_remaining);
                        }
                        SurviveOutcome::GateOpened => {
                            println!("THE GATE IS OPEN. One final action.");
                        }
                        SurviveOutcome::Survived => {
                            daily::record_survival(&mut player, &mut progress);
                            sessions.save(&player)?;
                            penalty = None;
                            system_window("PENALTY SURVIVED. REWARD: NONE.");
                        }
                        SurviveOutcome::Idle => {}
                    }
                } else {
                    println!("No penalty in effect.");
                }
            }

            Command::Upgrade(key) => match player.upgrade_stat(key) {
                Ok(()) => {
                    sessions.save(&player)?;
                    cues.emit(Cue::Confirm);
                    println!(
                        "{} increased to {}. {} points remaining.",
                        key.name(),
                        player.stats.get(key),
                        player.stats.available_points
                    );
                }
                Err(err) => reject(&cues, &err),
            },

            Command::Shop => {
                println!("== Hunter Supply Shop ==");
                for (index, entry) in shop_catalog().iter().enumerate() {
                    println!(
                        "{:>2}. {:<22} {:>5} G  [{:?}] {}",
                        index + 1,
                        entry.spec.name,
                        entry.cost,
                        entry.spec.rarity,
                        entry.spec.desc
                    );
                }
                println!("Gold: {} G", player.gold);
            }

            Command::Buy(index) => {
                let catalog = shop_catalog();
                let Some(entry) = index.checked_sub(1).and_then(|i| catalog.get(i)) else {
                    println!("No such shop entry.");
                    continue;
                };
                match items::purchase(&mut player, &inventory_store, entry.cost, entry.spec.clone())
                {
                    Ok(list) => {
                        inventory = list;
                        sessions.save(&player)?;
                        cues.emit(Cue::Confirm);
                        println!("Purchased: {}", entry.spec.name);
                    }
                    Err(err) => reject(&cues, &err),
                }
            }

            Command::Items => {
                if inventory.is_empty() {
                    println!("No items stored.");
                    continue;
                }
                println!("== Item Box ==");
                for (index, item) in inventory.iter().enumerate() {
                    let slot = item
                        .slot
                        .map(|slot| format!(" ({})", slot.name()))
                        .unwrap_or_default();
                    println!(
                        "{:>2}. {:<22} [{:?}]{} {}",
                        index + 1,
                        item.name,
                        item.rarity,
                        slot,
                        item.desc
                    );
                }
            }

            Command::Equip(index) => {
                let Some(item) = index.checked_sub(1).and_then(|i| inventory.get(i)) else {
                    println!("No such item.");
                    continue;
                };
                match player.equip(item) {
                    Ok(()) => {
                        sessions.save(&player)?;
                        cues.emit(Cue::Confirm);
                        println!("Equipped {}.", item.name);
                    }
                    Err(err) => reject(&cues, &err),
                }
            }

            Command::Unequip(slot) => {
                player.unequip(slot);
                sessions.save(&player)?;
                println!("Cleared {}.", slot.name());
            }

            Command::UseItem(index) | Command::Discard(index) => {
                let Some(item) = index.checked_sub(1).and_then(|i| inventory.get(i)) else {
                    println!("No such item.");
                    continue;
                };
                let name = item.name.clone();
                let id = item.id;
                inventory = inventory_store.remove(&player.email, id)?;
                println!("{} removed from the item box.", name);
            }

            Command::Chat(query) => {
                let msg = voice
                    .describe(SystemEvent::Advice, &player, Some(&query))
                    .await;
                system_window(&msg);
            }

            Command::Alerts => {
                if notifier.request_permission() {
                    cues.emit(Cue::Notify);
                    notifier.send("The System", "Notifications Enabled.");
                }
            }

            Command::Logout => {
                sessions.save(&player)?;
                sessions.logout()?;
                println!("Session ended.");
                break;
            }

            Command::Help => {
                print_help();
            }

            Command::Quit => {
                sessions.save(&player)?;
                break;
            }
        }
    }

    Ok(())
}

fn reject(cues: &Arc<dyn CueSink>, err: &AriseError) {
    cues.emit(Cue::Error);
    println!("{}", err);
}

fn system_window(message: &str) {
    println!("+----------------- SYSTEM -----------------+");
    for line in message.lines() {
        println!("| {}", line);
    }
    println!("+------------------------------------------+");
}

fn print_help() {
    println!("status                       show the status window");
    println!("train <field> <amount>       log pushups/situps/squats/running");
    println!("complete                     complete today's Daily Quest");
    println!("forfeit                      forfeit today's quest (penalty!)");
    println!("survive                      click through the Penalty Zone");
    println!("upgrade <stat>               spend an available stat point");
    println!("shop / buy <n>               browse and buy supplies");
    println!("items / equip <n> / use <n> / discard <n>");
    println!("unequip <slot>               clear an equipment slot");
    println!("chat <question>              ask the System for advice");
    println!("alerts                       enable notifications");
    println!("logout | quit");
}

/// Renders the status window.
fn render_status(
    player: &Player,
    inventory: &[InventoryItem],
    progress: &arise::DailyProgress,
    in_penalty: bool,
) {
    let bonuses = items::equipped_bonuses(player, inventory);

    println!("== Player: {} ({}) ==", player.username, player.email);
    println!("Level {}  {}-Rank Hunter", player.level, player.rank);
    println!(
        "XP {}/{}  Gold {} G  Streak {} days",
        player.current_xp.floor() as u64,
        player.required_xp,
        player.gold,
        player.streak
    );
    if player.streak > 7 {
        println!("Consistent Hunter Bonus Active");
    }

    println!("Stats ({} points available):", player.stats.available_points);
    for key in StatKey::ALL {
        let bonus = bonuses.get(key);
        if bonus != 0 {
            println!("  {:<13} {:>3} ({:+})", key.name(), player.stats.get(key), bonus);
        } else {
            println!("  {:<13} {:>3}", key.name(), player.stats.get(key));
        }
    }

    println!("Equipment:");
    for slot in EquipSlot::ALL {
        let label = match player.equipment.get(slot) {
            Some(id) => inventory
                .iter()
                .find(|item| item.id == id)
                .map(|item| item.name.clone())
                .unwrap_or_else(|| "(missing item)".to_string()),
            None => "-".to_string(),
        };
        println!("  {:<9} {}", slot.name(), label);
    }

    println!(
        "Today [{}]: {} pushups, {} situps, {} squats, {} km  completed: {}  survived: {}",
        progress.date,
        progress.pushups,
        progress.situps,
        progress.squats,
        progress.running_km,
        progress.completed,
        progress.penalty_survived
    );
    if in_penalty {
        println!("PENALTY ZONE ACTIVE.");
    }
}

struct ShopEntry {
    cost: u64,
    spec: ItemSpec,
}

/// The supply shop's static catalog. Data, not logic.
fn shop_catalog() -> Vec<ShopEntry> {
    let plain = |name: &str, kind, desc: &str, rarity| ItemSpec {
        name: name.to_string(),
        kind,
        desc: desc.to_string(),
        rarity,
        slot: None,
        bonuses: StatBonuses::default(),
    };
    let gear = |name: &str, desc: &str, rarity, slot, bonuses| ItemSpec {
        name: name.to_string(),
        kind: if slot == EquipSlot::Rune {
            ItemKind::Rune
        } else {
            ItemKind::Gear
        },
        desc: desc.to_string(),
        rarity,
        slot: Some(slot),
        bonuses,
    };

    vec![
        ShopEntry {
            cost: 100,
            spec: plain(
                "Fatigue Potion",
                ItemKind::Potion,
                "Recovers fatigue. +20 reps, +2km today.",
                Rarity::Common,
            ),
        },
        ShopEntry {
            cost: 500,
            spec: plain(
                "Dungeon Key",
                ItemKind::Key,
                "Opens a sealed reward box.",
                Rarity::Common,
            ),
        },
        ShopEntry {
            cost: 300,
            spec: plain(
                "Mana Stone",
                ItemKind::Material,
                "Crafting material. Faintly humming.",
                Rarity::Common,
            ),
        },
        ShopEntry {
            cost: 1200,
            spec: gear(
                "Hunter's Blade",
                "Standard-issue blade, recently sharpened.",
                Rarity::Rare,
                EquipSlot::Weapon,
                StatBonuses {
                    strength: 2,
                    ..StatBonuses::default()
                },
            ),
        },
        ShopEntry {
            cost: 1100,
            spec: gear(
                "Knight's Plate",
                "Dense plating for dense dungeons.",
                Rarity::Rare,
                EquipSlot::Armor,
                StatBonuses {
                    vitality: 2,
                    ..StatBonuses::default()
                },
            ),
        },
        ShopEntry {
            cost: 900,
            spec: gear(
                "Shadow Cloak",
                "Muffles footsteps completely.",
                Rarity::Rare,
                EquipSlot::Cloak,
                StatBonuses {
                    agility: 2,
                    ..StatBonuses::default()
                },
            ),
        },
        ShopEntry {
            cost: 800,
            spec: gear(
                "Grip Gauntlets",
                "Never lose the bar again.",
                Rarity::Common,
                EquipSlot::Gloves,
                StatBonuses {
                    strength: 1,
                    ..StatBonuses::default()
                },
            ),
        },
        ShopEntry {
            cost: 800,
            spec: gear(
                "Swift Boots",
                "Lighter every kilometer.",
                Rarity::Common,
                EquipSlot::Boots,
                StatBonuses {
                    agility: 1,
                    ..StatBonuses::default()
                },
            ),
        },
        ShopEntry {
            cost: 1500,
            spec: gear(
                "Necklace of Insight",
                "Hums when you skip leg day.",
                Rarity::Epic,
                EquipSlot::Necklace,
                StatBonuses {
                    intelligence: 3,
                    ..StatBonuses::default()
                },
            ),
        },
        ShopEntry {
            cost: 1000,
            spec: gear(
                "Ring of Vigor",
                "A slow, steady warmth.",
                Rarity::Rare,
                EquipSlot::Ring1,
                StatBonuses {
                    vitality: 2,
                    ..StatBonuses::default()
                },
            ),
        },
        ShopEntry {
            cost: 1000,
            spec: gear(
                "Ring of Focus",
                "The noise falls away.",
                Rarity::Rare,
                EquipSlot::Ring2,
                StatBonuses {
                    sense: 2,
                    ..StatBonuses::default()
                },
            ),
        },
        ShopEntry {
            cost: 2500,
            spec: gear(
                "Rune of Awakening",
                "It was waiting for you.",
                Rarity::Legendary,
                EquipSlot::Rune,
                StatBonuses {
                    strength: 1,
                    agility: 1,
                    sense: 1,
                    vitality: 1,
                    intelligence: 1,
                },
            ),
        },
    ]
}
