use std::time::Duration;

use broadside::transport::in_memory::InMemoryTransport;
use broadside::{
    init_logging, print_match_view, random_fleet, BotGunner, ConsoleGunner, FixedPause, Gunner,
    Immediate, MatchOutcome, MatchSession, MovePacer, PeerNode, RelayClient, RelayServer, Role,
    RoomFull, NEGOTIATION_TIMEOUT,
};
use clap::{Parser, Subcommand};
use rand::distr::Alphanumeric;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Parser)]
#[command(author, version, about = "two-player grid battle over a brokered peer link")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the matchmaking relay service.
    Relay {
        #[arg(long, default_value = "0.0.0.0:3000")]
        bind: String,
    },
    /// Join (or create) a room through a relay and play a match.
    Play {
        #[arg(long, default_value = "127.0.0.1:3000")]
        relay: String,
        #[arg(long, help = "Room code; a fresh one is generated when omitted")]
        room: Option<String>,
        #[arg(long, help = "Register this name in the relay's user directory")]
        login: Option<String>,
        #[arg(long, help = "Let the autonomous opponent logic play this seat")]
        bot: bool,
        #[arg(long, help = "Fix RNG seed for reproducible fleets and bot play")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 600, help = "Bot pause before each move, in ms")]
        delay_ms: u64,
    },
    /// Bot vs bot on this machine over an in-memory pair.
    Local {
        #[arg(long, help = "Fix RNG seed for a reproducible game")]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Relay { bind } => {
            let server = RelayServer::bind(&bind).await?;
            println!("relay listening on {}", server.local_addr()?);
            server.run().await?;
        }
        Commands::Play {
            relay,
            room,
            login,
            bot,
            seed,
            delay_ms,
        } => {
            let mut rng = seeded_rng(seed);
            let mut client = RelayClient::connect(&relay).await?;
            if let Some(name) = login {
                client.login(&name).await?;
            }
            let room_id = room.unwrap_or_else(|| room_code(&mut rng));
            let role = match client.join_room(&room_id).await {
                Ok(role) => role,
                Err(e) if e.downcast_ref::<RoomFull>().is_some() => {
                    println!("room {} is full", room_id);
                    return Ok(());
                }
                Err(e) => return Err(e),
            };
            match role {
                Role::Host => {
                    println!("room code: {} (share it with your opponent)", room_id)
                }
                Role::Guest => println!("joined room {}", room_id),
            }

            println!("waiting for the peer link...");
            let transport = tokio::time::timeout(
                NEGOTIATION_TIMEOUT,
                client.establish_peer_link(role, &room_id),
            )
            .await
            .map_err(|_| anyhow::anyhow!("peer negotiation timed out"))??;

            let board = random_fleet(&mut rng)?;
            let mut session = MatchSession::new(room_id.clone(), role, board);
            session.opponent_joined();

            let gunner: Box<dyn Gunner> = if bot {
                Box::new(BotGunner::new(SmallRng::from_rng(&mut rng)))
            } else {
                Box::new(ConsoleGunner::new())
            };
            let pacer: Box<dyn MovePacer> = if bot {
                Box::new(FixedPause(Duration::from_millis(delay_ms)))
            } else {
                Box::new(Immediate)
            };
            let mut node =
                PeerNode::new(session, Box::new(transport), gunner).with_pacer(pacer);

            let outcome = node.run().await?;
            print_match_view(node.session());
            match outcome {
                MatchOutcome::Victory => println!("\nVICTORY: the enemy fleet is gone"),
                MatchOutcome::Defeat => println!("\nDEFEAT: your fleet is gone"),
                MatchOutcome::OpponentLeft => println!("\nopponent left the match"),
            }
            let _ = client.leave_room(&room_id).await;
        }
        Commands::Local { seed } => {
            println!("starting local bot vs bot game...");
            if let Some(s) = seed {
                println!("using fixed seed: {} (game will be reproducible)", s);
            }
            let mut rng1 = seeded_rng(seed);
            let mut rng2 = seeded_rng(seed.map(|s| s.wrapping_add(1)));

            let board1 = random_fleet(&mut rng1)?;
            let board2 = random_fleet(&mut rng2)?;
            let mut session1 = MatchSession::new("local", Role::Host, board1);
            let mut session2 = MatchSession::new("local", Role::Guest, board2);
            session1.opponent_joined();
            session2.opponent_joined();

            let (t1, t2) = InMemoryTransport::pair();
            let host = async move {
                let mut node = PeerNode::new(
                    session1,
                    Box::new(t1),
                    Box::new(BotGunner::new(SmallRng::from_rng(&mut rng1))),
                );
                let outcome = node.run().await?;
                anyhow::Ok((outcome, node))
            };
            let guest = async move {
                let mut node = PeerNode::new(
                    session2,
                    Box::new(t2),
                    Box::new(BotGunner::new(SmallRng::from_rng(&mut rng2))),
                );
                let outcome = node.run().await?;
                anyhow::Ok((outcome, node))
            };

            let ((outcome1, node1), (outcome2, node2)) = tokio::try_join!(host, guest)?;
            println!(
                "host: {:?} in {} shots, guest: {:?} in {} shots",
                outcome1,
                node1.session().shots().count(),
                outcome2,
                node2.session().shots().count(),
            );
            print_match_view(node1.session());
        }
    }
    Ok(())
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

/// Five-character shareable room code.
fn room_code(rng: &mut SmallRng) -> String {
    (0..5)
        .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_uppercase())
        .collect()
}
