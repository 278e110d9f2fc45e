use broadside::transport::in_memory::InMemoryTransport;
use broadside::{random_fleet, BotGunner, MatchSession, PeerNode, Role};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let mut rng1 = SmallRng::seed_from_u64(seed1);
    let mut rng2 = SmallRng::seed_from_u64(seed2);

    let board1 = random_fleet(&mut rng1)?;
    let board2 = random_fleet(&mut rng2)?;
    let mut session1 = MatchSession::new("sim", Role::Host, board1);
    let mut session2 = MatchSession::new("sim", Role::Guest, board2);
    session1.opponent_joined();
    session2.opponent_joined();

    let (t1, t2) = InMemoryTransport::pair();

    let f1 = async move {
        let mut node = PeerNode::new(session1, Box::new(t1), Box::new(BotGunner::new(rng1)));
        let outcome = node.run().await?;
        anyhow::Ok((outcome, node.session().shots().count()))
    };
    let f2 = async move {
        let mut node = PeerNode::new(session2, Box::new(t2), Box::new(BotGunner::new(rng2)));
        let outcome = node.run().await?;
        anyhow::Ok((outcome, node.session().shots().count()))
    };

    let (res1, res2) = tokio::try_join!(f1, f2)?;

    let winner = match (res1.0, res2.0) {
        (broadside::MatchOutcome::Victory, _) => Some("host"),
        (_, broadside::MatchOutcome::Victory) => Some("guest"),
        _ => None,
    };

    let result = json!({
        "host": {"outcome": format!("{:?}", res1.0), "shots": res1.1},
        "guest": {"outcome": format!("{:?}", res2.0), "shots": res2.1},
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
